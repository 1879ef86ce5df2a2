use crate::{error, info, spotify::albums, success, warning};

/// Prints an album and the label it was released on.
pub async fn album(album_id: String) {
    let client = super::build_client().await;

    let album = match albums::get_album(&client, &album_id).await {
        Ok(album) => album,
        Err(e) => error!("Cannot load album {}: {}", album_id, e),
    };

    info!("Album: {}", album.name);
    info!("Artists: {}", album.to_release().artist_names());
    info!("Released: {}", album.release_date);
    match album.label.as_deref().filter(|l| !l.trim().is_empty()) {
        Some(label) => success!("Label: {}", label),
        None => warning!("The provider lists no label for this album."),
    }
}

/// Resolves the label of the album a track belongs to.
pub async fn track(track_id: String) {
    let client = super::build_client().await;

    let track = match albums::get_track(&client, &track_id).await {
        Ok(track) => track,
        Err(e) => error!("Cannot load track {}: {}", track_id, e),
    };

    info!("Track: {} ({})", track.name, track.album.title);
    match albums::resolve_label_for_album(&client, &track.album.id).await {
        Ok(Some(label)) => success!("Label: {}", label),
        Ok(None) => warning!("The provider lists no label for this track's album."),
        Err(e) => error!("Cannot resolve label: {}", e),
    }
}
