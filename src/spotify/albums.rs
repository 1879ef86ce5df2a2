use crate::{
    Result,
    spotify::{CatalogClient, scheduler::ApiRequest},
    types::{AlbumDetail, SeveralAlbumsResponse, TrackDetail},
};

/// The provider accepts at most this many ids per `/albums` call.
pub const SEVERAL_ALBUMS_LIMIT: usize = 20;

/// Retrieves a full album, including its label, by provider id.
///
/// Served from the response cache while the last lookup is fresh.
///
/// # Example
///
/// ```
/// let album = get_album(&client, "4aawyAB9vmqN3uQ7FjRGTy").await?;
/// println!("{} is on {:?}", album.name, album.label);
/// ```
pub async fn get_album(client: &CatalogClient, album_id: &str) -> Result<AlbumDetail> {
    let request = ApiRequest::new(client.endpoint(&format!("/albums/{album_id}")));
    client.fetch(client.with_market(request)).await
}

pub async fn get_track(client: &CatalogClient, track_id: &str) -> Result<TrackDetail> {
    let request = ApiRequest::new(client.endpoint(&format!("/tracks/{track_id}")));
    client.fetch(client.with_market(request)).await
}

/// Retrieves detailed album information for several ids.
///
/// Ids are sent in batches of [`SEVERAL_ALBUMS_LIMIT`]. Ids the provider
/// does not know are left out of the result.
pub async fn get_several_albums(client: &CatalogClient, album_ids: &[String]) -> Result<Vec<AlbumDetail>> {
    let mut albums = Vec::with_capacity(album_ids.len());

    for chunk in album_ids.chunks(SEVERAL_ALBUMS_LIMIT) {
        let request = ApiRequest::new(client.endpoint("/albums")).query("ids", chunk.join(","));
        let response: SeveralAlbumsResponse = client.fetch(client.with_market(request)).await?;
        albums.extend(response.albums.into_iter().flatten());
    }

    Ok(albums)
}

/// Resolves the record label of an album.
///
/// Returns `None` when the provider lists no label for it.
pub async fn resolve_label_for_album(client: &CatalogClient, album_id: &str) -> Result<Option<String>> {
    let album = get_album(client, album_id).await?;
    Ok(album.label.filter(|l| !l.trim().is_empty()))
}

/// Resolves the record label of the album a track belongs to.
pub async fn resolve_label_for_track(client: &CatalogClient, track_id: &str) -> Result<Option<String>> {
    let track = get_track(client, track_id).await?;
    resolve_label_for_album(client, &track.album.id).await
}
