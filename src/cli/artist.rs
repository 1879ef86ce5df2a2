use tabled::Table;

use crate::{
    error, info,
    spotify::artists,
    types::LabelRelationRow,
    utils::{self, ReleaseKinds},
    warning,
};

/// Shows which labels an artist has released on.
///
/// With `details` every label's releases are listed below the summary.
pub async fn artist(artist_id: String, release_kinds: ReleaseKinds, details: bool) {
    let client = super::build_client().await;
    let pb = super::spinner("Fetching artist releases...");

    let relations =
        match artists::artist_label_relations(&client, &artist_id, &release_kinds).await {
            Ok(relations) => relations,
            Err(e) => {
                pb.finish_and_clear();
                error!("Cannot load releases for artist {}: {}", artist_id, e);
            }
        };
    pb.finish_and_clear();

    if relations.is_empty() {
        warning!("No releases found for artist {}.", artist_id);
        return;
    }

    let rows: Vec<LabelRelationRow> = relations
        .iter()
        .map(|r| LabelRelationRow {
            label: r.label.clone(),
            releases: r.releases.len(),
            latest: r
                .releases
                .first()
                .map(|rel| rel.release_date.clone())
                .unwrap_or_default(),
        })
        .collect();
    info!("Artist released on {} labels.", rows.len());
    println!("{}\n", Table::new(rows));

    if details {
        for relation in relations {
            let table = Table::new(utils::to_release_rows(&relation.releases));
            println!("Label: {}\n{table}\n", relation.label);
        }
    }
}
