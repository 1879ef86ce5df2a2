use std::collections::BTreeMap;

use crate::{
    Result,
    spotify::{CatalogClient, albums, scheduler::ApiRequest},
    types::{LabelRelation, Page, Release},
    utils::{self, ReleaseKinds},
};

/// Retrieves every release of an artist, filtered by release kinds.
///
/// Follows the offset pagination of `/artists/{id}/albums` until the listing
/// is exhausted or the provider's offset ceiling is reached.
pub async fn get_artist_releases(
    client: &CatalogClient,
    artist_id: &str,
    release_kinds: &ReleaseKinds,
) -> Result<Vec<Release>> {
    let settings = &client.config().search;
    let limit = settings.page_size.clamp(1, 50);
    let mut releases = Vec::new();
    let mut offset = 0u32;

    loop {
        let request = ApiRequest::new(client.endpoint(&format!("/artists/{artist_id}/albums")))
            .query("include_groups", release_kinds)
            .query("limit", limit)
            .query("offset", offset);
        let page: Page<Release> = client.fetch(client.with_market(request)).await?;

        let received = page.items.len();
        releases.extend(page.items);

        offset += limit;
        if page.next.is_none() || received < limit as usize || offset >= settings.max_offset {
            break;
        }
    }

    utils::remove_duplicate_releases(&mut releases);
    Ok(releases)
}

/// Groups an artist's releases by the label they were published on.
///
/// Releases without a label end up under `"Unknown label"`. Labels are
/// ordered by release count, largest first.
pub async fn artist_label_relations(
    client: &CatalogClient,
    artist_id: &str,
    release_kinds: &ReleaseKinds,
) -> Result<Vec<LabelRelation>> {
    let releases = get_artist_releases(client, artist_id, release_kinds).await?;
    let ids: Vec<String> = releases.iter().map(|r| r.id.clone()).collect();
    let details = albums::get_several_albums(client, &ids).await?;

    let mut by_label: BTreeMap<String, Vec<Release>> = BTreeMap::new();
    for album in details {
        let label = album
            .label
            .clone()
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| "Unknown label".to_string());
        by_label.entry(label).or_default().push(album.to_release());
    }

    let mut relations: Vec<LabelRelation> = by_label
        .into_iter()
        .map(|(label, mut releases)| {
            utils::sort_releases_by_date_and_artist(&mut releases);
            LabelRelation { label, releases }
        })
        .collect();
    relations.sort_by(|a, b| b.releases.len().cmp(&a.releases.len()));
    Ok(relations)
}
