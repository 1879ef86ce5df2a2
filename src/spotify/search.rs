//! Exhaustive label search.
//!
//! The provider caps how many results one query can page through, and its
//! reported `total` is itself sometimes capped. A label whose direct search
//! comes back at or above the truncation threshold is therefore assumed to be
//! truncated, and the search escalates:
//!
//! 1. **Direct phase** - page through `label:"<name>"`.
//! 2. **Variant phase** - the same pagination for alternate spellings of the
//!    label name (known aliases, suffix stripping).
//! 3. **Temporal phase** - `label:"<name>" year:<from>-<to>` for fixed-size
//!    year partitions, each capped at a bounded number of pages.
//!
//! Everything is merged and deduplicated by release id. Variant and temporal
//! sub-queries that fail contribute nothing and are only counted in the final
//! progress message; a failing direct phase fails the search.

use chrono::{Datelike, Utc};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::{
    CatalogError, Result,
    spotify::{CatalogClient, scheduler::ApiRequest},
    types::{Release, SearchAlbumsResponse},
    utils,
};

/// Progress sink invoked at phase boundaries with a message and whether the
/// remaining work is long-running.
pub type Progress<'a> = &'a (dyn Fn(&str, bool) + Send + Sync);

/// Fetches every release the provider lists for `label`, deduplicated by id,
/// in no particular order.
pub async fn search_all_releases_for_label(
    client: &CatalogClient,
    label: &str,
    progress: Option<Progress<'_>>,
) -> Result<Vec<Release>> {
    let never = CancellationToken::new();
    search_all_releases_for_label_with_cancel(client, label, progress, &never).await
}

/// Like [`search_all_releases_for_label`], aborting with
/// [`CatalogError::Cancelled`] once `cancel` fires.
///
/// Cancellation is checked before every page and between sub-queries; a
/// request already handed to the scheduler still completes.
pub async fn search_all_releases_for_label_with_cancel(
    client: &CatalogClient,
    label: &str,
    progress: Option<Progress<'_>>,
    cancel: &CancellationToken,
) -> Result<Vec<Release>> {
    let settings = &client.config().search;
    let report = |message: &str, long_running: bool| {
        if let Some(progress) = progress {
            progress(message, long_running);
        }
    };

    report(&format!("Searching releases for {label}..."), false);
    let mut releases = paginate(client, &utils::label_query(label, None), None, cancel).await?;

    if releases.is_empty() {
        return Ok(releases);
    }

    if releases.len() < settings.truncation_threshold {
        utils::remove_duplicate_releases(&mut releases);
        return Ok(releases);
    }

    report(
        &format!(
            "Large catalog detected ({} releases), searching name variants...",
            releases.len()
        ),
        true,
    );
    let mut skipped = 0usize;
    let variants = utils::label_variants(label, settings.max_variants);
    for (i, variant) in variants.iter().enumerate() {
        if i > 0 {
            pause(settings.subquery_delay, cancel).await?;
        }
        let query = utils::label_query(variant, None);
        match paginate(client, &query, None, cancel).await {
            Ok(found) => releases.extend(found),
            Err(CatalogError::Cancelled) => return Err(CatalogError::Cancelled),
            Err(_) => skipped += 1,
        }
    }

    let chunks = utils::year_chunks(
        settings.earliest_year,
        Utc::now().year(),
        settings.year_chunk_size,
    );
    report(
        &format!(
            "Searching {} year ranges for {label}, this may take a while...",
            chunks.len()
        ),
        true,
    );
    let max_pages = settings.max_pages_per_chunk();
    for (from, to) in chunks {
        pause(settings.subquery_delay, cancel).await?;
        let query = utils::label_query(label, Some((from, to)));
        match paginate(client, &query, Some(max_pages), cancel).await {
            Ok(found) => releases.extend(found),
            Err(CatalogError::Cancelled) => return Err(CatalogError::Cancelled),
            Err(_) => skipped += 1,
        }
    }

    utils::remove_duplicate_releases(&mut releases);
    let summary = match skipped {
        0 => format!("Found {} releases for {label}.", releases.len()),
        n => format!(
            "Found {} releases for {label}, {n} sub-queries failed and were skipped.",
            releases.len()
        ),
    };
    report(&summary, false);
    Ok(releases)
}

/// Fetches one page of album search results.
pub async fn search_albums_page(
    client: &CatalogClient,
    query: &str,
    limit: u32,
    offset: u32,
) -> Result<SearchAlbumsResponse> {
    let request = ApiRequest::new(client.endpoint("/search"))
        .query("q", query)
        .query("type", "album")
        .query("limit", limit)
        .query("offset", offset);
    client.fetch(client.with_market(request)).await
}

/// Pages through `query` until a short page, the reported total, the
/// provider's offset ceiling or `max_pages` is reached.
async fn paginate(
    client: &CatalogClient,
    query: &str,
    max_pages: Option<usize>,
    cancel: &CancellationToken,
) -> Result<Vec<Release>> {
    let settings = &client.config().search;
    let page_size = settings.page_size.max(1);
    let mut releases = Vec::new();
    let mut offset: u32 = 0;
    let mut pages = 0usize;

    loop {
        if cancel.is_cancelled() {
            return Err(CatalogError::Cancelled);
        }

        let page = search_albums_page(client, query, page_size, offset).await?.albums;
        let received = page.items.len();
        releases.extend(page.items);
        pages += 1;

        let short_page = received < page_size as usize;
        let small_total = page.total < page_size as u64;
        let total_reached = (offset as u64 + received as u64) >= page.total;
        let page_cap = max_pages.is_some_and(|max| pages >= max);
        let next_offset = offset + page_size;
        let offset_cap = next_offset >= settings.max_offset;

        if short_page || small_total || total_reached || page_cap || offset_cap {
            break;
        }

        offset = next_offset;
        pause(settings.page_delay, cancel).await?;
    }

    Ok(releases)
}

async fn pause(delay: std::time::Duration, cancel: &CancellationToken) -> Result<()> {
    if !delay.is_zero() {
        tokio::select! {
            _ = cancel.cancelled() => return Err(CatalogError::Cancelled),
            _ = sleep(delay) => {}
        }
    }
    if cancel.is_cancelled() {
        return Err(CatalogError::Cancelled);
    }
    Ok(())
}
