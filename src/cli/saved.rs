use std::sync::Arc;

use tabled::Table;

use crate::{
    error, info,
    management::{FileStore, SavedCatalogs},
    success,
    types::SavedCatalogRow,
    utils, warning,
};

/// Lists saved catalogs, or shows/removes one of them.
pub async fn saved(show: Option<String>, remove: Option<String>) {
    let catalogs = SavedCatalogs::new(Arc::new(FileStore::default_location()));

    if let Some(id) = remove {
        match catalogs.remove(&id).await {
            Ok(_) => success!("Removed saved catalog {}", id),
            Err(e) => error!("Cannot remove saved catalog {}: {}", id, e),
        }
        return;
    }

    if let Some(id) = show {
        match catalogs.load(&id).await {
            Ok(Some(mut catalog)) => {
                utils::sort_releases_by_date_and_artist(&mut catalog.releases);
                let table = Table::new(utils::to_release_rows(&catalog.releases));
                println!(
                    "Label: {}\tSaved: {}\n{table}\n",
                    catalog.name,
                    utils::format_millis(catalog.saved_at)
                );
            }
            Ok(None) => warning!("No saved catalog with id {}.", id),
            Err(e) => error!("Cannot load saved catalog {}: {}", id, e),
        }
        return;
    }

    let summaries = match catalogs.list().await {
        Ok(summaries) => summaries,
        Err(e) => error!("Cannot read saved catalogs: {}", e),
    };

    if summaries.is_empty() {
        info!("No saved catalogs yet. Use labelscout label <name> --save.");
        return;
    }

    let rows: Vec<SavedCatalogRow> = summaries
        .into_iter()
        .map(|s| SavedCatalogRow {
            id: s.id,
            name: s.name,
            releases: s.release_count,
            saved: utils::format_millis(s.saved_at),
        })
        .collect();
    println!("{}", Table::new(rows));
}
