use std::sync::Arc;

use chrono::Utc;

use crate::{
    Result,
    management::KeyValueStore,
    types::{LabelCatalog, Release, SavedCatalogSummary},
    utils,
};

pub const CATALOG_KEY_PREFIX: &str = "savedCatalog:";

/// Saved label catalogs, one plain blob per opaque id.
///
/// Unlike telemetry, storage failures are returned to the caller.
pub struct SavedCatalogs {
    store: Arc<dyn KeyValueStore>,
}

impl SavedCatalogs {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stores the releases of `label` and returns the catalog id.
    pub async fn save(&self, label: &str, releases: Vec<Release>) -> Result<String> {
        let id = utils::catalog_id(label);
        let catalog = LabelCatalog {
            name: label.to_string(),
            releases,
            saved_at: Utc::now().timestamp_millis(),
        };
        self.store
            .set(&Self::key(&id), serde_json::to_value(&catalog)?)
            .await?;
        Ok(id)
    }

    pub async fn load(&self, id: &str) -> Result<Option<LabelCatalog>> {
        match self.store.get(&Self::key(id)).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub async fn remove(&self, id: &str) -> Result<()> {
        self.store.remove(&Self::key(id)).await
    }

    /// Summaries of all saved catalogs, most recently saved first.
    pub async fn list(&self) -> Result<Vec<SavedCatalogSummary>> {
        let mut summaries = Vec::new();
        for key in self.store.keys(CATALOG_KEY_PREFIX).await? {
            let id = key.trim_start_matches(CATALOG_KEY_PREFIX).to_string();
            // entries that no longer decode are skipped
            if let Ok(Some(catalog)) = self.load(&id).await {
                summaries.push(SavedCatalogSummary {
                    id,
                    name: catalog.name,
                    release_count: catalog.releases.len(),
                    saved_at: catalog.saved_at,
                });
            }
        }
        summaries.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(summaries)
    }

    fn key(id: &str) -> String {
        format!("{CATALOG_KEY_PREFIX}{id}")
    }
}
