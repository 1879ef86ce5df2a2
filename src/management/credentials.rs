use crate::{Result, management::KeyValueStore, types::Credential};

pub const CREDENTIALS_KEY: &str = "clientCredentials";

/// Reads the stored credential.
///
/// An unavailable store or an undecodable entry reads as "not configured".
pub async fn load_credential(store: &dyn KeyValueStore) -> Option<Credential> {
    let value = store.get(CREDENTIALS_KEY).await.ok()??;
    let credential: Credential = serde_json::from_value(value).ok()?;
    if credential.client_id.is_empty() || credential.client_secret.is_empty() {
        return None;
    }
    Some(credential)
}

pub async fn save_credential(store: &dyn KeyValueStore, credential: &Credential) -> Result<()> {
    store
        .set(CREDENTIALS_KEY, serde_json::to_value(credential)?)
        .await
}
