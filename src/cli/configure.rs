use crate::{
    error,
    management::{FileStore, save_credential},
    success,
    types::Credential,
};

/// Stores the client credential in the local key-value store.
///
/// The next client built picks it up with a fresh token and an empty cache.
pub async fn configure(client_id: String, client_secret: String) {
    if client_id.trim().is_empty() || client_secret.trim().is_empty() {
        error!("Client id and client secret must not be empty.");
    }

    let store = FileStore::default_location();
    let credential = Credential::new(client_id.trim(), client_secret.trim());
    match save_credential(&store, &credential).await {
        Ok(_) => success!("Credentials saved to {}", store.path().display()),
        Err(e) => error!("Cannot save credentials: {}", e),
    }
}
