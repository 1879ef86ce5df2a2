use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use tokio::sync::Mutex;

use crate::{
    CatalogError, Result,
    types::{BearerToken, Credential, TokenResponse},
};

struct TokenState {
    credential: Option<Credential>,
    token: Option<BearerToken>,
}

/// Acquires and caches the bearer token from the client-credentials exchange.
///
/// The state lock is held across the exchange, so concurrent callers that
/// find no valid token wait for the single in-flight exchange and then share
/// its result.
pub struct TokenProvider {
    http: Client,
    token_url: String,
    skew: chrono::Duration,
    state: Mutex<TokenState>,
}

impl TokenProvider {
    pub fn new(
        http: Client,
        token_url: impl Into<String>,
        skew: Duration,
        credential: Option<Credential>,
    ) -> Self {
        Self {
            http,
            token_url: token_url.into(),
            skew: chrono::Duration::from_std(skew).unwrap_or(chrono::Duration::seconds(60)),
            state: Mutex::new(TokenState {
                credential,
                token: None,
            }),
        }
    }

    /// Returns the cached token while it is fresh, otherwise exchanges the
    /// credential for a new one.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::CredentialsMissing`] if no credential is configured
    /// - [`CatalogError::TokenExchangeFailed`] if the token endpoint answers non-2xx
    pub async fn get_token(&self) -> Result<BearerToken> {
        let mut state = self.state.lock().await;

        if let Some(token) = &state.token {
            if token.is_fresh_at(Utc::now(), self.skew) {
                return Ok(token.clone());
            }
        }

        let credential = state
            .credential
            .as_ref()
            .ok_or(CatalogError::CredentialsMissing)?;
        let token = self.exchange(credential).await?;
        state.token = Some(token.clone());
        Ok(token)
    }

    /// Replaces the credential and drops the cached token unconditionally.
    pub async fn reinitialize(&self, credential: Option<Credential>) {
        let mut state = self.state.lock().await;
        state.credential = credential;
        state.token = None;
    }

    /// Drops the cached token, e.g. after the provider answered 401.
    pub async fn invalidate(&self) {
        self.state.lock().await.token = None;
    }

    pub async fn has_credential(&self) -> bool {
        self.state.lock().await.credential.is_some()
    }

    async fn exchange(&self, credential: &Credential) -> Result<BearerToken> {
        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(&credential.client_id, Some(&credential.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(CatalogError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CatalogError::TokenExchangeFailed {
                status: status.as_u16(),
                message,
            });
        }

        let body: TokenResponse = response.json().await.map_err(CatalogError::from_transport)?;

        Ok(BearerToken::new(body.access_token, body.expires_in, Utc::now()))
    }
}
