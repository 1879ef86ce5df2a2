//! Error taxonomy for the catalog client.
//!
//! Provider and transport failures propagate to the immediate caller of a
//! request. Storage failures are represented by
//! [`CatalogError::HostStorageUnavailable`] so the components that must
//! degrade silently (telemetry, credential reads) can absorb them at one
//! boundary.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// No client id/secret configured.
    #[error("no client credentials configured, run `labelscout configure`")]
    CredentialsMissing,

    /// The token endpoint rejected the client-credentials exchange.
    #[error("token exchange failed with status {status}: {message}")]
    TokenExchangeFailed { status: u16, message: String },

    /// Non-2xx response on a resource call.
    #[error("provider request failed with status {status}")]
    ProviderRequestFailed { status: u16 },

    /// HTTP 429 from the provider.
    #[error("throttled by provider (retry after {})", format_retry_after(.retry_after_seconds))]
    ThrottledByProvider { retry_after_seconds: Option<u64> },

    /// The durable key-value store cannot be reached.
    #[error("host storage unavailable: {0}")]
    HostStorageUnavailable(String),

    #[error("request timed out")]
    Timeout,

    #[error("http transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode provider payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The request was queued before the client was reinitialized and has
    /// been discarded without reaching the provider.
    #[error("request discarded because the client was reinitialized")]
    Reinitialized,

    #[error("request scheduler is no longer running")]
    SchedulerClosed,

    #[error("operation cancelled")]
    Cancelled,
}

impl CatalogError {
    /// Maps a reqwest failure, keeping timeouts distinct from other transport errors.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CatalogError::Timeout
        } else {
            CatalogError::Transport(err)
        }
    }

    pub fn is_throttled(&self) -> bool {
        matches!(self, CatalogError::ThrottledByProvider { .. })
    }
}

fn format_retry_after(seconds: &Option<u64>) -> String {
    match seconds {
        Some(s) => format!("{s}s"),
        None => "unspecified".to_string(),
    }
}
