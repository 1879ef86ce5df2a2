//! Configuration management for the label catalog explorer.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory. Every key has a default so the client can
//! be built without any configuration apart from the credential.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use crate::types::Credential;

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Loads environment variables from `<data_local_dir>/labelscout/.env`.
///
/// Creates the directory if it does not exist yet. A missing `.env` file is
/// not an error; every setting has a default and credentials may come from
/// the key-value store instead.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/labelscout/.env`
/// - macOS: `~/Library/Application Support/labelscout/.env`
/// - Windows: `%LOCALAPPDATA%/labelscout/.env`
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Returns the application's local data directory.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("labelscout");
    path
}

/// Returns the Spotify Web API base URL (`SPOTIFY_API_URL`).
pub fn spotify_apiurl() -> String {
    env::var("SPOTIFY_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

/// Returns the client-credentials token endpoint (`SPOTIFY_API_TOKEN_URL`).
pub fn spotify_apitoken_url() -> String {
    env::var("SPOTIFY_API_TOKEN_URL").unwrap_or_else(|_| DEFAULT_TOKEN_URL.to_string())
}

/// Reads the client credential from `SPOTIFY_API_AUTH_CLIENT_ID` and
/// `SPOTIFY_API_AUTH_CLIENT_SECRET`.
///
/// Returns `None` unless both are set and non-empty.
pub fn credential_from_env() -> Option<Credential> {
    let client_id = env::var("SPOTIFY_API_AUTH_CLIENT_ID").ok()?;
    let client_secret = env::var("SPOTIFY_API_AUTH_CLIENT_SECRET").ok()?;
    if client_id.trim().is_empty() || client_secret.trim().is_empty() {
        return None;
    }
    Some(Credential::new(client_id, client_secret))
}

/// Optional market code passed to search and lookup endpoints (`LABELSCOUT_MARKET`).
pub fn market() -> Option<String> {
    env::var("LABELSCOUT_MARKET")
        .ok()
        .filter(|m| !m.trim().is_empty())
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

/// Tunables for the exhaustive label search.
///
/// The truncation threshold and escalation bounds are empirical values for
/// the provider's undocumented search window and should be revalidated if the
/// provider changes its behavior.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Items requested per page.
    pub page_size: u32,
    /// Direct-phase result count at or above which escalation starts.
    pub truncation_threshold: usize,
    /// Maximum number of alternate label spellings searched.
    pub max_variants: usize,
    /// Width of a year partition in the temporal phase.
    pub year_chunk_size: i32,
    /// First year of the temporal phase.
    pub earliest_year: i32,
    /// Item cap per year partition; bounds the pages fetched per chunk.
    pub max_items_per_chunk: u32,
    /// Largest offset the provider's search endpoint accepts.
    pub max_offset: u32,
    /// Extra delay between pages of one paginated query.
    pub page_delay: Duration,
    /// Delay between variant and year-partition sub-queries.
    pub subquery_delay: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: 50,
            truncation_threshold: 90,
            max_variants: 5,
            year_chunk_size: 5,
            earliest_year: 1950,
            max_items_per_chunk: 200,
            max_offset: 1000,
            page_delay: Duration::from_millis(150),
            subquery_delay: Duration::from_millis(300),
        }
    }
}

impl SearchConfig {
    /// Pages fetched at most for a single year partition.
    pub fn max_pages_per_chunk(&self) -> usize {
        let page = self.page_size.max(1);
        self.max_items_per_chunk.div_ceil(page).max(1) as usize
    }
}

/// Everything the [`crate::spotify::CatalogClient`] needs to run.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub token_url: String,
    pub market: Option<String>,
    /// Minimum spacing between two provider calls.
    pub min_request_interval: Duration,
    /// Per-request timeout; a hung call is rejected and the queue advances.
    pub request_timeout: Duration,
    /// A token is refreshed this long before it expires.
    pub token_expiry_skew: Duration,
    /// How long a cached response stays fresh.
    pub cache_freshness: Duration,
    /// Throttle window assumed when a 429 carries no `Retry-After`.
    pub default_throttle: Duration,
    pub search: SearchConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            market: None,
            min_request_interval: Duration::from_millis(100),
            request_timeout: Duration::from_secs(30),
            token_expiry_skew: Duration::from_secs(60),
            cache_freshness: Duration::from_secs(24 * 60 * 60),
            default_throttle: Duration::from_secs(30),
            search: SearchConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Builds the configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let search_defaults = SearchConfig::default();

        Self {
            api_url: spotify_apiurl(),
            token_url: spotify_apitoken_url(),
            market: market(),
            min_request_interval: Duration::from_millis(env_or(
                "LABELSCOUT_MIN_INTERVAL_MS",
                defaults.min_request_interval.as_millis() as u64,
            )),
            request_timeout: Duration::from_secs(env_or(
                "LABELSCOUT_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )),
            search: SearchConfig {
                truncation_threshold: env_or(
                    "LABELSCOUT_TRUNCATION_THRESHOLD",
                    search_defaults.truncation_threshold,
                ),
                page_delay: Duration::from_millis(env_or(
                    "LABELSCOUT_PAGE_DELAY_MS",
                    search_defaults.page_delay.as_millis() as u64,
                )),
                subquery_delay: Duration::from_millis(env_or(
                    "LABELSCOUT_SUBQUERY_DELAY_MS",
                    search_defaults.subquery_delay.as_millis() as u64,
                )),
                ..search_defaults
            },
            ..defaults
        }
    }

    /// Points the client at another provider host, e.g. a local mock.
    pub fn with_base_urls(mut self, api_url: impl Into<String>, token_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self.token_url = token_url.into();
        self
    }
}
