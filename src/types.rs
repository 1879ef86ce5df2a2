use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Client id/secret pair for the client-credentials exchange.
///
/// `Debug` never prints either value.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub client_id: String,
    pub client_secret: String,
}

impl Credential {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("client_id", &"<redacted>")
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

/// Upper bound for a token lifetime reported by the provider.
pub const MAX_TOKEN_LIFETIME_SECS: u64 = 24 * 60 * 60;

impl BearerToken {
    /// Creates a token expiring `expires_in_secs` after `obtained_at`.
    ///
    /// Lifetimes above [`MAX_TOKEN_LIFETIME_SECS`] are clamped.
    pub fn new(value: String, expires_in_secs: u64, obtained_at: DateTime<Utc>) -> Self {
        let lifetime = Duration::try_seconds(expires_in_secs.min(MAX_TOKEN_LIFETIME_SECS) as i64)
            .unwrap_or_default();
        Self {
            value,
            expires_at: obtained_at
                .checked_add_signed(lifetime)
                .unwrap_or(obtained_at),
        }
    }

    /// A token is usable while `now < expires_at - skew`.
    pub fn is_fresh_at(&self, now: DateTime<Utc>, skew: Duration) -> bool {
        now < self.expires_at - skew
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerToken")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseArtist {
    pub id: String,
    pub name: String,
}

/// Snapshot of a provider album as returned by search and listing endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub id: String,
    #[serde(rename = "name")]
    pub title: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub release_date_precision: String,
    #[serde(default)]
    pub album_type: String,
    #[serde(default)]
    pub total_tracks: Option<u32>,
    #[serde(default)]
    pub artists: Vec<ReleaseArtist>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

impl Release {
    pub fn external_url(&self) -> Option<&str> {
        self.external_urls.spotify.as_deref()
    }

    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Offset-paginated envelope used by search and listing endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchAlbumsResponse {
    pub albums: Page<Release>,
}

/// Full album object, the only place the provider exposes the label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumDetail {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub release_date_precision: String,
    #[serde(default)]
    pub album_type: String,
    #[serde(default)]
    pub total_tracks: Option<u32>,
    #[serde(default)]
    pub popularity: Option<u32>,
    #[serde(default)]
    pub artists: Vec<ReleaseArtist>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

impl AlbumDetail {
    pub fn to_release(&self) -> Release {
        Release {
            id: self.id.clone(),
            title: self.name.clone(),
            release_date: self.release_date.clone(),
            release_date_precision: self.release_date_precision.clone(),
            album_type: self.album_type.clone(),
            total_tracks: self.total_tracks,
            artists: self.artists.clone(),
            images: self.images.clone(),
            external_urls: self.external_urls.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeveralAlbumsResponse {
    pub albums: Vec<Option<AlbumDetail>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackDetail {
    pub id: String,
    pub name: String,
    pub album: Release,
    #[serde(default)]
    pub artists: Vec<ReleaseArtist>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

/// A label and the releases found for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelCatalog {
    pub name: String,
    pub releases: Vec<Release>,
    /// Unix timestamp in milliseconds.
    pub saved_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedCatalogSummary {
    pub id: String,
    pub name: String,
    pub release_count: usize,
    pub saved_at: i64,
}

/// Releases of one artist published under one label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRelation {
    pub label: String,
    pub releases: Vec<Release>,
}

/// Persisted usage counters, stored as camelCase JSON.
///
/// Timestamps are Unix milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UsageRecord {
    pub calls_today: u64,
    pub calls_this_hour: u64,
    pub recent_call_timestamps: Vec<i64>,
    /// `YYYY-MM-DD` of the day `calls_today` counts.
    pub day_key: Option<String>,
    /// Hours since the epoch of the hour `calls_this_hour` counts.
    pub hour_key: Option<i64>,
    pub last_throttle_at: Option<i64>,
    pub throttle_retry_after_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsagePressure {
    pub calls_last_minute: usize,
    pub calls_this_hour: u64,
    pub calls_today: u64,
    pub is_currently_throttled: bool,
    pub throttle_remaining_seconds: u64,
}

#[derive(Tabled)]
pub struct ReleaseTableRow {
    pub date: String,
    pub title: String,
    pub artists: String,
}

#[derive(Tabled)]
pub struct LabelRelationRow {
    pub label: String,
    pub releases: usize,
    pub latest: String,
}

#[derive(Tabled)]
pub struct SavedCatalogRow {
    pub id: String,
    pub name: String,
    pub releases: usize,
    pub saved: String,
}
