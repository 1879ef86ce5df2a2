//! # Spotify Integration Module
//!
//! Rate-governed access to the Spotify Web API. Every provider call goes
//! through one [`CatalogClient`]:
//!
//! ```text
//! caller (CLI, label search, entity lookups)
//!          ↓
//! ResponseCache (24h freshness)
//!          ↓
//! RequestScheduler (FIFO, one in flight, minimum spacing)
//!          ↓  bearer token from TokenProvider
//! Spotify Web API
//!          ↓
//! UsageTelemetry (calls, throttle events)
//! ```
//!
//! ## Modules
//!
//! - [`auth`] - client-credentials token exchange and caching
//! - [`scheduler`] - the single-consumer request queue
//! - [`client`] - the facade tying cache, scheduler, tokens and telemetry together
//! - [`search`] - exhaustive label search with variant and year-partition escalation
//! - [`albums`] - album/track lookups and label resolution
//! - [`artists`] - artist discographies and cross-label relations
//!
//! ## Throttling
//!
//! A 429 is recorded in telemetry and surfaced as
//! [`crate::CatalogError::ThrottledByProvider`]. The scheduler never retries
//! on its own; callers decide.
//!
//! ## API Coverage
//!
//! - `POST /api/token` - client-credentials exchange
//! - `GET /search?type=album&q=label:"..."` - label search
//! - `GET /albums/{id}`, `GET /albums?ids=` - album details incl. label
//! - `GET /tracks/{id}` - track lookup
//! - `GET /artists/{id}/albums` - artist discography

pub mod albums;
pub mod artists;
pub mod auth;
pub mod client;
pub mod scheduler;
pub mod search;

pub use client::CatalogClient;
