//! Label Catalog Explorer Library
//!
//! This library resolves the record label behind a Spotify track or album and
//! explores that label's full discography. All provider traffic goes through a
//! single rate-governed client that paces requests, recovers from throttling,
//! caches responses and escalates to an exhaustive multi-strategy search when
//! a label's result set looks truncated.
//!
//! # Modules
//!
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error taxonomy shared by every layer
//! - `management` - Key-value storage, response cache, usage telemetry and saved catalogs
//! - `spotify` - Rate-governed Spotify Web API client and label search
//! - `types` - Data structures and type definitions
//! - `utils` - Label variants, year partitioning and other helpers
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use labelscout::{config, management::FileStore, spotify};
//!
//! #[tokio::main]
//! async fn main() -> labelscout::Result<()> {
//!     config::load_env().await.ok();
//!     let store = Arc::new(FileStore::default_location());
//!     let client = spotify::CatalogClient::from_store(config::ClientConfig::from_env(), store).await?;
//!     let releases = spotify::search::search_all_releases_for_label(&client, "Warp Records", None).await?;
//!     println!("{} releases", releases.len());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod spotify;
pub mod types;
pub mod utils;

pub use error::{CatalogError, Result};

/// Prints an informational message with a blue bullet point.
///
/// Used for general information and status updates throughout the
/// application.
///
/// # Example
///
/// ```
/// info!("Searching catalog for {}...", label);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Saved catalog {}", id);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only the binary uses this macro. Library code returns a
/// [`CatalogError`] instead of terminating.
///
/// # Example
///
/// ```
/// error!("Failed to build client: {}", e);
/// // Program exits here
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used by the commands for recoverable issues such as a throttled provider
/// or a catalog that could not be saved.
///
/// # Example
///
/// ```
/// warning!("Provider throttled the request, retry after {}s", secs);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
