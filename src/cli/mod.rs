//! # CLI Module
//!
//! User-facing commands of labelscout. Each command builds a
//! [`CatalogClient`](crate::spotify::CatalogClient) backed by the on-disk
//! [`FileStore`](crate::management::FileStore), runs one operation and
//! renders the result as a table or status lines.
//!
//! ## Commands
//!
//! - [`configure`] - store client credentials for the next client session
//! - [`label`] - exhaustive discography of a label, optionally saved
//! - [`album`] / [`track`] - resolve the record label of an album or track
//! - [`artist`] - an artist's releases grouped by label
//! - [`saved`] - list, show or remove saved catalogs
//! - [`usage`] - provider call pressure and throttle state
//!
//! ## Usage Patterns
//!
//! ```bash
//! labelscout configure --client-id ... --client-secret ...
//! labelscout track 11dFghVXANMlKmJXsNCbNl     # which label released this?
//! labelscout label "Warp Records" --save      # the whole catalog
//! labelscout artist 0TnOYISbd1XYRBk9myaseg    # which labels did they release on?
//! labelscout usage
//! ```

mod artist;
mod configure;
mod label;
mod lookup;
mod saved;
mod usage;

use std::{sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{config::ClientConfig, error, management::FileStore, spotify::CatalogClient};

pub use artist::artist;
pub use configure::configure;
pub use label::label;
pub use lookup::album;
pub use lookup::track;
pub use saved::saved;
pub use usage::usage;

async fn build_client() -> CatalogClient {
    let store = Arc::new(FileStore::default_location());
    match CatalogClient::from_store(ClientConfig::from_env(), store).await {
        Ok(client) => client,
        Err(e) => error!("Failed to build catalog client: {}", e),
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
