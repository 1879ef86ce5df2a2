use colored::Colorize;
use tabled::Table;

use crate::{
    error, info,
    management::SavedCatalogs,
    spotify::search,
    success, utils, warning,
};

/// Searches the complete discography of a label and prints it as a table.
///
/// Large catalogs escalate to the variant and year-partition phases; the
/// spinner shows which phase is running. With `save` the result is stored as
/// a saved catalog.
pub async fn label(name: String, save: bool) {
    let client = super::build_client().await;
    let pb = super::spinner(&format!("Searching catalog of {name}..."));

    // phase messages are printed above the spinner line
    let progress_pb = pb.clone();
    let progress = move |message: &str, long_running: bool| {
        progress_pb.println(format!("[{}] {}", "o".blue().bold(), message));
        if long_running {
            progress_pb.set_message(format!("{message} (large catalog, please wait)"));
        } else {
            progress_pb.set_message(message.to_string());
        }
    };

    let mut releases =
        match search::search_all_releases_for_label(&client, &name, Some(&progress)).await {
            Ok(releases) => releases,
            Err(e) => {
                pb.finish_and_clear();
                error!("No results for label {}: {}", name, e);
            }
        };
    pb.finish_and_clear();

    if releases.is_empty() {
        warning!("No releases found for label {}.", name);
        return;
    }

    utils::sort_releases_by_date_and_artist(&mut releases);
    let table = Table::new(utils::to_release_rows(&releases));
    println!("Label: {name}\tReleases: {}\n{table}\n", releases.len());

    if save {
        match SavedCatalogs::new(client.store()).save(&name, releases).await {
            Ok(id) => success!("Saved catalog as {}", id),
            Err(e) => warning!("Cannot save catalog for {}: {}", name, e),
        }
    }

    let pressure = client.pressure().await;
    info!(
        "Provider calls in the last minute: {}",
        pressure.calls_last_minute
    );
    if pressure.is_currently_throttled {
        warning!(
            "Provider is throttling, results may be incomplete. Retry in about {}s.",
            pressure.throttle_remaining_seconds
        );
    }
}
