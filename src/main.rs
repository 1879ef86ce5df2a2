use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use labelscout::{cli, config, utils, warning};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Store Spotify client credentials
    Configure(ConfigureOptions),

    /// Search the complete catalog of a label
    Label(LabelOptions),

    /// Show an album and its label
    Album(IdOptions),

    /// Resolve the label of a track
    Track(IdOptions),

    /// Show the labels an artist released on
    Artist(ArtistOptions),

    /// List, show or remove saved catalogs
    Saved(SavedOptions),

    /// Show provider call pressure and throttle state
    Usage,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ConfigureOptions {
    /// Spotify application client id
    #[clap(long)]
    pub client_id: String,

    /// Spotify application client secret
    #[clap(long)]
    pub client_secret: String,
}

#[derive(Parser, Debug, Clone)]
pub struct LabelOptions {
    /// Label name, e.g. "Warp Records"
    pub name: String,

    /// Save the result as a catalog
    #[clap(long)]
    pub save: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct IdOptions {
    /// Spotify id
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct ArtistOptions {
    /// Spotify artist id
    pub id: String,

    /// Comma separated release types (album, single, appears_on, compilation or all)
    #[clap(
        long = "type",
        default_value = "album,single",
        value_parser = utils::parse_release_kinds,
        action = ArgAction::Set,
    )]
    pub release_types: utils::ReleaseKinds,

    /// List the releases of every label
    #[clap(long)]
    pub details: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct SavedOptions {
    /// Show the releases of a saved catalog
    #[clap(long, conflicts_with = "remove")]
    pub show: Option<String>,

    /// Remove a saved catalog
    #[clap(long)]
    pub remove: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Configure(opt) => cli::configure(opt.client_id, opt.client_secret).await,
        Command::Label(opt) => cli::label(opt.name, opt.save).await,
        Command::Album(opt) => cli::album(opt.id).await,
        Command::Track(opt) => cli::track(opt.id).await,
        Command::Artist(opt) => cli::artist(opt.id, opt.release_types, opt.details).await,
        Command::Saved(opt) => cli::saved(opt.show, opt.remove).await,
        Command::Usage => cli::usage().await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
