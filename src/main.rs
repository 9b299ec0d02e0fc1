use std::path::PathBuf;

use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use tunedeck::{
    cli,
    client::artists::{SongSort, SortOrder, parse_song_sort, parse_sort_order},
    config, error,
    management::Theme,
    playback::RepeatMode,
    utils,
};

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
    /// Search songs, artists or playlists
    Search(SearchOptions),

    /// Show a single song with its stream and artwork
    Song(IdOption),

    /// Show an album and its tracks
    Album(IdOption),

    /// Show an artist or page through their songs
    Artist(ArtistOptions),

    /// Show a playlist and its tracks
    Playlist(IdOption),

    /// Songs picked for you, per language and per theme
    Discover(DiscoverOptions),

    /// Recently played songs
    History(HistoryOptions),

    #[clap(about = "Play search results through the headless player")]
    Play(PlayOptions),

    /// Show or change preferences
    Prefs(PrefsOptions),

    /// Export search results to a CSV file
    Collect(CollectOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct SearchOptions {
    pub query: String,

    #[clap(long, value_enum, default_value_t = cli::SearchKind::Songs)]
    pub kind: cli::SearchKind,

    /// Result page, starting at 0
    #[clap(long, default_value_t = 0)]
    pub page: u32,

    #[clap(long, default_value_t = 10)]
    pub limit: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct IdOption {
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct ArtistOptions {
    pub id: String,

    /// List the artist's songs instead of the profile
    #[clap(long)]
    pub songs: bool,

    #[clap(long, default_value_t = 0)]
    pub page: u32,

    /// popularity, latest or alphabetical
    #[clap(long, default_value = "popularity", value_parser = parse_song_sort)]
    pub sort_by: SongSort,

    /// asc or desc
    #[clap(long, default_value = "desc", value_parser = parse_sort_order)]
    pub sort_order: SortOrder,
}

#[derive(Parser, Debug, Clone)]
pub struct DiscoverOptions {
    /// Songs per bucket
    #[clap(long, default_value_t = 10)]
    pub limit: usize,

    /// Start a new discovery session
    #[clap(long)]
    pub refresh: bool,

    /// Include the themed buckets
    #[clap(long)]
    pub themes: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct HistoryOptions {
    #[clap(long)]
    pub clear: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct PlayOptions {
    pub query: String,

    #[clap(long)]
    pub shuffle: bool,

    /// none, all or one
    #[clap(long, default_value = "none", value_parser = utils::parse_repeat_mode)]
    pub repeat: RepeatMode,

    /// Number of search results to load into the queue
    #[clap(long, default_value_t = 20)]
    pub limit: u32,

    /// Stop after this many tracks
    #[clap(long)]
    pub tracks: Option<usize>,

    /// Playback clock multiplier
    #[clap(long, default_value_t = 1.0)]
    pub speed: f64,
}

#[derive(Parser, Debug, Clone)]
pub struct PrefsOptions {
    /// light or dark
    #[clap(long, value_parser = utils::parse_theme)]
    pub theme: Option<Theme>,

    /// Mark the keyboard shortcut hints as seen
    #[clap(long)]
    pub hints_seen: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CollectOptions {
    #[clap(long, short)]
    pub output: PathBuf,

    /// Search term; can be repeated. Defaults to every discovery term
    #[clap(long = "term", action = ArgAction::Append, num_args = 1)]
    pub terms: Vec<String>,

    /// Pages requested per term
    #[clap(long, default_value_t = 1)]
    pub pages: u32,

    /// Pause between terms in milliseconds
    #[clap(long, default_value_t = 500)]
    pub delay_ms: u64,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Search(opt) => cli::search(opt.query, opt.kind, opt.page, opt.limit).await,
        Command::Song(opt) => cli::song(opt.id).await,
        Command::Album(opt) => cli::album(opt.id).await,
        Command::Artist(opt) => {
            cli::artist(opt.id, opt.songs, opt.page, opt.sort_by, opt.sort_order).await
        }
        Command::Playlist(opt) => cli::playlist(opt.id).await,
        Command::Discover(opt) => cli::discover(opt.limit, opt.refresh, opt.themes).await,
        Command::History(opt) => cli::history(opt.clear).await,
        Command::Play(opt) => {
            cli::play(
                opt.query,
                opt.limit,
                opt.shuffle,
                opt.repeat,
                opt.tracks,
                opt.speed,
            )
            .await
        }
        Command::Prefs(opt) => cli::prefs(opt.theme, opt.hints_seen).await,
        Command::Collect(opt) => {
            cli::collect(opt.output, opt.terms, opt.pages, opt.delay_ms).await
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
