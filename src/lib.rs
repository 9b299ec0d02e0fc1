//! tunedeck library
//!
//! Music discovery and playback on top of a public song-metadata API. The
//! crate holds the API client, the two engines a front end needs (playback
//! queue and session-based discovery), the small amount of state kept on disk,
//! and the command-line surface built from them.
//!
//! # Modules
//!
//! - `cli` - Command-line command implementations
//! - `client` - Remote metadata/search API client
//! - `collect` - Offline CSV export of search results
//! - `config` - Configuration from environment variables and `.env`
//! - `discovery` - Session-seeded "for you", language and themed buckets
//! - `error` - Error taxonomy shared across the crate
//! - `management` - Listening history, preferences and session persistence
//! - `playback` - Playback/queue engine and audio backend seam
//! - `types` - Canonical data model and API wire shapes
//! - `utils` - Formatting and parsing helpers
//!
//! # Example
//!
//! ```
//! use tunedeck::{client::ApiClient, discovery::DiscoveryEngine};
//!
//! #[tokio::main]
//! async fn main() -> tunedeck::Res<()> {
//!     tunedeck::config::load_env().await?;
//!     let engine = DiscoveryEngine::new(ApiClient::from_env()?);
//!     let mix = engine.get_for_you_mix(10).await;
//!     println!("{} songs for you", mix.songs.len());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod client;
pub mod collect;
pub mod config;
pub mod discovery;
pub mod error;
pub mod management;
pub mod playback;
pub mod types;
pub mod utils;

/// A convenient Result type alias for command-level glue code.
///
/// Library operations return [`error::TuneResult`]; the CLI layer folds the
/// various error types into this boxed form.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational line prefixed with a blue `o`.
///
/// ```
/// use tunedeck::info;
///
/// let queued = 3;
/// info!("Loading discovery buckets...");
/// info!("{} songs in queue", queued);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a line prefixed with a green check mark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a red `!` line and exits with status 1.
///
/// Only for the command layer: library code returns errors instead.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a line prefixed with a yellow `!`. Used for the transient notices
/// ("added to queue", "couldn't load artist") that never stop the program.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
