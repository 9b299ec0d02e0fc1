//! # CLI Module
//!
//! User-facing commands of tunedeck. Each command builds what it needs from
//! the library (API client, engines, managers), runs, and prints its result
//! with the crate's output macros and `tabled` tables.
//!
//! ## Commands
//!
//! - [`search`], [`song`], [`album`], [`artist`], [`playlist`] - catalogue lookups
//! - [`discover`] - "for you", language and themed buckets for this session
//! - [`play`] - headless player over a search result list
//! - [`history`] - listening history
//! - [`prefs`] - theme and hint preferences
//! - [`collect`] - CSV export of search results
//!
//! Commands never return errors: fatal problems end the process through
//! `error!`, recoverable ones are printed with `warning!`.

mod collect;
mod discover;
mod history;
mod play;
mod search;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{client::ApiClient, error, types::{Song, SongTableRow}};

pub use collect::collect;
pub use discover::discover;
pub use history::{history, prefs};
pub use play::play;
pub use search::{SearchKind, album, artist, playlist, search, song};

pub(crate) fn api_client() -> ApiClient {
    match ApiClient::from_env() {
        Ok(client) => client,
        Err(e) => error!("Cannot create API client. Err: {}", e),
    }
}

pub(crate) fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}

pub(crate) fn song_table(songs: &[Song]) -> Table {
    let rows: Vec<SongTableRow> = songs
        .iter()
        .enumerate()
        .map(|(i, s)| SongTableRow::from_song(i + 1, s))
        .collect();
    Table::new(rows)
}
