use std::path::PathBuf;

use chrono::Utc;

use crate::{
    config,
    types::{Song, SongSummary},
};

use super::{StorageError, read_json, remove_file, write_json};

pub const HISTORY_LIMIT: usize = 10;

/// Recently played songs, most recent first, at most [`HISTORY_LIMIT`] entries
/// and never two entries with the same id.
pub struct HistoryManager {
    path: PathBuf,
    entries: Vec<SongSummary>,
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::with_path(Self::history_path())
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            entries: Vec::new(),
        }
    }

    /// Loads the stored history from the default location.
    pub async fn load() -> Self {
        Self::new().reload().await
    }

    /// Re-reads the backing file. A missing or corrupt file yields an empty
    /// history.
    pub async fn reload(mut self) -> Self {
        self.entries = read_json::<Vec<SongSummary>>(&self.path)
            .await
            .map(normalize)
            .unwrap_or_default();
        self
    }

    /// Moves `song` to the front, dropping any older entry with the same id.
    pub fn record(&mut self, song: &Song) -> &mut Self {
        self.entries.retain(|e| e.id != song.id);
        self.entries.insert(0, song.summary(Utc::now()));
        self.entries.truncate(HISTORY_LIMIT);
        self
    }

    pub async fn persist(&self) -> Result<(), StorageError> {
        write_json(&self.path, &self.entries).await
    }

    pub async fn clear(&mut self) -> Result<(), StorageError> {
        self.entries.clear();
        remove_file(&self.path).await
    }

    pub fn entries(&self) -> &[SongSummary] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn history_path() -> PathBuf {
        config::data_dir().join("history.json")
    }
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new()
    }
}

// hand-edited files may break the invariants
fn normalize(entries: Vec<SongSummary>) -> Vec<SongSummary> {
    let mut out: Vec<SongSummary> = Vec::with_capacity(HISTORY_LIMIT);
    for entry in entries {
        if out.len() == HISTORY_LIMIT {
            break;
        }
        if !out.iter().any(|e| e.id == entry.id) {
            out.push(entry);
        }
    }
    out
}
