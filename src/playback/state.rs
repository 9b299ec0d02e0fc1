use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Song;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    #[default]
    None,
    All,
    One,
}

impl RepeatMode {
    /// `none → all → one → none`
    pub fn cycle(self) -> Self {
        match self {
            RepeatMode::None => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::None,
        }
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepeatMode::None => write!(f, "none"),
            RepeatMode::All => write!(f, "all"),
            RepeatMode::One => write!(f, "one"),
        }
    }
}

/// Lifecycle of the current track.
///
/// `Idle → Loading → Playing ⇄ Paused → Ended`, with `Error` reachable from
/// any state when the audio resource fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerStatus {
    #[default]
    Idle,
    Loading,
    Playing,
    Paused,
    Ended,
    Error,
}

/// Everything a UI needs to render the player.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub current_song: Option<Song>,
    pub is_playing: bool,
    pub progress: f64,
    pub duration: f64,
    pub volume: f64,
    pub repeat_mode: RepeatMode,
    pub shuffle_mode: bool,
    pub status: PlayerStatus,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_song: None,
            is_playing: false,
            progress: 0.0,
            duration: 0.0,
            volume: 1.0,
            repeat_mode: RepeatMode::None,
            shuffle_mode: false,
            status: PlayerStatus::Idle,
        }
    }
}

impl PlaybackState {
    pub fn current_id(&self) -> Option<&str> {
        self.current_song.as_ref().map(|s| s.id.as_str())
    }
}

/// Read-only copy of the player taken under one lock.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlayerSnapshot {
    pub state: PlaybackState,
    pub queue: Vec<Song>,
    pub previous: usize,
}
