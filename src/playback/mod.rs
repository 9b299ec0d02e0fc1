//! # Playback
//!
//! The player behind every surface of the client: current track, upcoming
//! queue, play/pause/seek/volume and the next/previous/shuffle/repeat rules.
//!
//! The engine never talks to an audio device itself. It steers an
//! [`AudioBackend`] and listens for [`MediaEvent`]s tagged with the request id
//! of the load they belong to, so a late answer for a track the user already
//! skipped can never take the player back. State changes are published as
//! [`PlayerEvent`]s on a broadcast channel; any front end subscribes without
//! the engine knowing about it.
//!
//! ## Transition rules
//!
//! | action | outcome |
//! |---|---|
//! | next, repeat one | current track restarts |
//! | next, queue not empty | queue head becomes current |
//! | next, queue empty, shuffle | random song of the last context (not the current one) |
//! | next, queue empty, repeat all | context starts over from its first song |
//! | next, otherwise | playback stops, current song kept |
//! | previous, past 3 s | current track restarts |
//! | previous, within 3 s | previously played track, current goes back to the queue front |
//!
//! A track that fails to load is reported and treated like an ended one for
//! auto-advance; when nothing follows, the player stays paused on it.

use std::fmt;

mod backend;
mod engine;
mod queue;
mod state;

use crate::types::Song;

pub use backend::{AudioBackend, HttpProbeBackend, MediaEvent};
pub use engine::{PlaybackEngine, RESTART_THRESHOLD_SECS};
pub use queue::Queue;
pub use state::{PlaybackState, PlayerSnapshot, PlayerStatus, RepeatMode};

#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackError {
    NoPlayableSource { song_id: String },
    LoadFailed { song_id: String, reason: String },
}

impl PlaybackError {
    pub fn song_id(&self) -> &str {
        match self {
            PlaybackError::NoPlayableSource { song_id } => song_id,
            PlaybackError::LoadFailed { song_id, .. } => song_id,
        }
    }
}

impl fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackError::NoPlayableSource { song_id } => {
                write!(f, "song {} has no playable source", song_id)
            }
            PlaybackError::LoadFailed { song_id, reason } => {
                write!(f, "couldn't load song {}: {}", song_id, reason)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    TrackChanged(Song),
    StatusChanged(PlayerStatus),
    Progress { position: f64, duration: f64 },
    QueueChanged(usize),
    VolumeChanged(f64),
    ModesChanged { repeat: RepeatMode, shuffle: bool },
    /// Transient, user-facing message.
    Notice(String),
    Error(PlaybackError),
}
