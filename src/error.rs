//! Error taxonomy shared by the API client, the engines and the storage layer.
//!
//! Every fallible library operation returns [`TuneError`]. How each variant is
//! treated depends on where it surfaces:
//!
//! - `Network` / `Api` coming out of discovery searches are absorbed at the
//!   bucket level (next fallback term, else an empty bucket).
//! - `NoPlayableSource` is reported to listeners as a notice and the player
//!   skips ahead when it hits one during auto-advance.
//! - `StaleRequest` is returned to the caller of a superseded load and carries
//!   no user-visible effect.
//! - `StorageRead` is recovered by the managers themselves by substituting the
//!   empty default.

use std::fmt;

use reqwest::StatusCode;

#[derive(Debug)]
pub enum TuneError {
    /// Connection, DNS, TLS or body decoding failure.
    Network(reqwest::Error),
    /// Non-2xx response (or `success: false` envelope) from the remote API.
    Api { status: u16, message: String },
    /// The song has neither a direct nor a quality-tagged audio URL.
    NoPlayableSource { song_id: String },
    /// A load finished after a newer one was started.
    StaleRequest { request_id: u64 },
    /// The audio backend could not load the resource in time.
    Backend(String),
    /// Persisted state could not be read or parsed.
    StorageRead(String),
    /// Persisted state could not be written.
    Storage(String),
}

impl TuneError {
    pub fn api(status: StatusCode, message: impl Into<String>) -> Self {
        TuneError::Api {
            status: status.as_u16(),
            message: message.into(),
        }
    }

    /// HTTP status attached to the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            TuneError::Api { status, .. } => Some(*status),
            TuneError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, TuneError::StaleRequest { .. })
    }
}

impl fmt::Display for TuneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuneError::Network(e) => write!(f, "network error: {}", e),
            TuneError::Api { status, message } => write!(f, "api error ({}): {}", status, message),
            TuneError::NoPlayableSource { song_id } => {
                write!(f, "song {} has no playable source", song_id)
            }
            TuneError::StaleRequest { request_id } => {
                write!(f, "request {} was superseded", request_id)
            }
            TuneError::Backend(msg) => write!(f, "playback failed: {}", msg),
            TuneError::StorageRead(msg) => write!(f, "cannot read stored state: {}", msg),
            TuneError::Storage(msg) => write!(f, "cannot write stored state: {}", msg),
        }
    }
}

impl std::error::Error for TuneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuneError::Network(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TuneError {
    fn from(err: reqwest::Error) -> Self {
        TuneError::Network(err)
    }
}

impl From<std::io::Error> for TuneError {
    fn from(err: std::io::Error) -> Self {
        TuneError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for TuneError {
    fn from(err: serde_json::Error) -> Self {
        TuneError::StorageRead(err.to_string())
    }
}

pub type TuneResult<T> = Result<T, TuneError>;
