use std::path::PathBuf;

use chrono::Utc;

use crate::{config, discovery::Session};

use super::{StorageError, read_json, remove_file, write_json};

/// Keeps the discovery session between invocations until it expires.
pub struct SessionManager {
    path: PathBuf,
    ttl: chrono::Duration,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::with_path(
            config::data_dir().join("state/session.json"),
            config::session_ttl(),
        )
    }

    pub fn with_path(path: PathBuf, ttl: chrono::Duration) -> Self {
        Self { path, ttl }
    }

    /// Returns the stored session, or a fresh one if there is none, it is
    /// unreadable or it has expired.
    pub async fn load_or_start(&self) -> Session {
        match read_json::<Session>(&self.path).await {
            Ok(session) if !session.is_expired(Utc::now(), self.ttl) => session,
            _ => Session::start(),
        }
    }

    pub async fn persist(&self, session: &Session) -> Result<(), StorageError> {
        write_json(&self.path, session).await
    }

    pub async fn discard(&self) -> Result<(), StorageError> {
        remove_file(&self.path).await
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}
