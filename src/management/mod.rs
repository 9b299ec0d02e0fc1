mod history;
mod preferences;
mod session;

use std::{fmt, io::Error, path::Path};

use serde::{Serialize, de::DeserializeOwned};

use crate::error::TuneError;

pub use history::{HISTORY_LIMIT, HistoryManager};
pub use preferences::{Preferences, PreferencesManager, Theme};
pub use session::SessionManager;

#[derive(Debug)]
pub enum StorageError {
    IoError(Error),
    SerdeError(serde_json::Error),
}

impl From<Error> for StorageError {
    fn from(err: Error) -> Self {
        StorageError::IoError(err)
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::IoError(e) => write!(f, "{}", e),
            StorageError::SerdeError(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for TuneError {
    fn from(err: StorageError) -> Self {
        TuneError::Storage(err.to_string())
    }
}

/// Reads and parses a JSON blob, reporting anything unexpected as a read error.
pub(crate) async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, TuneError> {
    let content = async_fs::read_to_string(path)
        .await
        .map_err(|e| TuneError::StorageRead(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&content)
        .map_err(|e| TuneError::StorageRead(format!("{}: {}", path.display(), e)))
}

pub(crate) async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(StorageError::IoError)?;
    }

    let json = serde_json::to_string_pretty(value).map_err(StorageError::SerdeError)?;
    async_fs::write(path, json)
        .await
        .map_err(StorageError::IoError)
}

pub(crate) async fn remove_file(path: &Path) -> Result<(), StorageError> {
    match async_fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StorageError::IoError(e)),
    }
}
