//! Configuration management for tunedeck.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory. Every setting has a default so the client
//! works without any configuration at all.
//!
//! The lookup order is:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Built-in defaults

use std::{env, path::PathBuf, time::Duration};

pub const DEFAULT_API_URL: &str = "https://saavn.dev";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;
const DEFAULT_LOAD_TIMEOUT_SECS: u64 = 8;
const DEFAULT_SESSION_TTL_MINUTES: i64 = 60;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the `tunedeck` data directory if it doesn't exist yet. A missing
/// `.env` file is fine; a present but unreadable one is reported.
///
/// The file is looked up in:
/// - Linux: `~/.local/share/tunedeck/.env`
/// - macOS: `~/Library/Application Support/tunedeck/.env`
/// - Windows: `%LOCALAPPDATA%/tunedeck/.env`
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path)
        .map(|_| ())
        .map_err(|e| format!("cannot parse {}: {}", path.display(), e))
}

/// Root directory for everything tunedeck persists.
///
/// `TUNEDECK_DATA_DIR` overrides the platform default.
pub fn data_dir() -> PathBuf {
    match env::var("TUNEDECK_DATA_DIR") {
        Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => {
            let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
            path.push("tunedeck");
            path
        }
    }
}

/// Base URL of the song-metadata API, without a trailing slash.
pub fn api_url() -> String {
    env::var("TUNEDECK_API_URL")
        .ok()
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
        .trim_end_matches('/')
        .to_string()
}

/// Timeout applied to every API request.
pub fn http_timeout() -> Duration {
    Duration::from_secs(env_u64("TUNEDECK_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS))
}

/// How long the player waits for an audio resource before giving up on it.
pub fn load_timeout() -> Duration {
    Duration::from_secs(env_u64("TUNEDECK_LOAD_TIMEOUT_SECS", DEFAULT_LOAD_TIMEOUT_SECS))
}

/// Lifetime of a discovery session.
pub fn session_ttl() -> chrono::Duration {
    let minutes = env::var("TUNEDECK_SESSION_TTL_MINUTES")
        .ok()
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|m| *m > 0)
        .unwrap_or(DEFAULT_SESSION_TTL_MINUTES);
    chrono::Duration::minutes(minutes)
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}
