use std::{fmt, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::config;

use super::{StorageError, read_json, write_json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl Theme {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub seen_shortcut_hints: bool,
}

pub struct PreferencesManager {
    path: PathBuf,
    preferences: Preferences,
}

impl PreferencesManager {
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            preferences: Preferences::default(),
        }
    }

    pub async fn load() -> Self {
        Self::with_path(config::data_dir().join("preferences.json"))
            .reload()
            .await
    }

    /// Missing or unreadable preferences fall back to the defaults.
    pub async fn reload(mut self) -> Self {
        self.preferences = read_json(&self.path).await.unwrap_or_default();
        self
    }

    pub fn get(&self) -> &Preferences {
        &self.preferences
    }

    pub fn set_theme(&mut self, theme: Theme) -> &mut Self {
        self.preferences.theme = theme;
        self
    }

    pub fn mark_hints_seen(&mut self) -> &mut Self {
        self.preferences.seen_shortcut_hints = true;
        self
    }

    pub async fn persist(&self) -> Result<(), StorageError> {
        write_json(&self.path, &self.preferences).await
    }
}
