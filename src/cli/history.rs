use chrono::Local;
use tabled::Table;

use crate::{
    info,
    management::{HistoryManager, PreferencesManager, Theme},
    success,
    types::HistoryTableRow,
    warning,
};

pub async fn history(clear: bool) {
    let mut history = HistoryManager::load().await;

    if clear {
        match history.clear().await {
            Ok(()) => success!("Listening history cleared."),
            Err(e) => warning!("Couldn't clear history. Err: {}", e),
        }
        return;
    }

    if history.is_empty() {
        info!("Nothing played yet.");
        return;
    }

    let rows: Vec<HistoryTableRow> = history
        .entries()
        .iter()
        .map(|entry| HistoryTableRow {
            played: entry
                .played_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
            name: entry.name.clone(),
            artists: entry.primary_artists.clone(),
            id: entry.id.clone(),
        })
        .collect();
    println!("{}", Table::new(rows));
}

pub async fn prefs(theme: Option<Theme>, hints_seen: bool) {
    let mut prefs = PreferencesManager::load().await;
    let mut changed = false;

    if let Some(theme) = theme {
        prefs.set_theme(theme);
        changed = true;
    }
    if hints_seen {
        prefs.mark_hints_seen();
        changed = true;
    }

    if changed {
        if let Err(e) = prefs.persist().await {
            warning!("Couldn't save preferences. Err: {}", e);
            return;
        }
        success!("Preferences saved.");
    }

    let current = prefs.get();
    info!("Theme: {}", current.theme);
    info!(
        "Shortcut hints: {}",
        if current.seen_shortcut_hints { "seen" } else { "not seen yet" }
    );
}
