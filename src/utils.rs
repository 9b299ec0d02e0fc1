use std::collections::HashSet;

use crate::{management::Theme, playback::RepeatMode, types::Song};

/// Replaces the handful of HTML entities the API leaves in names.
pub fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }

    input
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Formats seconds as `m:ss` (or `h:mm:ss` past the hour).
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}

/// Keeps the first occurrence of every song id.
pub fn remove_duplicate_songs(songs: &mut Vec<Song>) {
    let mut seen_ids = HashSet::new();
    songs.retain(|song| seen_ids.insert(song.id.clone()));
}

/// Quotes a CSV field when it contains a separator, quote or line break.
pub fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Splits one CSV line into fields, honouring double-quoted fields.
pub fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Value parser for `--repeat`.
pub fn parse_repeat_mode(s: &str) -> Result<RepeatMode, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "" => Err("repeat mode cannot be empty".to_string()),
        "none" | "off" => Ok(RepeatMode::None),
        "all" => Ok(RepeatMode::All),
        "one" | "single" => Ok(RepeatMode::One),
        other => Err(format!(
            "invalid value '{}'; expected one of: none, all, one",
            other
        )),
    }
}

/// Value parser for `--theme`.
pub fn parse_theme(s: &str) -> Result<Theme, String> {
    let name = s.trim().to_ascii_lowercase();
    Theme::from_name(&name)
        .ok_or_else(|| format!("invalid theme '{}'; expected light or dark", name))
}
