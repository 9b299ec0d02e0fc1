//! Batch export of search results to CSV.
//!
//! Walks a list of search terms, requests a few pages of songs for each and
//! appends one `song_id,song_name,artist,album,year` row per song to a CSV
//! file. Songs whose id is already in the file (from this or an earlier run)
//! are skipped. A term that fails is recorded and the run moves on.

use std::{
    collections::HashSet,
    path::Path,
    time::Duration,
};

use indicatif::ProgressBar;
use tokio::time::sleep;

use crate::{
    client::SongSearch,
    discovery::{FOR_YOU, LANGUAGES, THEMES},
    error::TuneResult,
    types::Song,
    utils,
};

pub const CSV_HEADER: &str = "song_id,song_name,artist,album,year";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectReport {
    pub written: usize,
    pub duplicates: usize,
    pub failed_terms: Vec<String>,
}

/// Every curated discovery term, in pool order, without repeats.
pub fn default_terms() -> Vec<String> {
    let mut seen = HashSet::new();
    std::iter::once(&FOR_YOU)
        .chain(LANGUAGES.iter())
        .chain(THEMES.iter())
        .flat_map(|spec| spec.terms.iter())
        .filter(|t| seen.insert(t.to_lowercase()))
        .map(|t| t.to_string())
        .collect()
}

pub fn song_row(song: &Song) -> String {
    [
        song.id.as_str(),
        song.name.as_str(),
        song.primary_artists.as_str(),
        song.album_name(),
        song.year.as_deref().unwrap_or(""),
    ]
    .iter()
    .map(|f| utils::csv_field(f))
    .collect::<Vec<_>>()
    .join(",")
}

/// Ids already present in `content`, skipping the header line.
pub fn existing_ids(content: &str) -> HashSet<String> {
    content
        .lines()
        .filter(|l| !l.trim().is_empty() && *l != CSV_HEADER)
        .filter_map(|l| utils::split_csv_line(l).into_iter().next())
        .collect()
}

pub async fn collect_songs<S: SongSearch>(
    search: &S,
    terms: &[String],
    pages: u32,
    page_size: u32,
    delay: Duration,
    output: &Path,
    progress: Option<&ProgressBar>,
) -> TuneResult<CollectReport> {
    let mut content = match async_fs::read_to_string(output).await {
        Ok(existing) => existing,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };
    if content.trim().is_empty() {
        content = format!("{}\n", CSV_HEADER);
    } else if !content.ends_with('\n') {
        content.push('\n');
    }

    let mut ids = existing_ids(&content);
    let mut report = CollectReport::default();

    for (index, term) in terms.iter().enumerate() {
        if let Some(pb) = progress {
            pb.set_message(format!(
                "Searching \"{}\" ({}/{}), {} new rows",
                term,
                index + 1,
                terms.len(),
                report.written
            ));
        }

        for page in 0..pages.max(1) {
            let songs = match search.find_songs(term, page, page_size).await {
                Ok(songs) => songs,
                Err(_) => {
                    report.failed_terms.push(term.clone());
                    break;
                }
            };
            if songs.is_empty() {
                break;
            }

            for song in songs {
                if !ids.insert(song.id.clone()) {
                    report.duplicates += 1;
                    continue;
                }
                content.push_str(&song_row(&song));
                content.push('\n');
                report.written += 1;
            }
        }

        if !delay.is_zero() && index + 1 < terms.len() {
            sleep(delay).await;
        }
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        async_fs::create_dir_all(parent).await?;
    }
    async_fs::write(output, content).await?;

    Ok(report)
}
