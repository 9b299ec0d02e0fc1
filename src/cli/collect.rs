use std::{path::PathBuf, time::Duration};

use crate::{
    collect::{collect_songs, default_terms},
    discovery::DEFAULT_PAGE_SIZE,
    error, info, success, warning,
};

use super::{api_client, spinner};

pub async fn collect(output: PathBuf, terms: Vec<String>, pages: u32, delay_ms: u64) {
    let terms = if terms.is_empty() { default_terms() } else { terms };
    info!("Collecting {} terms into {}", terms.len(), output.display());

    let pb = spinner("Starting...");
    let result = collect_songs(
        &api_client(),
        &terms,
        pages,
        DEFAULT_PAGE_SIZE,
        Duration::from_millis(delay_ms),
        &output,
        Some(&pb),
    )
    .await;
    pb.finish_and_clear();

    let report = match result {
        Ok(report) => report,
        Err(e) => error!("Cannot write {}. Err: {}", output.display(), e),
    };

    success!(
        "{} new songs written, {} duplicates skipped.",
        report.written,
        report.duplicates
    );
    if !report.failed_terms.is_empty() {
        warning!("Failed terms: {}", report.failed_terms.join(", "));
    }
}
