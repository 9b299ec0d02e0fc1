use std::{collections::HashSet, path::PathBuf, time::Duration};

use tunedeck::{
    client::SongSearch,
    collect::{CSV_HEADER, collect_songs, default_terms, existing_ids, song_row},
    discovery::FOR_YOU,
    error::{TuneError, TuneResult},
    types::{AlbumRef, Song},
    utils,
};

/// Two pages per term; "shared" songs show up for every term.
struct FakeSearch;

impl SongSearch for FakeSearch {
    async fn find_songs(&self, query: &str, page: u32, _limit: u32) -> TuneResult<Vec<Song>> {
        if query == "broken" {
            return Err(TuneError::Api {
                status: 500,
                message: "boom".to_string(),
            });
        }
        if page >= 2 {
            return Ok(Vec::new());
        }
        let mut song = Song::new(format!("{}-{}", query, page), format!("{}, page {}", query, page))
            .with_artists("Singer");
        song.album = Some(AlbumRef {
            id: None,
            name: "Album".to_string(),
        });
        song.year = Some("2020".to_string());
        Ok(vec![song, Song::new("shared", "Everywhere")])
    }
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("tunedeck-test-{}", rand::random::<u64>()))
        .join(name)
}

fn terms(list: &[&str]) -> Vec<String> {
    list.iter().map(|t| t.to_string()).collect()
}

#[test]
fn test_song_row_quotes_fields() {
    let mut song = Song::new("id1", "Hello, World").with_artists("A \"B\"");
    song.year = Some("1999".to_string());

    let row = song_row(&song);

    assert_eq!(row, "id1,\"Hello, World\",\"A \"\"B\"\"\",,1999");
    assert_eq!(
        utils::split_csv_line(&row),
        vec!["id1", "Hello, World", "A \"B\"", "", "1999"]
    );
}

#[test]
fn test_existing_ids_skips_header_and_blank_lines() {
    let content = format!("{}\na,x,y,z,1\n\n\"b\",x,y,z,2\n", CSV_HEADER);

    let ids = existing_ids(&content);

    assert_eq!(ids, HashSet::from(["a".to_string(), "b".to_string()]));
}

#[test]
fn test_default_terms_are_unique() {
    let all = default_terms();
    let unique: HashSet<String> = all.iter().map(|t| t.to_lowercase()).collect();

    assert_eq!(unique.len(), all.len());
    assert_eq!(all[0], FOR_YOU.terms[0]);
}

#[tokio::test]
async fn test_collect_writes_deduplicated_rows() {
    let output = temp_path("songs.csv");

    let report = collect_songs(
        &FakeSearch,
        &terms(&["rock", "broken", "jazz"]),
        3,
        20,
        Duration::ZERO,
        &output,
        None,
    )
    .await
    .unwrap();

    assert_eq!(report.written, 5);
    assert_eq!(report.duplicates, 3);
    assert_eq!(report.failed_terms, vec!["broken".to_string()]);

    let content = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], CSV_HEADER);
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[1], "rock-0,\"rock, page 0\",Singer,Album,2020");
}

#[tokio::test]
async fn test_collect_appends_only_new_songs() {
    let output = temp_path("songs.csv");

    collect_songs(&FakeSearch, &terms(&["rock"]), 1, 20, Duration::ZERO, &output, None)
        .await
        .unwrap();
    let report = collect_songs(
        &FakeSearch,
        &terms(&["rock", "pop"]),
        1,
        20,
        Duration::ZERO,
        &output,
        None,
    )
    .await
    .unwrap();

    assert_eq!(report.written, 1);
    assert_eq!(report.duplicates, 3);

    let content = std::fs::read_to_string(&output).unwrap();
    assert_eq!(content.matches(CSV_HEADER).count(), 1);
    let ids = existing_ids(&content);
    assert_eq!(
        ids,
        HashSet::from(["rock-0".to_string(), "shared".to_string(), "pop-0".to_string()])
    );
}
