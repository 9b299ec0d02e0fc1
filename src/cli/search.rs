use clap::ValueEnum;
use tabled::Table;

use crate::{
    client::artists::{SongSort, SortOrder},
    info,
    types::{ArtistTableRow, PlaylistTableRow},
    utils, warning,
};

use super::{api_client, song_table, spinner};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SearchKind {
    #[default]
    Songs,
    Artists,
    Playlists,
}

pub async fn search(query: String, kind: SearchKind, page: u32, limit: u32) {
    let client = api_client();
    let what = format!("{:?}", kind).to_lowercase();
    let pb = spinner(format!("Searching {} for \"{}\"...", what, query));

    match kind {
        SearchKind::Songs => {
            let result = client.search_songs(&query, page, limit).await;
            pb.finish_and_clear();
            match result {
                Ok(page) if page.results.is_empty() => info!("No songs found for \"{}\".", query),
                Ok(page) => {
                    println!("{}", song_table(&page.results));
                    info!("Showing {} of {} songs.", page.results.len(), page.total);
                }
                Err(e) => warning!("Search failed. Err: {}", e),
            }
        }
        SearchKind::Artists => {
            let result = client.search_artists(&query, page, limit).await;
            pb.finish_and_clear();
            match result {
                Ok(page) if page.results.is_empty() => {
                    info!("No artists found for \"{}\".", query)
                }
                Ok(page) => {
                    let rows: Vec<ArtistTableRow> = page
                        .results
                        .into_iter()
                        .map(|a| ArtistTableRow {
                            name: a.name,
                            role: a.role.unwrap_or_default(),
                            id: a.id,
                        })
                        .collect();
                    println!("{}", Table::new(rows));
                }
                Err(e) => warning!("Search failed. Err: {}", e),
            }
        }
        SearchKind::Playlists => {
            let result = client.search_playlists(&query, page, limit).await;
            pb.finish_and_clear();
            match result {
                Ok(page) if page.results.is_empty() => {
                    info!("No playlists found for \"{}\".", query)
                }
                Ok(page) => {
                    let rows: Vec<PlaylistTableRow> = page
                        .results
                        .into_iter()
                        .map(|p| PlaylistTableRow {
                            name: p.name,
                            songs: p.song_count.map(|c| c.to_string()).unwrap_or_default(),
                            language: p.language.unwrap_or_default(),
                            id: p.id,
                        })
                        .collect();
                    println!("{}", Table::new(rows));
                }
                Err(e) => warning!("Search failed. Err: {}", e),
            }
        }
    }
}

pub async fn song(id: String) {
    let pb = spinner("Fetching song...");
    let result = api_client().get_song(&id).await;
    pb.finish_and_clear();

    match result {
        Ok(song) => {
            println!("{}", song_table(std::slice::from_ref(&song)));
            match song.playable_url() {
                Some(url) => info!("Stream: {}", url),
                None => warning!("This song has no playable source."),
            }
            if let Some(image) = song.best_image() {
                info!("Artwork: {}", image);
            }
        }
        Err(e) => warning!("Couldn't load song {}. Err: {}", id, e),
    }
}

pub async fn album(id: String) {
    let pb = spinner("Fetching album...");
    let result = api_client().get_album(&id).await;
    pb.finish_and_clear();

    match result {
        Ok(album) => {
            println!(
                "{name} - {artists} ({year})\n{table}",
                name = album.name,
                artists = album.primary_artists,
                year = album.year.unwrap_or_else(|| "?".to_string()),
                table = song_table(&album.songs)
            );
        }
        Err(e) => warning!("Couldn't load album {}. Err: {}", id, e),
    }
}

pub async fn artist(id: String, songs: bool, page: u32, sort_by: SongSort, sort_order: SortOrder) {
    let client = api_client();
    let pb = spinner("Fetching artist...");

    if songs {
        let result = client.get_artist_songs(&id, page, sort_by, sort_order).await;
        pb.finish_and_clear();
        match result {
            Ok(page) => {
                println!("{}", song_table(&page.results));
                info!("Showing {} of {} songs.", page.results.len(), page.total);
            }
            Err(e) => warning!("Couldn't load artist songs. Err: {}", e),
        }
        return;
    }

    let result = client.get_artist(&id).await;
    pb.finish_and_clear();
    match result {
        Ok(artist) => {
            let followers = artist
                .follower_count
                .map(|c| format!("{} followers", c))
                .unwrap_or_default();
            println!("{} {}", artist.name, followers);
            if !artist.top_songs.is_empty() {
                println!("{}", song_table(&artist.top_songs));
            }
        }
        Err(e) => warning!("Couldn't load artist. Err: {}", e),
    }
}

pub async fn playlist(id: String) {
    let pb = spinner("Fetching playlist...");
    let result = api_client().get_playlist(&id).await;
    pb.finish_and_clear();

    match result {
        Ok(playlist) => {
            let total: f64 = playlist.songs.iter().filter_map(|s| s.duration).sum();
            println!(
                "{name} ({count} songs, {length})\n{table}",
                name = playlist.name,
                count = playlist.song_count.unwrap_or(playlist.songs.len() as u64),
                length = utils::format_duration(total),
                table = song_table(&playlist.songs)
            );
        }
        Err(e) => warning!("Couldn't load playlist. Err: {}", e),
    }
}
