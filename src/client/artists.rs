use std::fmt;

use crate::{
    error::TuneResult,
    types::{Artist, RawArtist, RawArtistSongs, SearchPage, Song},
};

use super::ApiClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SongSort {
    #[default]
    Popularity,
    Latest,
    Alphabetical,
}

impl fmt::Display for SongSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SongSort::Popularity => "popularity",
            SongSort::Latest => "latest",
            SongSort::Alphabetical => "alphabetical",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

pub fn parse_song_sort(s: &str) -> Result<SongSort, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "popularity" => Ok(SongSort::Popularity),
        "latest" => Ok(SongSort::Latest),
        "alphabetical" => Ok(SongSort::Alphabetical),
        other => Err(format!(
            "invalid value '{}'; expected one of: popularity, latest, alphabetical",
            other
        )),
    }
}

pub fn parse_sort_order(s: &str) -> Result<SortOrder, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "asc" => Ok(SortOrder::Asc),
        "desc" => Ok(SortOrder::Desc),
        other => Err(format!("invalid value '{}'; expected asc or desc", other)),
    }
}

impl ApiClient {
    /// `GET /api/artists/:id`
    pub async fn get_artist(&self, id: &str) -> TuneResult<Artist> {
        let raw: RawArtist = self.get_data(&format!("/api/artists/{}", id), &[]).await?;
        Ok(Artist::from(raw))
    }

    /// `GET /api/artists/:id/songs?page=&sortBy=&sortOrder=`
    pub async fn get_artist_songs(
        &self,
        id: &str,
        page: u32,
        sort_by: SongSort,
        sort_order: SortOrder,
    ) -> TuneResult<SearchPage<Song>> {
        let raw: RawArtistSongs = self
            .get_data(
                &format!("/api/artists/{}/songs", id),
                &[
                    ("page", page.to_string()),
                    ("sortBy", sort_by.to_string()),
                    ("sortOrder", sort_order.to_string()),
                ],
            )
            .await?;

        let songs: Vec<Song> = raw.songs.into_iter().map(Song::from).collect();
        Ok(SearchPage {
            total: raw
                .total
                .and_then(|t| t.as_u64())
                .unwrap_or(songs.len() as u64),
            start: 0,
            results: songs,
        })
    }
}
