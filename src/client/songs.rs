use reqwest::StatusCode;
use serde::Deserialize;

use crate::{
    error::{TuneError, TuneResult},
    types::{Album, Playlist, RawAlbum, RawPlaylist, RawSong, Song},
};

use super::ApiClient;

/// `/api/songs/:id` answers with either a bare list or `{ songs: [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSongLookup {
    List(Vec<RawSong>),
    Wrapped { songs: Vec<RawSong> },
}

impl ApiClient {
    /// `GET /api/songs/:id`
    pub async fn get_song(&self, id: &str) -> TuneResult<Song> {
        let raw: RawSongLookup = self.get_data(&format!("/api/songs/{}", id), &[]).await?;
        let songs = match raw {
            RawSongLookup::List(songs) => songs,
            RawSongLookup::Wrapped { songs } => songs,
        };

        songs
            .into_iter()
            .next()
            .map(Song::from)
            .ok_or_else(|| TuneError::api(StatusCode::NOT_FOUND, format!("song {} not found", id)))
    }

    /// `GET /api/albums?id=`
    pub async fn get_album(&self, id: &str) -> TuneResult<Album> {
        let raw: RawAlbum = self
            .get_data("/api/albums", &[("id", id.to_string())])
            .await?;
        Ok(Album::from(raw))
    }

    /// `GET /api/playlists?id=`
    pub async fn get_playlist(&self, id: &str) -> TuneResult<Playlist> {
        let raw: RawPlaylist = self
            .get_data("/api/playlists", &[("id", id.to_string())])
            .await?;
        Ok(Playlist::from(raw))
    }
}
