use crate::{
    error::TuneResult,
    types::{
        ArtistSummary, PlaylistSummary, RawArtist, RawPlaylist, RawSearchPage, RawSong,
        SearchPage, Song,
    },
};

use super::ApiClient;

fn page_query(query: &str, page: u32, limit: u32) -> Vec<(&'static str, String)> {
    vec![
        ("query", query.to_string()),
        ("page", page.to_string()),
        ("limit", limit.to_string()),
    ]
}

impl ApiClient {
    /// `GET /api/search/songs?query=&page=&limit=`
    pub async fn search_songs(
        &self,
        query: &str,
        page: u32,
        limit: u32,
    ) -> TuneResult<SearchPage<Song>> {
        let raw: RawSearchPage<RawSong> = self
            .get_data("/api/search/songs", &page_query(query, page, limit))
            .await?;
        Ok(raw.map(Song::from))
    }

    /// `GET /api/search/artists?query=&page=&limit=`
    pub async fn search_artists(
        &self,
        query: &str,
        page: u32,
        limit: u32,
    ) -> TuneResult<SearchPage<ArtistSummary>> {
        let raw: RawSearchPage<RawArtist> = self
            .get_data("/api/search/artists", &page_query(query, page, limit))
            .await?;
        Ok(raw.map(ArtistSummary::from))
    }

    /// `GET /api/search/playlists?query=&page=&limit=`
    pub async fn search_playlists(
        &self,
        query: &str,
        page: u32,
        limit: u32,
    ) -> TuneResult<SearchPage<PlaylistSummary>> {
        let raw: RawSearchPage<RawPlaylist> = self
            .get_data("/api/search/playlists", &page_query(query, page, limit))
            .await?;
        Ok(raw.map(PlaylistSummary::from))
    }
}
