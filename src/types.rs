use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::utils;

/// One image rendition of a song, album or artist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageVariant {
    pub quality: Option<String>,
    pub url: String,
}

/// One quality-tagged audio rendition of a song.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadVariant {
    pub quality: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumRef {
    pub id: Option<String>,
    pub name: String,
}

/// Canonical song as used by the engines.
///
/// Built once from whatever shape the remote API returned (see [`RawSong`]);
/// nothing downstream ever looks at the raw payload again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: String,
    pub name: String,
    pub primary_artists: String,
    pub album: Option<AlbumRef>,
    /// Ordered from lowest to highest resolution.
    pub images: Vec<ImageVariant>,
    pub duration: Option<f64>,
    pub download_url: Option<String>,
    /// Ordered from lowest to highest quality.
    pub download_urls: Vec<DownloadVariant>,
    pub year: Option<String>,
    pub language: Option<String>,
}

impl Song {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            primary_artists: String::new(),
            album: None,
            images: Vec::new(),
            duration: None,
            download_url: None,
            download_urls: Vec::new(),
            year: None,
            language: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.download_url = Some(url.into());
        self
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_artists(mut self, artists: impl Into<String>) -> Self {
        self.primary_artists = artists.into();
        self
    }

    /// The URL the player should stream, if there is one.
    pub fn playable_url(&self) -> Option<&str> {
        self.download_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .or_else(|| {
                self.download_urls
                    .iter()
                    .rev()
                    .map(|d| d.url.as_str())
                    .find(|u| !u.trim().is_empty())
            })
    }

    pub fn is_playable(&self) -> bool {
        self.playable_url().is_some()
    }

    pub fn best_image(&self) -> Option<&str> {
        self.images.last().map(|i| i.url.as_str())
    }

    pub fn album_name(&self) -> &str {
        self.album.as_ref().map(|a| a.name.as_str()).unwrap_or("")
    }

    pub fn summary(&self, played_at: DateTime<Utc>) -> SongSummary {
        SongSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            primary_artists: self.primary_artists.clone(),
            image: self.best_image().map(str::to_string),
            duration: self.duration,
            played_at,
        }
    }
}

/// Compact song record kept in the listening history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongSummary {
    pub id: String,
    pub name: String,
    pub primary_artists: String,
    pub image: Option<String>,
    pub duration: Option<f64>,
    pub played_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    pub images: Vec<ImageVariant>,
    pub follower_count: Option<u64>,
    pub top_songs: Vec<Song>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    pub year: Option<String>,
    pub primary_artists: String,
    pub songs: Vec<Song>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub song_count: Option<u64>,
    pub songs: Vec<Song>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistSummary {
    pub id: String,
    pub name: String,
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub song_count: Option<u64>,
    pub language: Option<String>,
}

/// A page of search results.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage<T> {
    pub total: u64,
    pub start: u64,
    pub results: Vec<T>,
}

// ---------------------------------------------------------------------------
// Wire shapes. The API is loose about field names and value types; these
// structs accept every variant seen in responses and are converted right away.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub status: Option<String>,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Older deployments answer `status: "SUCCESS"` instead of `success: true`.
    pub fn is_success(&self) -> bool {
        match (self.success, self.status.as_deref()) {
            (Some(ok), _) => ok,
            (None, Some(status)) => status.eq_ignore_ascii_case("success"),
            (None, None) => self.data.is_some(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumberOrString {
    Number(f64),
    Text(String),
}

impl NumberOrString {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NumberOrString::Number(n) => Some(*n),
            NumberOrString::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.as_f64().filter(|n| *n >= 0.0).map(|n| n as u64)
    }

    pub fn into_string(self) -> String {
        match self {
            NumberOrString::Number(n) => format!("{}", n),
            NumberOrString::Text(s) => s,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawLink {
    Plain(String),
    Tagged {
        quality: Option<String>,
        link: Option<String>,
        url: Option<String>,
    },
}

impl RawLink {
    fn into_parts(self) -> Option<(Option<String>, String)> {
        match self {
            RawLink::Plain(url) => Some((None, url)),
            RawLink::Tagged { quality, link, url } => link.or(url).map(|u| (quality, u)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawLinks {
    Many(Vec<RawLink>),
    One(String),
}

impl RawLinks {
    fn into_pairs(self) -> Vec<(Option<String>, String)> {
        match self {
            RawLinks::Many(links) => links
                .into_iter()
                .filter_map(RawLink::into_parts)
                .filter(|(_, u)| !u.is_empty())
                .collect(),
            RawLinks::One(url) if !url.is_empty() => vec![(None, url)],
            RawLinks::One(_) => Vec::new(),
        }
    }

    pub fn into_images(self) -> Vec<ImageVariant> {
        self.into_pairs()
            .into_iter()
            .map(|(quality, url)| ImageVariant { quality, url })
            .collect()
    }

    pub fn into_downloads(self) -> Vec<DownloadVariant> {
        self.into_pairs()
            .into_iter()
            .map(|(quality, url)| DownloadVariant { quality, url })
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawArtistRef {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawPrimaryArtists {
    Text(String),
    List(Vec<RawArtistRef>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawArtistGroups {
    #[serde(default)]
    pub primary: Vec<RawArtistRef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawAlbumRef {
    Name(String),
    Object {
        id: Option<String>,
        name: Option<String>,
        title: Option<String>,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSong {
    pub id: String,
    pub name: Option<String>,
    pub title: Option<String>,
    pub primary_artists: Option<RawPrimaryArtists>,
    pub artists: Option<RawArtistGroups>,
    pub album: Option<RawAlbumRef>,
    pub image: Option<RawLinks>,
    pub duration: Option<NumberOrString>,
    #[serde(rename = "download_url")]
    pub download_url_plain: Option<String>,
    pub download_url: Option<RawLinks>,
    pub year: Option<NumberOrString>,
    pub language: Option<String>,
}

fn join_artist_names(refs: Vec<RawArtistRef>) -> String {
    refs.into_iter()
        .filter_map(|a| a.name)
        .map(|n| utils::decode_entities(&n))
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<RawSong> for Song {
    fn from(raw: RawSong) -> Self {
        let name = raw.name.or(raw.title).unwrap_or_default();

        let primary_artists = match (raw.primary_artists, raw.artists) {
            (Some(RawPrimaryArtists::Text(s)), _) if !s.is_empty() => utils::decode_entities(&s),
            (Some(RawPrimaryArtists::List(list)), _) if !list.is_empty() => join_artist_names(list),
            (_, Some(groups)) => join_artist_names(groups.primary),
            _ => String::new(),
        };

        let album = raw.album.and_then(|a| match a {
            RawAlbumRef::Name(name) if !name.is_empty() => Some(AlbumRef {
                id: None,
                name: utils::decode_entities(&name),
            }),
            RawAlbumRef::Name(_) => None,
            RawAlbumRef::Object { id, name, title } => name.or(title).map(|n| AlbumRef {
                id,
                name: utils::decode_entities(&n),
            }),
        });

        let download_urls = raw
            .download_url
            .map(RawLinks::into_downloads)
            .unwrap_or_default();

        let download_url = raw
            .download_url_plain
            .filter(|u| !u.trim().is_empty())
            .or_else(|| download_urls.last().map(|d| d.url.clone()));

        Song {
            id: raw.id,
            name: utils::decode_entities(&name),
            primary_artists,
            album,
            images: raw.image.map(RawLinks::into_images).unwrap_or_default(),
            duration: raw.duration.and_then(|d| d.as_f64()).filter(|d| *d > 0.0),
            download_url,
            download_urls,
            year: raw.year.map(NumberOrString::into_string),
            language: raw.language,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSearchPage<T> {
    pub total: Option<NumberOrString>,
    pub start: Option<NumberOrString>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T> RawSearchPage<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> SearchPage<U> {
        let results: Vec<U> = self.results.into_iter().map(f).collect();
        SearchPage {
            total: self
                .total
                .and_then(|t| t.as_u64())
                .unwrap_or(results.len() as u64),
            start: self.start.and_then(|s| s.as_u64()).unwrap_or(0),
            results,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArtist {
    pub id: String,
    pub name: Option<String>,
    pub title: Option<String>,
    pub role: Option<String>,
    pub image: Option<RawLinks>,
    pub follower_count: Option<NumberOrString>,
    #[serde(default)]
    pub top_songs: Vec<RawSong>,
}

impl From<RawArtist> for Artist {
    fn from(raw: RawArtist) -> Self {
        Artist {
            id: raw.id,
            name: utils::decode_entities(&raw.name.or(raw.title).unwrap_or_default()),
            images: raw.image.map(RawLinks::into_images).unwrap_or_default(),
            follower_count: raw.follower_count.and_then(|c| c.as_u64()),
            top_songs: raw.top_songs.into_iter().map(Song::from).collect(),
        }
    }
}

impl From<RawArtist> for ArtistSummary {
    fn from(raw: RawArtist) -> Self {
        ArtistSummary {
            id: raw.id,
            name: utils::decode_entities(&raw.name.or(raw.title).unwrap_or_default()),
            role: raw.role,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAlbum {
    pub id: String,
    pub name: Option<String>,
    pub title: Option<String>,
    pub year: Option<NumberOrString>,
    pub primary_artists: Option<RawPrimaryArtists>,
    pub artists: Option<RawArtistGroups>,
    #[serde(default)]
    pub songs: Vec<RawSong>,
}

impl From<RawAlbum> for Album {
    fn from(raw: RawAlbum) -> Self {
        let primary_artists = match (raw.primary_artists, raw.artists) {
            (Some(RawPrimaryArtists::Text(s)), _) => utils::decode_entities(&s),
            (Some(RawPrimaryArtists::List(list)), _) => join_artist_names(list),
            (None, Some(groups)) => join_artist_names(groups.primary),
            (None, None) => String::new(),
        };

        Album {
            id: raw.id,
            name: utils::decode_entities(&raw.name.or(raw.title).unwrap_or_default()),
            year: raw.year.map(NumberOrString::into_string),
            primary_artists,
            songs: raw.songs.into_iter().map(Song::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPlaylist {
    pub id: String,
    pub name: Option<String>,
    pub title: Option<String>,
    pub song_count: Option<NumberOrString>,
    pub language: Option<String>,
    #[serde(default)]
    pub songs: Vec<RawSong>,
}

impl From<RawPlaylist> for Playlist {
    fn from(raw: RawPlaylist) -> Self {
        Playlist {
            id: raw.id,
            name: utils::decode_entities(&raw.name.or(raw.title).unwrap_or_default()),
            song_count: raw.song_count.and_then(|c| c.as_u64()),
            songs: raw.songs.into_iter().map(Song::from).collect(),
        }
    }
}

impl From<RawPlaylist> for PlaylistSummary {
    fn from(raw: RawPlaylist) -> Self {
        PlaylistSummary {
            id: raw.id,
            name: utils::decode_entities(&raw.name.or(raw.title).unwrap_or_default()),
            song_count: raw.song_count.and_then(|c| c.as_u64()),
            language: raw.language,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawArtistSongs {
    pub total: Option<NumberOrString>,
    #[serde(default)]
    pub songs: Vec<RawSong>,
}

// ---------------------------------------------------------------------------
// Table rows
// ---------------------------------------------------------------------------

#[derive(Tabled)]
pub struct SongTableRow {
    #[tabled(rename = "#")]
    pub position: usize,
    pub name: String,
    pub artists: String,
    pub album: String,
    pub length: String,
    pub id: String,
}

impl SongTableRow {
    pub fn from_song(position: usize, song: &Song) -> Self {
        SongTableRow {
            position,
            name: song.name.clone(),
            artists: song.primary_artists.clone(),
            album: song.album_name().to_string(),
            length: song
                .duration
                .map(utils::format_duration)
                .unwrap_or_else(|| "-".to_string()),
            id: song.id.clone(),
        }
    }
}

#[derive(Tabled)]
pub struct ArtistTableRow {
    pub name: String,
    pub role: String,
    pub id: String,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub name: String,
    pub songs: String,
    pub language: String,
    pub id: String,
}

#[derive(Tabled)]
pub struct HistoryTableRow {
    pub played: String,
    pub name: String,
    pub artists: String,
    pub id: String,
}
