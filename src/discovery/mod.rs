//! # Discovery
//!
//! Session-scoped content selection without a recommendation backend.
//!
//! Every bucket ("for you", one per language, one per theme) owns a curated
//! pool of search terms. A session seed fixes the order in which those terms
//! are walked ([`terms::ordered_terms`]), and a per-session seen set keeps the
//! same song id from being surfaced twice.
//!
//! Filling a bucket:
//!
//! 1. Walk the bucket's terms in session order, starting where the previous
//!    call stopped. After a full pass the next page of each term is used.
//! 2. A failing or empty search moves on to the next term.
//! 3. Songs already seen this session are set aside; everything else is kept
//!    and marked seen until the bucket is full.
//! 4. If no term produced a single fresh song but some produced results, the
//!    set-aside songs are returned instead of an empty bucket.
//! 5. If later pages came back empty altogether, the bucket rewinds to the
//!    first page and serves repeats from there.
//!
//! Search errors never leave this module; the worst outcome is an empty
//! bucket. A session that can't be written is reported with a warning.

mod session;
pub mod terms;

use std::collections::BTreeMap;

use futures::{Stream, future::join_all, stream::FuturesUnordered};
use tokio::sync::Mutex;

use crate::{
    client::SongSearch,
    management::{SessionManager, StorageError},
    types::Song,
    warning,
};

pub use session::Session;
pub use terms::{BucketSpec, FOR_YOU, LANGUAGES, THEMES};

/// Results requested from the API per term.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bucket {
    pub songs: Vec<Song>,
    pub loading: bool,
}

impl Bucket {
    pub fn pending() -> Self {
        Self {
            songs: Vec::new(),
            loading: true,
        }
    }

    pub fn ready(songs: Vec<Song>) -> Self {
        Self {
            songs,
            loading: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThemedBucket {
    pub title: String,
    pub songs: Vec<Song>,
}

pub struct DiscoveryEngine<S: SongSearch> {
    search: S,
    session: Mutex<Session>,
    store: Option<SessionManager>,
    page_size: u32,
}

impl<S: SongSearch> DiscoveryEngine<S> {
    pub fn new(search: S) -> Self {
        Self::with_session(search, Session::start())
    }

    pub fn with_session(search: S, session: Session) -> Self {
        Self {
            search,
            session: Mutex::new(session),
            store: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Resumes the stored session (or starts one) and keeps it persisted.
    pub async fn with_store(search: S, store: SessionManager) -> Self {
        let session = store.load_or_start().await;
        Self {
            search,
            session: Mutex::new(session),
            store: Some(store),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub async fn session(&self) -> Session {
        self.session.lock().await.clone()
    }

    /// Up to `limit` songs picked from the "for you" pool.
    pub async fn get_for_you_mix(&self, limit: usize) -> Bucket {
        let songs = self.fill_bucket(&FOR_YOU, limit).await;
        self.autosave().await;
        Bucket::ready(songs)
    }

    /// Every language bucket in its loading state, for skeleton rendering.
    pub fn pending_discovery(&self) -> BTreeMap<String, Bucket> {
        LANGUAGES
            .iter()
            .map(|spec| (spec.key.to_string(), Bucket::pending()))
            .collect()
    }

    /// All language buckets, fetched concurrently.
    pub async fn get_all_discovery_content(&self, limit_per_bucket: usize) -> BTreeMap<String, Bucket> {
        let filled = join_all(LANGUAGES.iter().map(|spec| async move {
            let songs = self.fill_bucket(spec, limit_per_bucket).await;
            (spec.key.to_string(), Bucket::ready(songs))
        }))
        .await;

        self.autosave().await;
        filled.into_iter().collect()
    }

    /// Language buckets in completion order, each already marked as loaded.
    ///
    /// The session is not persisted by the stream; call [`Self::save`] once it
    /// is drained.
    pub fn discovery_stream(
        &self,
        limit_per_bucket: usize,
    ) -> impl Stream<Item = (&'static str, Bucket)> + '_ {
        LANGUAGES
            .iter()
            .map(move |spec| async move {
                let songs = self.fill_bucket(spec, limit_per_bucket).await;
                (spec.key, Bucket::ready(songs))
            })
            .collect::<FuturesUnordered<_>>()
    }

    /// All themed buckets, fetched concurrently.
    pub async fn get_all_themed_content(
        &self,
        limit_per_bucket: usize,
    ) -> BTreeMap<String, ThemedBucket> {
        let filled = join_all(THEMES.iter().map(|spec| async move {
            let songs = self.fill_bucket(spec, limit_per_bucket).await;
            (
                spec.key.to_string(),
                ThemedBucket {
                    title: spec.title.to_string(),
                    songs,
                },
            )
        }))
        .await;

        self.autosave().await;
        filled.into_iter().collect()
    }

    /// Themed buckets in completion order.
    pub fn themed_stream(
        &self,
        limit_per_bucket: usize,
    ) -> impl Stream<Item = (&'static str, ThemedBucket)> + '_ {
        THEMES
            .iter()
            .map(move |spec| async move {
                let songs = self.fill_bucket(spec, limit_per_bucket).await;
                (
                    spec.key,
                    ThemedBucket {
                        title: spec.title.to_string(),
                        songs,
                    },
                )
            })
            .collect::<FuturesUnordered<_>>()
    }

    /// Starts over with a new seed and an empty seen set.
    pub async fn refresh_discovery(&self) {
        *self.session.lock().await = Session::start();
        self.autosave().await;
    }

    /// Writes the session to the store, if there is one.
    pub async fn save(&self) -> Result<(), StorageError> {
        match &self.store {
            Some(store) => {
                let snapshot = self.session.lock().await.clone();
                store.persist(&snapshot).await
            }
            None => Ok(()),
        }
    }

    async fn autosave(&self) {
        if let Err(e) = self.save().await {
            warning!("Couldn't save the discovery session: {}", e);
        }
    }

    async fn fill_bucket(&self, spec: &BucketSpec, limit: usize) -> Vec<Song> {
        if limit == 0 || spec.terms.is_empty() {
            return Vec::new();
        }

        let (seed, start) = {
            let session = self.session.lock().await;
            (session.seed, session.cursor(spec.key))
        };
        let terms = terms::ordered_terms(seed, spec.key, spec.terms);

        let mut walk = self.walk_terms(&terms, start, limit).await;
        if walk.fresh.is_empty() && walk.repeats.is_empty() && start >= terms.len() {
            // later pages ran dry; page 0 still holds the pool
            walk = self.walk_terms(&terms, 0, limit).await;
            self.session.lock().await.set_cursor(spec.key, walk.tried);
        } else {
            self.session.lock().await.advance(spec.key, walk.tried);
        }

        if walk.fresh.is_empty() {
            walk.repeats.truncate(limit);
            return walk.repeats;
        }
        walk.fresh
    }

    /// One pass over `terms` from slot `start`, stopping once `limit` fresh
    /// songs are found.
    async fn walk_terms(&self, terms: &[&'static str], start: usize, limit: usize) -> Walk {
        let mut walk = Walk::default();

        for step in 0..terms.len() {
            let slot = start + step;
            let term = terms[slot % terms.len()];
            let page = (slot / terms.len()) as u32;
            walk.tried += 1;

            let found = match self.search.find_songs(term, page, self.page_size).await {
                Ok(songs) => songs,
                Err(_) => continue, // fall back to the next term
            };

            let mut session = self.session.lock().await;
            for song in found {
                if walk.fresh.len() >= limit {
                    break;
                }
                if walk.fresh.iter().chain(walk.repeats.iter()).any(|s| s.id == song.id) {
                    continue;
                }
                if session.has_seen(&song.id) {
                    walk.repeats.push(song);
                } else {
                    session.mark_seen(&song.id);
                    walk.fresh.push(song);
                }
            }
            drop(session);

            if walk.fresh.len() >= limit {
                break;
            }
        }

        walk
    }
}

#[derive(Default)]
struct Walk {
    fresh: Vec<Song>,
    repeats: Vec<Song>,
    tried: usize,
}
