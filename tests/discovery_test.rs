use std::{
    collections::{BTreeSet, HashSet},
    path::PathBuf,
    sync::{Arc, Mutex as StdMutex},
};

use futures::StreamExt;
use tunedeck::{
    client::SongSearch,
    discovery::{DiscoveryEngine, FOR_YOU, LANGUAGES, Session, THEMES, terms},
    error::{TuneError, TuneResult},
    management::SessionManager,
    types::Song,
};

#[derive(Clone, Copy)]
enum Catalogue {
    /// Every term and page has its own songs.
    Distinct,
    /// Every term returns the same handful of songs.
    Shared(usize),
    /// Each term has a few songs on its first page and nothing after it.
    FirstPage(usize),
}

/// Search double backed by a generated catalogue.
#[derive(Clone)]
struct FakeSearch {
    catalogue: Catalogue,
    failing: Arc<HashSet<String>>,
    fail_all: bool,
    calls: Arc<StdMutex<Vec<(String, u32)>>>,
}

impl FakeSearch {
    fn new(catalogue: Catalogue) -> Self {
        Self {
            catalogue,
            failing: Arc::new(HashSet::new()),
            fail_all: false,
            calls: Arc::new(StdMutex::new(Vec::new())),
        }
    }

    fn failing(mut self, terms: &[&str]) -> Self {
        self.failing = Arc::new(terms.iter().map(|t| t.to_string()).collect());
        self
    }

    fn failing_everything(mut self) -> Self {
        self.fail_all = true;
        self
    }

    fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

impl SongSearch for FakeSearch {
    async fn find_songs(&self, query: &str, page: u32, limit: u32) -> TuneResult<Vec<Song>> {
        self.calls.lock().unwrap().push((query.to_string(), page));

        if self.fail_all || self.failing.contains(query) {
            return Err(TuneError::Api {
                status: 503,
                message: "unavailable".to_string(),
            });
        }

        let songs = match self.catalogue {
            Catalogue::Distinct => (0..limit)
                .map(|i| {
                    Song::new(format!("{}:{}:{}", query, page, i), format!("{} #{}", query, i))
                        .with_url("https://x/a.mp3")
                })
                .collect(),
            Catalogue::Shared(count) => (0..count)
                .map(|i| Song::new(format!("shared-{}", i), "Shared").with_url("https://x/a.mp3"))
                .collect(),
            Catalogue::FirstPage(_) if page > 0 => Vec::new(),
            Catalogue::FirstPage(count) => (0..count)
                .map(|i| Song::new(format!("{}:{}", query, i), "Only").with_url("https://x/a.mp3"))
                .collect(),
        };
        Ok(songs)
    }
}

fn ids(songs: &[Song]) -> BTreeSet<String> {
    songs.iter().map(|s| s.id.clone()).collect()
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("tunedeck-test-{}", rand::random::<u64>()))
        .join(name)
}

#[test]
fn test_ordered_terms_is_deterministic_permutation() {
    let first = terms::ordered_terms(42, "for_you", FOR_YOU.terms);
    let second = terms::ordered_terms(42, "for_you", FOR_YOU.terms);
    assert_eq!(first, second);

    let mut sorted = first.clone();
    sorted.sort();
    let mut pool = FOR_YOU.terms.to_vec();
    pool.sort();
    assert_eq!(sorted, pool);
}

#[test]
fn test_ordered_terms_varies_with_seed() {
    let base = terms::ordered_terms(1, "for_you", FOR_YOU.terms);
    let differs = (2..12u64).any(|seed| terms::ordered_terms(seed, "for_you", FOR_YOU.terms) != base);
    assert!(differs);
}

#[test]
fn test_bucket_seed_depends_on_bucket() {
    assert_eq!(terms::bucket_seed(7, "hindi"), terms::bucket_seed(7, "hindi"));
    assert_ne!(terms::bucket_seed(7, "hindi"), terms::bucket_seed(7, "tamil"));
}

#[test]
fn test_bucket_catalogue() {
    let languages: Vec<&str> = LANGUAGES.iter().map(|b| b.key).collect();
    assert_eq!(
        languages,
        vec!["hindi", "english", "punjabi", "marathi", "tamil", "telugu"]
    );
    let themes: Vec<&str> = THEMES.iter().map(|b| b.key).collect();
    assert_eq!(themes, vec!["party", "chill", "romantic", "trending", "workout"]);
    assert!(terms::language("tamil").is_some());
    assert!(terms::theme("workout").is_some());
    assert!(terms::theme("polka").is_none());
}

#[test]
fn test_session_expiry() {
    let session = Session::with_seed(1);
    let now = session.started_at;

    assert!(!session.is_expired(now, chrono::Duration::minutes(60)));
    assert!(session.is_expired(now + chrono::Duration::minutes(60), chrono::Duration::minutes(60)));
}

#[tokio::test]
async fn test_consecutive_for_you_mixes_are_disjoint() {
    let engine = DiscoveryEngine::with_session(FakeSearch::new(Catalogue::Distinct), Session::with_seed(3))
        .page_size(5);

    let first = engine.get_for_you_mix(10).await;
    let second = engine.get_for_you_mix(10).await;

    assert!(!first.loading);
    assert_eq!(first.songs.len(), 10);
    assert_eq!(second.songs.len(), 10);
    assert!(ids(&first.songs).is_disjoint(&ids(&second.songs)));
    assert_eq!(engine.session().await.seen_count(), 20);
}

#[tokio::test]
async fn test_same_seed_walks_terms_in_session_order() {
    let search = FakeSearch::new(Catalogue::Distinct);
    let engine = DiscoveryEngine::with_session(search.clone(), Session::with_seed(9)).page_size(5);

    engine.get_for_you_mix(10).await;

    let expected = terms::ordered_terms(9, FOR_YOU.key, FOR_YOU.terms);
    let called: Vec<String> = search.calls().into_iter().map(|(t, _)| t).collect();
    assert_eq!(called, vec![expected[0].to_string(), expected[1].to_string()]);
}

#[tokio::test]
async fn test_exhausted_pool_returns_repeats() {
    let engine = DiscoveryEngine::with_session(FakeSearch::new(Catalogue::Shared(4)), Session::with_seed(5));

    let first = engine.get_for_you_mix(10).await;
    assert_eq!(first.songs.len(), 4);

    let second = engine.get_for_you_mix(10).await;
    assert!(!second.loading);
    assert_eq!(ids(&second.songs), ids(&first.songs));
}

#[tokio::test]
async fn test_pool_without_later_pages_still_returns_repeats() {
    let engine = DiscoveryEngine::with_session(
        FakeSearch::new(Catalogue::FirstPage(2)),
        Session::with_seed(8),
    );

    let first = engine.get_for_you_mix(100).await;
    assert_eq!(first.songs.len(), FOR_YOU.terms.len() * 2);

    let second = engine.get_for_you_mix(10).await;
    assert_eq!(second.songs.len(), 10);
    assert!(ids(&second.songs).is_subset(&ids(&first.songs)));

    // stays served on later calls too
    let third = engine.get_for_you_mix(10).await;
    assert_eq!(third.songs.len(), 10);
}

#[tokio::test]
async fn test_save_reports_unwritable_session_file() {
    let blocker = temp_path("not-a-dir");
    std::fs::create_dir_all(blocker.parent().unwrap()).unwrap();
    std::fs::write(&blocker, "file").unwrap();

    let engine = DiscoveryEngine::with_store(
        FakeSearch::new(Catalogue::Distinct),
        SessionManager::with_path(blocker.join("session.json"), chrono::Duration::minutes(60)),
    )
    .await;

    // the mix still comes back even though the session can't be stored
    let mix = engine.get_for_you_mix(3).await;
    assert_eq!(mix.songs.len(), 3);
    assert!(engine.save().await.is_err());
}

#[tokio::test]
async fn test_save_without_store_is_ok() {
    let engine = DiscoveryEngine::new(FakeSearch::new(Catalogue::Distinct));
    assert!(engine.save().await.is_ok());
}

#[tokio::test]
async fn test_failing_terms_fall_back_to_others() {
    let ordered = terms::ordered_terms(11, FOR_YOU.key, FOR_YOU.terms);
    let search = FakeSearch::new(Catalogue::Distinct).failing(&ordered[..3]);
    let engine = DiscoveryEngine::with_session(search.clone(), Session::with_seed(11)).page_size(5);

    let mix = engine.get_for_you_mix(5).await;

    assert!(!mix.loading);
    assert_eq!(mix.songs.len(), 5);
    assert!(mix.songs.iter().all(|s| s.id.starts_with(ordered[3])));
    assert_eq!(search.calls().len(), 4);
}

#[tokio::test]
async fn test_all_terms_failing_gives_empty_loaded_bucket() {
    let engine = DiscoveryEngine::new(FakeSearch::new(Catalogue::Distinct).failing_everything());

    let mix = engine.get_for_you_mix(10).await;
    assert!(mix.songs.is_empty());
    assert!(!mix.loading);

    let buckets = engine.get_all_discovery_content(5).await;
    assert_eq!(buckets.len(), LANGUAGES.len());
    assert!(buckets.values().all(|b| b.songs.is_empty() && !b.loading));
}

#[tokio::test]
async fn test_all_discovery_content_fills_every_language() {
    let engine = DiscoveryEngine::new(FakeSearch::new(Catalogue::Distinct)).page_size(4);

    let pending = engine.pending_discovery();
    assert_eq!(pending.len(), LANGUAGES.len());
    assert!(pending.values().all(|b| b.loading));

    let buckets = engine.get_all_discovery_content(4).await;

    for spec in LANGUAGES {
        let bucket = &buckets[spec.key];
        assert!(!bucket.loading);
        assert_eq!(bucket.songs.len(), 4);
    }

    let all: Vec<Song> = buckets.values().flat_map(|b| b.songs.clone()).collect();
    assert_eq!(ids(&all).len(), all.len());
}

#[tokio::test]
async fn test_buckets_do_not_repeat_songs_across_each_other() {
    let engine = DiscoveryEngine::new(FakeSearch::new(Catalogue::Shared(3)));

    let mix = engine.get_for_you_mix(3).await;
    let themed = engine.get_all_themed_content(3).await;

    // every theme finds only songs the mix already surfaced, so it falls back to repeats
    assert_eq!(ids(&mix.songs).len(), 3);
    assert!(themed.values().all(|b| ids(&b.songs) == ids(&mix.songs)));
    assert_eq!(engine.session().await.seen_count(), 3);
}

#[tokio::test]
async fn test_discovery_stream_yields_each_language_once() {
    let engine = DiscoveryEngine::new(FakeSearch::new(Catalogue::Distinct)).page_size(2);

    let loaded: Vec<(&'static str, bool, usize)> = engine
        .discovery_stream(2)
        .map(|(key, bucket)| (key, bucket.loading, bucket.songs.len()))
        .collect()
        .await;

    let keys: BTreeSet<&str> = loaded.iter().map(|(k, _, _)| *k).collect();
    assert_eq!(keys.len(), LANGUAGES.len());
    assert!(loaded.iter().all(|(_, loading, len)| !loading && *len == 2));
}

#[tokio::test]
async fn test_themed_content_carries_titles() {
    let engine = DiscoveryEngine::new(FakeSearch::new(Catalogue::Distinct)).page_size(3);

    let themed = engine.get_all_themed_content(3).await;

    assert_eq!(themed.len(), THEMES.len());
    assert_eq!(themed["chill"].title, "Chill Vibes");
    assert_eq!(themed["trending"].title, "Trending Now");
    assert!(themed.values().all(|b| b.songs.len() == 3));

    let streamed: Vec<String> = engine
        .themed_stream(1)
        .map(|(_, bucket)| bucket.title)
        .collect()
        .await;
    assert_eq!(streamed.len(), THEMES.len());
}

#[tokio::test]
async fn test_refresh_starts_a_new_session() {
    let engine = DiscoveryEngine::with_session(FakeSearch::new(Catalogue::Shared(3)), Session::with_seed(1));

    engine.get_for_you_mix(3).await;
    assert_eq!(engine.session().await.seen_count(), 3);

    engine.refresh_discovery().await;

    let session = engine.session().await;
    assert_eq!(session.seen_count(), 0);
    assert_eq!(session.cursor(FOR_YOU.key), 0);

    engine.get_for_you_mix(3).await;
    assert_eq!(engine.session().await.seen_count(), 3);
}

#[tokio::test]
async fn test_session_survives_restarts_until_expiry() {
    let path = temp_path("session.json");

    let engine = DiscoveryEngine::with_store(
        FakeSearch::new(Catalogue::Distinct),
        SessionManager::with_path(path.clone(), chrono::Duration::minutes(60)),
    )
    .await
    .page_size(5);
    let first = engine.get_for_you_mix(5).await;
    let saved = engine.session().await;

    let resumed = DiscoveryEngine::with_store(
        FakeSearch::new(Catalogue::Distinct),
        SessionManager::with_path(path.clone(), chrono::Duration::minutes(60)),
    )
    .await
    .page_size(5);
    assert_eq!(resumed.session().await, saved);
    let second = resumed.get_for_you_mix(5).await;
    assert!(ids(&first.songs).is_disjoint(&ids(&second.songs)));

    let expired = SessionManager::with_path(path, chrono::Duration::zero())
        .load_or_start()
        .await;
    assert_eq!(expired.seen_count(), 0);
}
