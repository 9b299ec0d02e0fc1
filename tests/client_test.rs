use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Extension, Json, Router,
    extract::{Path, Query},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::get,
};
use serde_json::{Value, json};
use tunedeck::{
    client::{
        ApiClient, SongSearch,
        artists::{SongSort, SortOrder},
    },
    error::TuneError,
};

type Hits = Arc<AtomicUsize>;

fn song_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "artists": { "primary": [ { "id": "ar1", "name": "Singer" } ] },
        "album": { "id": "al1", "name": "Album" },
        "duration": 180,
        "downloadUrl": [ { "quality": "320kbps", "url": format!("https://cdn.test/{}.mp4", id) } ]
    })
}

fn ok(data: Value) -> Json<Value> {
    Json(json!({ "success": true, "data": data }))
}

async fn search_songs(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let query = params.get("query").cloned().unwrap_or_default();
    let page = params.get("page").cloned().unwrap_or_default();
    let limit = params.get("limit").cloned().unwrap_or_default();
    ok(json!({
        "total": 42,
        "start": 0,
        "results": [
            song_json("s1", &format!("{} p{} l{}", query, page, limit)),
            song_json("s2", "Second")
        ]
    }))
}

async fn search_artists() -> Json<Value> {
    ok(json!({
        "total": 1,
        "start": 0,
        "results": [ { "id": "ar1", "name": "Singer &amp; Co", "role": "singer" } ]
    }))
}

async fn search_playlists() -> Json<Value> {
    ok(json!({
        "total": "1",
        "start": "0",
        "results": [ { "id": "pl1", "title": "Chill", "songCount": "12", "language": "english" } ]
    }))
}

async fn song(Path(id): Path<String>) -> impl IntoResponse {
    if id == "missing" {
        return (StatusCode::NOT_FOUND, Json(json!({ "message": "Song not found" })));
    }
    (StatusCode::OK, ok(json!([song_json(&id, "Found")])))
}

async fn album(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let id = params.get("id").cloned().unwrap_or_default();
    ok(json!({
        "id": id,
        "name": "Album",
        "year": 2021,
        "primaryArtists": "Singer",
        "songs": [ song_json("t1", "Track 1"), song_json("t2", "Track 2") ]
    }))
}

async fn artist(Path(id): Path<String>) -> Json<Value> {
    ok(json!({
        "id": id,
        "name": "Singer",
        "followerCount": "1200",
        "topSongs": [ song_json("top1", "Hit") ]
    }))
}

async fn artist_songs(
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let label = format!(
        "{} {} {} {}",
        id,
        params.get("page").cloned().unwrap_or_default(),
        params.get("sortBy").cloned().unwrap_or_default(),
        params.get("sortOrder").cloned().unwrap_or_default()
    );
    ok(json!({ "total": 77, "songs": [ song_json("as1", &label) ] }))
}

async fn playlist() -> Json<Value> {
    ok(json!({
        "id": "pl1",
        "name": "Mix",
        "songCount": 2,
        "songs": [ song_json("p1", "One"), song_json("p2", "Two") ]
    }))
}

async fn unsuccessful() -> Json<Value> {
    Json(json!({ "success": false, "message": "quota exceeded" }))
}

async fn flaky(Extension(hits): Extension<Hits>) -> impl IntoResponse {
    let n = hits.fetch_add(1, Ordering::SeqCst);
    if n < 2 {
        return (StatusCode::BAD_GATEWAY, Json(json!({ "message": "upstream down" })));
    }
    (
        StatusCode::OK,
        ok(json!({ "total": 1, "start": 0, "results": [ song_json("late", "Late") ] })),
    )
}

async fn always_down(Extension(hits): Extension<Hits>) -> impl IntoResponse {
    hits.fetch_add(1, Ordering::SeqCst);
    (StatusCode::BAD_GATEWAY, Json(json!({ "message": "upstream down" })))
}

async fn rate_limited(Extension(hits): Extension<Hits>) -> impl IntoResponse {
    let n = hits.fetch_add(1, Ordering::SeqCst);
    let mut headers = HeaderMap::new();
    if n == 0 {
        headers.insert("retry-after", HeaderValue::from_static("0"));
        return (
            StatusCode::TOO_MANY_REQUESTS,
            headers,
            Json(json!({ "message": "slow down" })),
        );
    }
    (
        StatusCode::OK,
        headers,
        ok(json!({ "total": 0, "start": 0, "results": [] })),
    )
}

async fn spawn_api(router: Router) -> ApiClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    ApiClient::new(format!("http://{}/", addr))
        .unwrap()
        .with_retry_delay(Duration::from_millis(10))
}

async fn catalogue_api() -> ApiClient {
    let router = Router::new()
        .route("/api/search/songs", get(search_songs))
        .route("/api/search/artists", get(search_artists))
        .route("/api/search/playlists", get(search_playlists))
        .route("/api/songs/{id}", get(song))
        .route("/api/albums", get(album))
        .route("/api/artists/{id}", get(artist))
        .route("/api/artists/{id}/songs", get(artist_songs))
        .route("/api/playlists", get(playlist));
    spawn_api(router).await
}

async fn single_route_api(
    handler: axum::routing::MethodRouter,
) -> (ApiClient, Hits) {
    let hits: Hits = Arc::new(AtomicUsize::new(0));
    let router = Router::new()
        .route("/api/search/songs", handler)
        .layer(Extension(hits.clone()));
    (spawn_api(router).await, hits)
}

#[tokio::test]
async fn test_base_url_is_trimmed() {
    let client = ApiClient::new("http://localhost:1234/").unwrap();
    assert_eq!(client.base_url(), "http://localhost:1234");
}

#[tokio::test]
async fn test_search_songs_sends_paging_and_normalizes() {
    let client = catalogue_api().await;

    let page = client.search_songs("kesariya", 2, 5).await.unwrap();

    assert_eq!(page.total, 42);
    assert_eq!(page.results.len(), 2);
    let first = &page.results[0];
    assert_eq!(first.name, "kesariya p2 l5");
    assert_eq!(first.primary_artists, "Singer");
    assert_eq!(first.duration, Some(180.0));
    assert_eq!(first.playable_url(), Some("https://cdn.test/s1.mp4"));
}

#[tokio::test]
async fn test_song_search_trait_returns_results() {
    let client = catalogue_api().await;

    let songs = client.find_songs("anything", 0, 10).await.unwrap();

    let ids: Vec<&str> = songs.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["s1", "s2"]);
}

#[tokio::test]
async fn test_search_artists_and_playlists() {
    let client = catalogue_api().await;

    let artists = client.search_artists("singer", 0, 10).await.unwrap();
    assert_eq!(artists.results[0].name, "Singer & Co");
    assert_eq!(artists.results[0].role.as_deref(), Some("singer"));

    let playlists = client.search_playlists("chill", 0, 10).await.unwrap();
    assert_eq!(playlists.total, 1);
    assert_eq!(playlists.results[0].name, "Chill");
    assert_eq!(playlists.results[0].song_count, Some(12));
}

#[tokio::test]
async fn test_get_song() {
    let client = catalogue_api().await;

    let song = client.get_song("abc").await.unwrap();

    assert_eq!(song.id, "abc");
    assert_eq!(song.album_name(), "Album");
}

#[tokio::test]
async fn test_non_2xx_becomes_api_error_with_status() {
    let client = catalogue_api().await;

    let err = client.get_song("missing").await.unwrap_err();

    assert_eq!(err.status(), Some(404));
    match err {
        TuneError::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Song not found");
        }
        other => panic!("expected api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_get_album_artist_and_playlist() {
    let client = catalogue_api().await;

    let album = client.get_album("al9").await.unwrap();
    assert_eq!(album.id, "al9");
    assert_eq!(album.year.as_deref(), Some("2021"));
    assert_eq!(album.songs.len(), 2);

    let artist = client.get_artist("ar1").await.unwrap();
    assert_eq!(artist.follower_count, Some(1200));
    assert_eq!(artist.top_songs[0].name, "Hit");

    let playlist = client.get_playlist("pl1").await.unwrap();
    assert_eq!(playlist.song_count, Some(2));
    assert_eq!(playlist.songs.len(), 2);
}

#[tokio::test]
async fn test_artist_songs_sends_sorting() {
    let client = catalogue_api().await;

    let page = client
        .get_artist_songs("ar1", 3, SongSort::Latest, SortOrder::Asc)
        .await
        .unwrap();

    assert_eq!(page.total, 77);
    assert_eq!(page.results[0].name, "ar1 3 latest asc");
}

#[tokio::test]
async fn test_unsuccessful_envelope_is_api_error() {
    let (client, _) = single_route_api(get(unsuccessful)).await;

    let err = client.search_songs("x", 0, 1).await.unwrap_err();

    match err {
        TuneError::Api { status, message } => {
            assert_eq!(status, 200);
            assert_eq!(message, "quota exceeded");
        }
        other => panic!("expected api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_bad_gateway_is_retried() {
    let (client, hits) = single_route_api(get(flaky)).await;

    let page = client.search_songs("x", 0, 1).await.unwrap();

    assert_eq!(page.results[0].id, "late");
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_bad_gateway_gives_up_after_max_attempts() {
    let (client, hits) = single_route_api(get(always_down)).await;

    let err = client.search_songs("x", 0, 1).await.unwrap_err();

    assert_eq!(err.status(), Some(502));
    assert_eq!(hits.load(Ordering::SeqCst), tunedeck::client::MAX_ATTEMPTS as usize);
}

#[tokio::test]
async fn test_too_many_requests_honours_retry_after() {
    let (client, hits) = single_route_api(get(rate_limited)).await;

    let page = client.search_songs("x", 0, 1).await.unwrap();

    assert!(page.results.is_empty());
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_unreachable_api_is_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new(format!("http://{}", addr)).unwrap();
    let err = client.search_songs("x", 0, 1).await.unwrap_err();

    assert!(matches!(err, TuneError::Network(_)));
}
