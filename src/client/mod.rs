//! # Remote API client
//!
//! Thin async client for the song-metadata API. Every endpoint answers with a
//! `{ success, data }` envelope; this module unwraps the envelope, turns
//! non-2xx answers into [`TuneError::Api`] with the status attached, and
//! normalizes every payload into the canonical types of [`crate::types`] before
//! handing it out.
//!
//! ```text
//! Engines / CLI
//!      ↓
//! ApiClient (envelopes, retries, normalization)
//!      ↓
//! reqwest
//!      ↓
//! /api/search/*, /api/songs, /api/albums, /api/artists, /api/playlists
//! ```
//!
//! ## Retries
//!
//! - `502 Bad Gateway` is retried after a short delay.
//! - `429 Too Many Requests` is retried after `Retry-After` seconds when that is
//!   at most two minutes.
//!
//! Both give up after [`MAX_ATTEMPTS`] attempts. Everything else is returned
//! as is.
//!
//! ## Endpoint groups
//!
//! - [`search`] - song, artist and playlist search
//! - [`songs`] - single song, album and playlist lookups
//! - [`artists`] - artist details and paginated artist songs

pub mod artists;
pub mod search;
pub mod songs;

use std::{future::Future, sync::Arc, time::Duration};

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::{
    config,
    error::{TuneError, TuneResult},
    types::{ApiEnvelope, ApiErrorBody, Song},
    warning,
};

pub const MAX_ATTEMPTS: u32 = 3;
const MAX_RETRY_AFTER_SECS: u64 = 120;

#[derive(Debug)]
struct ClientInner {
    http: Client,
    base_url: String,
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
    retry_delay: Duration,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> TuneResult<Self> {
        let http = Client::builder()
            .timeout(config::http_timeout())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                base_url: base_url.into().trim_end_matches('/').to_string(),
            }),
            retry_delay: Duration::from_secs(10),
        })
    }

    /// Client for the API configured through `TUNEDECK_API_URL`.
    pub fn from_env() -> TuneResult<Self> {
        Self::new(config::api_url())
    }

    /// Delay before retrying a `502 Bad Gateway`.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Issues a GET against `path` and unwraps the response envelope.
    pub(crate) async fn get_data<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> TuneResult<T> {
        let url = format!("{}{}", self.inner.base_url, path);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let response = self.inner.http.get(&url).query(query).send().await?;
            let status = response.status();

            if attempt < MAX_ATTEMPTS {
                if status == StatusCode::BAD_GATEWAY {
                    sleep(self.retry_delay).await;
                    continue; // retry
                }
                if status == StatusCode::TOO_MANY_REQUESTS {
                    match retry_after(&response) {
                        Some(secs) if secs <= MAX_RETRY_AFTER_SECS => {
                            sleep(Duration::from_secs(secs)).await;
                            continue;
                        }
                        Some(secs) => warning!(
                            "Retry-After of {} seconds is too long, giving up on {}",
                            secs,
                            path
                        ),
                        None => {}
                    }
                }
            }

            return unwrap_envelope(status, response).await;
        }
    }
}

fn retry_after(response: &Response) -> Option<u64> {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}

async fn unwrap_envelope<T: DeserializeOwned>(
    status: StatusCode,
    response: Response,
) -> TuneResult<T> {
    if !status.is_success() {
        let message = response
            .json::<ApiErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
        return Err(TuneError::api(status, message));
    }

    let envelope = response.json::<ApiEnvelope<T>>().await?;
    if !envelope.is_success() {
        return Err(TuneError::api(
            status,
            envelope
                .message
                .unwrap_or_else(|| "request was not successful".to_string()),
        ));
    }

    envelope
        .data
        .ok_or_else(|| TuneError::api(status, "response carried no data"))
}

/// Song search as seen by the discovery engine.
///
/// Implemented by [`ApiClient`]; tests substitute an in-memory catalogue.
pub trait SongSearch: Send + Sync {
    fn find_songs(
        &self,
        query: &str,
        page: u32,
        limit: u32,
    ) -> impl Future<Output = TuneResult<Vec<Song>>> + Send;
}

impl SongSearch for ApiClient {
    async fn find_songs(&self, query: &str, page: u32, limit: u32) -> TuneResult<Vec<Song>> {
        Ok(self.search_songs(query, page, limit).await?.results)
    }
}
