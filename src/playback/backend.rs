use std::future::Future;

use reqwest::{Client, StatusCode, header::RANGE};

use crate::config;

/// Media events reported by whatever drives the audio resource.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    TimeUpdate(f64),
    DurationChange(f64),
    Ended,
    Error(String),
}

/// The audio element the engine steers.
///
/// `load` resolves once the resource can play, returning its duration when the
/// backend knows it. Everything else is fire-and-forget.
pub trait AudioBackend: Send + Sync + 'static {
    fn load(&self, url: &str) -> impl Future<Output = Result<Option<f64>, String>> + Send;
    fn play(&self);
    fn pause(&self);
    fn seek(&self, position: f64);
    fn set_volume(&self, volume: f64);
    fn stop(&self);
}

/// Headless backend: checks that the stream answers, produces no sound.
///
/// Position is driven by the caller through [`MediaEvent::TimeUpdate`].
#[derive(Clone, Debug)]
pub struct HttpProbeBackend {
    client: Client,
}

impl HttpProbeBackend {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config::load_timeout()).build()?;
        Ok(Self { client })
    }
}

impl AudioBackend for HttpProbeBackend {
    async fn load(&self, url: &str) -> Result<Option<f64>, String> {
        let head = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = match head.status() {
            // some CDNs refuse HEAD, a one-byte range request is just as good
            StatusCode::METHOD_NOT_ALLOWED | StatusCode::FORBIDDEN => self
                .client
                .get(url)
                .header(RANGE, "bytes=0-0")
                .send()
                .await
                .map_err(|e| e.to_string())?
                .status(),
            other => other,
        };

        if status.is_success() {
            Ok(None)
        } else {
            Err(format!("stream answered {}", status))
        }
    }

    fn play(&self) {}

    fn pause(&self) {}

    fn seek(&self, _position: f64) {}

    fn set_volume(&self, _volume: f64) {}

    fn stop(&self) {}
}
