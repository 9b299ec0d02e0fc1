use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::{
    sync::broadcast::error::RecvError,
    time::{MissedTickBehavior, interval},
};

use crate::{
    error,
    info,
    management::HistoryManager,
    playback::{AudioBackend, HttpProbeBackend, MediaEvent, PlaybackEngine, PlayerEvent, PlayerStatus, RepeatMode},
    success, utils, warning,
};

use super::{api_client, spinner};

const TICK: Duration = Duration::from_millis(250);

/// Tracks without a known length are played for this long.
const UNKNOWN_DURATION_SECS: f64 = 30.0;

fn progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg} [{bar:30.blue/white}] {pos}/{len}s")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .progress_chars("=> "),
    );
    pb
}

/// Plays the results of a song search without an audio device.
///
/// Every stream is probed over HTTP and the clock is simulated at `speed`
/// times real time, so queue, shuffle, repeat and history behave exactly as
/// in a real player.
pub async fn play(
    query: String,
    limit: u32,
    shuffle: bool,
    repeat: RepeatMode,
    tracks: Option<usize>,
    speed: f64,
) {
    let pb = spinner(format!("Searching songs for \"{}\"...", query));
    let result = api_client().search_songs(&query, 0, limit).await;
    pb.finish_and_clear();

    let mut songs = match result {
        Ok(page) => page.results,
        Err(e) => error!("Search failed. Err: {}", e),
    };
    utils::remove_duplicate_songs(&mut songs);

    let Some(first) = songs.iter().find(|s| s.is_playable()).cloned() else {
        warning!("No playable songs found for \"{}\".", query);
        return;
    };

    let backend = match HttpProbeBackend::new() {
        Ok(backend) => backend,
        Err(e) => error!("Cannot create audio backend. Err: {}", e),
    };
    let engine = PlaybackEngine::with_history(backend, HistoryManager::load().await);
    let mut events = engine.subscribe();

    if shuffle {
        engine.toggle_shuffle().await;
    }
    while engine.state().await.repeat_mode != repeat {
        engine.toggle_repeat().await;
    }

    info!(
        "{} songs, shuffle {}, repeat {}. Press Ctrl+C to stop.",
        songs.len(),
        if shuffle { "on" } else { "off" },
        repeat
    );

    let bar = progress_bar();
    if let Err(e) = engine.play_song(first, Some(songs)).await {
        if !e.is_stale() {
            bar.suspend(|| warning!("Playback failed. Err: {}", e));
        }
    }

    let step = TICK.as_secs_f64() * speed.max(0.1);
    let mut ticker = interval(TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut started = 0usize;

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                engine.backend().stop();
                break;
            }
            event = events.recv() => match event {
                Ok(PlayerEvent::TrackChanged(song)) => {
                    started += 1;
                    if tracks.is_some_and(|max| started > max) {
                        engine.backend().stop();
                        break;
                    }
                    let length = song.duration.unwrap_or(UNKNOWN_DURATION_SECS);
                    bar.reset();
                    bar.set_length(length as u64);
                    bar.set_message(song.name.clone());
                    bar.suspend(|| {
                        info!("Now playing: {} - {}", song.name, song.primary_artists)
                    });
                }
                Ok(PlayerEvent::Progress { position, duration }) => {
                    if duration > 0.0 {
                        bar.set_length(duration as u64);
                    }
                    bar.set_position(position as u64);
                }
                Ok(PlayerEvent::Notice(message)) => bar.suspend(|| info!("{}", message)),
                Ok(PlayerEvent::Error(e)) => {
                    bar.suspend(|| warning!("{}", e))
                }
                Ok(_) | Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => break,
            },
            _ = ticker.tick() => {
                let state = engine.state().await;
                match state.status {
                    PlayerStatus::Playing => {
                        let request = engine.current_request().await;
                        let position = state.progress + step;
                        let event = if state.duration <= 0.0 && position >= UNKNOWN_DURATION_SECS {
                            MediaEvent::Ended
                        } else {
                            MediaEvent::TimeUpdate(position)
                        };
                        if let Err(e) = engine.handle_media_event(request, event).await {
                            if !e.is_stale() {
                                bar.suspend(|| warning!("Playback failed. Err: {}", e));
                            }
                        }
                    }
                    PlayerStatus::Ended | PlayerStatus::Error => break,
                    _ => {}
                }
            }
        }
    }

    bar.finish_and_clear();
    let played = engine.history().await;
    success!(
        "Done. {} tracks started, {} songs in history.",
        started.min(tracks.unwrap_or(usize::MAX)),
        played.len()
    );
}
