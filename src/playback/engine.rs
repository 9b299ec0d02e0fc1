use std::{sync::Arc, time::Duration};

use rand::seq::IndexedRandom;
use tokio::{
    sync::{Mutex, MutexGuard, broadcast},
    time::timeout,
};

use crate::{
    config,
    error::{TuneError, TuneResult},
    management::HistoryManager,
    types::{Song, SongSummary},
};

use super::{
    AudioBackend, MediaEvent, PlaybackError, PlaybackState, PlayerEvent, PlayerSnapshot,
    PlayerStatus, Queue, RepeatMode,
};

/// Going back within this many seconds of a track start moves to the previous
/// track instead of restarting the current one.
pub const RESTART_THRESHOLD_SECS: f64 = 3.0;

const EVENT_CAPACITY: usize = 64;

#[derive(Default)]
struct EngineState {
    playback: PlaybackState,
    queue: Queue,
    /// Last list the user started playback from.
    context: Vec<Song>,
    /// Tracks that were current before the present one, most recent last.
    previous: Vec<Song>,
    active_request: u64,
}

impl EngineState {
    fn push_current_to_previous(&mut self) {
        let Some(current) = self.playback.current_song.clone() else {
            return;
        };
        // a skipped unplayable track leaves the current one in place
        if self.previous.last().map(|s| s.id.as_str()) != Some(current.id.as_str()) {
            self.previous.push(current);
        }
    }

    /// Picks the track that follows the current one, ignoring repeat-one.
    fn next_candidate(&mut self) -> Option<Song> {
        if let Some(next) = self.queue.pop_front() {
            self.push_current_to_previous();
            return Some(next);
        }

        if self.playback.shuffle_mode {
            let current_id = self.playback.current_id().map(str::to_string);
            let pool: Vec<&Song> = self
                .context
                .iter()
                .filter(|s| Some(s.id.as_str()) != current_id.as_deref())
                .collect();
            if let Some(pick) = pool.choose(&mut rand::rng()).map(|s| (*s).clone()) {
                self.push_current_to_previous();
                return Some(pick);
            }
        }

        if self.playback.repeat_mode == RepeatMode::All {
            if let Some(first) = self.context.first().cloned() {
                let rest = self.context[1..].to_vec();
                self.queue.replace(rest);
                self.push_current_to_previous();
                return Some(first);
            }
            return self.playback.current_song.clone();
        }

        None
    }

    fn has_next(&self) -> bool {
        !self.queue.is_empty()
            || (self.playback.shuffle_mode && self.context.len() > 1)
            || (self.playback.repeat_mode == RepeatMode::All
                && (!self.context.is_empty() || self.playback.current_song.is_some()))
    }
}

struct Inner<B: AudioBackend> {
    backend: B,
    state: Mutex<EngineState>,
    events: broadcast::Sender<PlayerEvent>,
    history: Option<Mutex<HistoryManager>>,
    load_timeout: Duration,
}

/// Single source of truth for what is playing and what plays next.
///
/// Cheap to clone; all clones drive the same player.
pub struct PlaybackEngine<B: AudioBackend> {
    inner: Arc<Inner<B>>,
}

impl<B: AudioBackend> Clone for PlaybackEngine<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: AudioBackend> PlaybackEngine<B> {
    pub fn new(backend: B) -> Self {
        Self::build(backend, None, config::load_timeout())
    }

    /// Engine that records every started track in the listening history.
    pub fn with_history(backend: B, history: HistoryManager) -> Self {
        Self::build(backend, Some(history), config::load_timeout())
    }

    fn build(backend: B, history: Option<HistoryManager>, load_timeout: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                backend,
                state: Mutex::new(EngineState::default()),
                events,
                history: history.map(Mutex::new),
                load_timeout,
            }),
        }
    }

    /// Replaces the bounded wait for audio loading. Only valid before the
    /// engine is cloned.
    pub fn load_timeout(mut self, load_timeout: Duration) -> Self {
        if let Some(inner) = Arc::get_mut(&mut self.inner) {
            inner.load_timeout = load_timeout;
        }
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.inner.events.subscribe()
    }

    pub fn backend(&self) -> &B {
        &self.inner.backend
    }

    pub async fn state(&self) -> PlaybackState {
        self.lock().await.playback.clone()
    }

    pub async fn snapshot(&self) -> PlayerSnapshot {
        let st = self.lock().await;
        PlayerSnapshot {
            state: st.playback.clone(),
            queue: st.queue.to_vec(),
            previous: st.previous.len(),
        }
    }

    pub async fn queue(&self) -> Vec<Song> {
        self.lock().await.queue.to_vec()
    }

    /// Id of the load that currently owns the player; media events must carry it.
    pub async fn current_request(&self) -> u64 {
        self.lock().await.active_request
    }

    pub async fn history(&self) -> Vec<SongSummary> {
        match &self.inner.history {
            Some(history) => history.lock().await.entries().to_vec(),
            None => Vec::new(),
        }
    }

    /// Starts `song`. When `context` is given the queue is reseeded with the
    /// songs that follow `song` in it.
    pub async fn play_song(&self, song: Song, context: Option<Vec<Song>>) -> TuneResult<()> {
        if !song.is_playable() {
            self.emit(PlayerEvent::Error(PlaybackError::NoPlayableSource {
                song_id: song.id.clone(),
            }));
            return Err(TuneError::NoPlayableSource { song_id: song.id });
        }

        {
            let mut st = self.lock().await;
            if let Some(context) = context {
                let rest: Vec<Song> = match context.iter().position(|s| s.id == song.id) {
                    Some(pos) => context[pos + 1..].to_vec(),
                    None => context.clone(),
                };
                st.queue.replace(rest);
                st.context = context;
                self.emit(PlayerEvent::QueueChanged(st.queue.len()));
            }
            if st.playback.current_id() != Some(song.id.as_str()) {
                st.push_current_to_previous();
            }
        }

        self.start_with_fallback(song).await
    }

    pub async fn toggle_play(&self) -> TuneResult<()> {
        let mut st = self.lock().await;
        let Some(current) = st.playback.current_song.clone() else {
            return Ok(());
        };

        match st.playback.status {
            PlayerStatus::Playing => {
                self.inner.backend.pause();
                st.playback.is_playing = false;
                st.playback.status = PlayerStatus::Paused;
            }
            PlayerStatus::Paused => {
                self.inner.backend.play();
                st.playback.is_playing = true;
                st.playback.status = PlayerStatus::Playing;
            }
            PlayerStatus::Ended => {
                self.restart(&mut st);
                return Ok(());
            }
            PlayerStatus::Error | PlayerStatus::Idle => {
                drop(st);
                return self.start_with_fallback(current).await;
            }
            PlayerStatus::Loading => return Ok(()),
        }

        self.emit(PlayerEvent::StatusChanged(st.playback.status));
        Ok(())
    }

    pub async fn handle_next(&self) -> TuneResult<()> {
        let next = {
            let mut st = self.lock().await;

            if st.playback.current_song.is_none() {
                match st.queue.pop_front() {
                    Some(song) => song,
                    None => return Ok(()),
                }
            } else if st.playback.repeat_mode == RepeatMode::One {
                self.restart(&mut st);
                return Ok(());
            } else {
                match st.next_candidate() {
                    Some(song) => song,
                    None => {
                        self.finish(&mut st);
                        return Ok(());
                    }
                }
            }
        };

        self.emit_queue().await;
        self.start_with_fallback(next).await
    }

    pub async fn skip_next(&self) -> TuneResult<()> {
        self.handle_next().await
    }

    pub async fn handle_previous(&self) -> TuneResult<()> {
        let previous = {
            let mut st = self.lock().await;
            let Some(current) = st.playback.current_song.clone() else {
                return Ok(());
            };

            if st.playback.progress > RESTART_THRESHOLD_SECS {
                self.restart(&mut st);
                return Ok(());
            }

            match st.previous.pop() {
                Some(previous) => {
                    st.queue.push_front(current);
                    previous
                }
                None => {
                    self.restart(&mut st);
                    return Ok(());
                }
            }
        };

        self.emit_queue().await;
        self.start_with_fallback(previous).await
    }

    pub async fn skip_previous(&self) -> TuneResult<()> {
        self.handle_previous().await
    }

    pub async fn seek_to(&self, seconds: f64) {
        if seconds.is_nan() {
            return;
        }

        let mut st = self.lock().await;
        if st.playback.current_song.is_none() {
            return;
        }

        let position = seconds.clamp(0.0, st.playback.duration.max(0.0));
        self.inner.backend.seek(position);
        st.playback.progress = position;
        self.emit(PlayerEvent::Progress {
            position,
            duration: st.playback.duration,
        });
    }

    pub async fn set_volume(&self, volume: f64) {
        if volume.is_nan() {
            return;
        }

        let volume = volume.clamp(0.0, 1.0);
        self.lock().await.playback.volume = volume;
        self.inner.backend.set_volume(volume);
        self.emit(PlayerEvent::VolumeChanged(volume));
    }

    pub async fn add_to_queue(&self, song: Song) {
        let mut st = self.lock().await;
        let name = song.name.clone();
        st.queue.push_back(song);
        self.emit(PlayerEvent::QueueChanged(st.queue.len()));
        self.emit(PlayerEvent::Notice(format!("Added \"{}\" to queue", name)));
    }

    /// Out-of-range indices are ignored.
    pub async fn remove_from_queue(&self, index: usize) -> Option<Song> {
        let mut st = self.lock().await;
        let removed = st.queue.remove(index);
        if removed.is_some() {
            self.emit(PlayerEvent::QueueChanged(st.queue.len()));
        }
        removed
    }

    pub async fn clear_queue(&self) {
        self.lock().await.queue.clear();
        self.emit(PlayerEvent::QueueChanged(0));
    }

    pub async fn toggle_shuffle(&self) -> bool {
        let mut st = self.lock().await;
        st.playback.shuffle_mode = !st.playback.shuffle_mode;
        self.emit_modes(&st);
        st.playback.shuffle_mode
    }

    pub async fn toggle_repeat(&self) -> RepeatMode {
        let mut st = self.lock().await;
        st.playback.repeat_mode = st.playback.repeat_mode.cycle();
        self.emit_modes(&st);
        st.playback.repeat_mode
    }

    /// Feeds a media event for the load identified by `request_id`. Events of
    /// superseded loads are dropped.
    pub async fn handle_media_event(&self, request_id: u64, event: MediaEvent) -> TuneResult<()> {
        let mut st = self.lock().await;
        if request_id != st.active_request || st.playback.current_song.is_none() {
            return Ok(());
        }

        match event {
            MediaEvent::TimeUpdate(position) => {
                if st.playback.status != PlayerStatus::Playing || position.is_nan() {
                    return Ok(());
                }
                let duration = st.playback.duration;
                st.playback.progress = if duration > 0.0 {
                    position.clamp(0.0, duration)
                } else {
                    position.max(0.0)
                };
                self.emit(PlayerEvent::Progress {
                    position: st.playback.progress,
                    duration,
                });

                if duration > 0.0 && st.playback.progress >= duration {
                    drop(st);
                    return self.track_ended().await;
                }
                Ok(())
            }
            MediaEvent::DurationChange(duration) => {
                if duration.is_finite() && duration > 0.0 {
                    st.playback.duration = duration;
                }
                Ok(())
            }
            MediaEvent::Ended => {
                drop(st);
                self.track_ended().await
            }
            MediaEvent::Error(reason) => {
                let song_id = st.playback.current_id().unwrap_or_default().to_string();
                self.fail(&mut st, PlaybackError::LoadFailed { song_id, reason });
                let next = st.next_candidate();
                drop(st);
                match next {
                    Some(song) => {
                        self.emit_queue().await;
                        self.start_with_fallback(song).await
                    }
                    None => Ok(()),
                }
            }
        }
    }

    async fn track_ended(&self) -> TuneResult<()> {
        {
            let mut st = self.lock().await;
            st.playback.status = PlayerStatus::Ended;
            st.playback.is_playing = false;
        }
        self.emit(PlayerEvent::StatusChanged(PlayerStatus::Ended));
        self.handle_next().await
    }

    /// Loads `song`; on failure keeps moving through the following tracks
    /// until one plays or there is nothing left.
    async fn start_with_fallback(&self, song: Song) -> TuneResult<()> {
        let budget = {
            let st = self.lock().await;
            st.queue.len() + st.context.len() + 1
        };

        let mut candidate = song;
        let mut attempts = 0;
        loop {
            let err = match self.begin(candidate).await {
                Ok(()) => return Ok(()),
                Err(e) if e.is_stale() => return Err(e),
                Err(e) => e,
            };

            attempts += 1;
            let next = {
                let mut st = self.lock().await;
                if attempts >= budget || !st.has_next() {
                    None
                } else {
                    st.next_candidate()
                }
            };

            match next {
                Some(song) => {
                    self.emit_queue().await;
                    candidate = song;
                }
                None => return Err(err),
            }
        }
    }

    async fn begin(&self, song: Song) -> TuneResult<()> {
        let Some(url) = song.playable_url().map(str::to_string) else {
            let mut st = self.lock().await;
            let song_id = song.id.clone();
            self.fail(&mut st, PlaybackError::NoPlayableSource { song_id });
            return Err(TuneError::NoPlayableSource { song_id: song.id });
        };

        // ids are handed out under the lock so the latest call always owns the player
        let request_id = {
            let mut st = self.lock().await;
            st.active_request += 1;
            st.playback.current_song = Some(song.clone());
            st.playback.progress = 0.0;
            st.playback.duration = song.duration.unwrap_or(0.0);
            st.playback.is_playing = false;
            st.playback.status = PlayerStatus::Loading;
            st.active_request
        };
        self.emit(PlayerEvent::TrackChanged(song.clone()));
        self.emit(PlayerEvent::StatusChanged(PlayerStatus::Loading));

        let outcome = timeout(self.inner.load_timeout, self.inner.backend.load(&url)).await;

        let mut st = self.lock().await;
        if st.active_request != request_id {
            return Err(TuneError::StaleRequest { request_id });
        }

        let reason = match outcome {
            Ok(Ok(duration)) => {
                if let Some(duration) = duration.filter(|d| d.is_finite() && *d > 0.0) {
                    st.playback.duration = duration;
                }
                self.inner.backend.set_volume(st.playback.volume);
                self.inner.backend.play();
                st.playback.is_playing = true;
                st.playback.status = PlayerStatus::Playing;
                drop(st);

                self.emit(PlayerEvent::StatusChanged(PlayerStatus::Playing));
                self.record_history(&song).await;
                return Ok(());
            }
            Ok(Err(reason)) => reason,
            Err(_) => format!(
                "no response within {} seconds",
                self.inner.load_timeout.as_secs_f64()
            ),
        };

        self.inner.backend.stop();
        let song_id = song.id.clone();
        self.fail(
            &mut st,
            PlaybackError::LoadFailed {
                song_id,
                reason: reason.clone(),
            },
        );
        Err(TuneError::Backend(reason))
    }

    fn restart(&self, st: &mut MutexGuard<'_, EngineState>) {
        self.inner.backend.seek(0.0);
        self.inner.backend.play();
        st.playback.progress = 0.0;
        st.playback.is_playing = true;
        st.playback.status = PlayerStatus::Playing;
        self.emit(PlayerEvent::StatusChanged(PlayerStatus::Playing));
        self.emit(PlayerEvent::Progress {
            position: 0.0,
            duration: st.playback.duration,
        });
    }

    fn finish(&self, st: &mut MutexGuard<'_, EngineState>) {
        self.inner.backend.pause();
        st.playback.is_playing = false;
        st.playback.status = PlayerStatus::Ended;
        self.emit(PlayerEvent::StatusChanged(PlayerStatus::Ended));
    }

    fn fail(&self, st: &mut MutexGuard<'_, EngineState>, error: PlaybackError) {
        st.playback.is_playing = false;
        if st.playback.current_id() == Some(error.song_id()) {
            st.playback.status = PlayerStatus::Error;
        }
        self.emit(PlayerEvent::Error(error));
        self.emit(PlayerEvent::StatusChanged(st.playback.status));
    }

    async fn record_history(&self, song: &Song) {
        if let Some(history) = &self.inner.history {
            let mut history = history.lock().await;
            history.record(song);
            if let Err(e) = history.persist().await {
                self.emit(PlayerEvent::Notice(format!("Couldn't save listening history: {}", e)));
            }
        }
    }

    async fn emit_queue(&self) {
        let len = self.lock().await.queue.len();
        self.emit(PlayerEvent::QueueChanged(len));
    }

    fn emit_modes(&self, st: &EngineState) {
        self.emit(PlayerEvent::ModesChanged {
            repeat: st.playback.repeat_mode,
            shuffle: st.playback.shuffle_mode,
        });
    }

    fn emit(&self, event: PlayerEvent) {
        // no subscribers is fine
        let _ = self.inner.events.send(event);
    }

    async fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.inner.state.lock().await
    }
}
