//! Test doubles for the playback engine's collaborator traits.
//!
//! The fakes are cheaply clonable over shared state so a test can keep a
//! handle while the engine owns another. `FakeOutput` captures the
//! completion sinks handed to `play`, letting tests end tracks on demand
//! exactly the way the real audio driver would.

use async_trait::async_trait;
use jukebot::commands::music::audio_sources::track::Track;
use jukebot::commands::music::audio_sources::StreamResolver;
use jukebot::commands::music::utils::engine::PlaybackError;
use jukebot::commands::music::utils::notify::{Notice, Notifier};
use jukebot::commands::music::utils::output::{AudioOutput, CompletionSink};
use mockall::mock;
use serenity::model::id::{ChannelId, GuildId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::fixtures;

/// Resolver backed by a map of page URL / query -> track.
#[derive(Clone, Default)]
pub struct FakeResolver {
    inner: Arc<ResolverState>,
}

#[derive(Default)]
struct ResolverState {
    tracks: Mutex<HashMap<String, Track>>,
    url_requests: Mutex<Vec<String>>,
    url_delays: Mutex<HashMap<String, Duration>>,
}

impl FakeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a track under both its page URL and its title, so it can
    /// be found by `resolve_url` (refresh) and `resolve_query` (search).
    pub fn register(&self, track: &Track) {
        let mut tracks = self.inner.tracks.lock().unwrap();
        tracks.insert(track.page_url.clone(), track.clone());
        tracks.insert(track.title.clone(), track.clone());
    }

    /// Page URLs requested through `resolve_url`, in order.
    pub fn url_requests(&self) -> Vec<String> {
        self.inner.url_requests.lock().unwrap().clone()
    }

    /// Makes `resolve_url` calls for this page URL sleep before answering.
    pub fn delay_url(&self, url: &str, delay: Duration) {
        self.inner
            .url_delays
            .lock()
            .unwrap()
            .insert(url.to_string(), delay);
    }

    fn lookup(&self, key: &str) -> Result<Track, PlaybackError> {
        self.inner
            .tracks
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| PlaybackError::ResolutionFailed(format!("unknown source: {}", key)))
    }
}

#[async_trait]
impl StreamResolver for FakeResolver {
    async fn resolve_query(&self, query: &str) -> Result<Track, PlaybackError> {
        self.lookup(query)
    }

    async fn resolve_url(&self, url: &str) -> Result<Track, PlaybackError> {
        self.inner
            .url_requests
            .lock()
            .unwrap()
            .push(url.to_string());
        let delay = self.inner.url_delays.lock().unwrap().get(url).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.lookup(url)
    }
}

/// Resolver that takes a fixed amount of time for every request, for
/// exercising the engine's resolution timeout.
#[derive(Clone)]
pub struct SlowResolver {
    pub delay: Duration,
}

#[async_trait]
impl StreamResolver for SlowResolver {
    async fn resolve_query(&self, query: &str) -> Result<Track, PlaybackError> {
        tokio::time::sleep(self.delay).await;
        Ok(fixtures::track(query))
    }

    async fn resolve_url(&self, _url: &str) -> Result<Track, PlaybackError> {
        tokio::time::sleep(self.delay).await;
        Ok(fixtures::track("slow"))
    }
}

mock! {
    pub Resolver {}

    #[async_trait]
    impl StreamResolver for Resolver {
        async fn resolve_query(&self, query: &str) -> Result<Track, PlaybackError>;
        async fn resolve_url(&self, url: &str) -> Result<Track, PlaybackError>;
    }
}

/// Audio output that records connections and plays, and holds on to the
/// completion sink of the "playing" track per guild.
#[derive(Clone, Default)]
pub struct FakeOutput {
    inner: Arc<OutputState>,
}

#[derive(Default)]
struct OutputState {
    sinks: Mutex<HashMap<GuildId, CompletionSink>>,
    connects: Mutex<Vec<(GuildId, ChannelId)>>,
    disconnects: Mutex<Vec<GuildId>>,
    played: Mutex<Vec<Track>>,
    fail_connect: AtomicBool,
}

impl FakeOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_connections(&self) {
        self.inner.fail_connect.store(true, Ordering::SeqCst);
    }

    /// Ends the guild's current track as if it played to completion.
    pub fn finish_current(&self, guild_id: GuildId) -> bool {
        match self.take_sink(guild_id) {
            Some(sink) => {
                sink.complete(None);
                true
            }
            None => false,
        }
    }

    /// Removes and returns the pending completion sink, leaving the fake
    /// in a "not playing" state without firing the completion.
    pub fn take_sink(&self, guild_id: GuildId) -> Option<CompletionSink> {
        self.inner.sinks.lock().unwrap().remove(&guild_id)
    }

    pub fn played(&self) -> Vec<Track> {
        self.inner.played.lock().unwrap().clone()
    }

    pub fn played_titles(&self) -> Vec<String> {
        self.played().into_iter().map(|t| t.title).collect()
    }

    pub fn connects(&self) -> Vec<(GuildId, ChannelId)> {
        self.inner.connects.lock().unwrap().clone()
    }

    pub fn disconnects(&self) -> Vec<GuildId> {
        self.inner.disconnects.lock().unwrap().clone()
    }
}

#[async_trait]
impl AudioOutput for FakeOutput {
    async fn connect(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<(), PlaybackError> {
        if self.inner.fail_connect.load(Ordering::SeqCst) {
            return Err(PlaybackError::VoiceConnection(
                "simulated join failure".to_string(),
            ));
        }
        self.inner
            .connects
            .lock()
            .unwrap()
            .push((guild_id, channel_id));
        Ok(())
    }

    async fn play(
        &self,
        guild_id: GuildId,
        track: &Track,
        on_complete: CompletionSink,
    ) -> Result<(), PlaybackError> {
        self.inner.played.lock().unwrap().push(track.clone());
        self.inner.sinks.lock().unwrap().insert(guild_id, on_complete);
        Ok(())
    }

    async fn stop(&self, guild_id: GuildId) {
        // Mirrors the real driver: a stop triggers the completion with no
        // error.
        if let Some(sink) = self.take_sink(guild_id) {
            sink.complete(None);
        }
    }

    async fn disconnect(&self, guild_id: GuildId) -> Result<(), PlaybackError> {
        self.inner.disconnects.lock().unwrap().push(guild_id);
        if let Some(sink) = self.take_sink(guild_id) {
            sink.complete(None);
        }
        Ok(())
    }

    async fn is_playing(&self, guild_id: GuildId) -> bool {
        self.inner.sinks.lock().unwrap().contains_key(&guild_id)
    }
}

/// Notifier that records everything it is asked to send.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<(ChannelId, Notice)>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<(ChannelId, Notice)> {
        self.notices.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, channel_id: ChannelId, notice: Notice) {
        self.notices.lock().unwrap().push((channel_id, notice));
    }
}
