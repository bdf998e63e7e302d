//! The audio output contract consumed by the playback engine, and its
//! songbird-backed production implementation.
//!
//! Playback completion is reported as a message: the engine hands `play` a
//! `CompletionSink` bound to the guild and the session epoch at start time,
//! and the sink posts a `CompletionEvent` onto the engine's channel exactly
//! once, whether the track ended naturally, was stopped, or errored. The
//! songbird driver fires its track events on its own worker threads, so the
//! sink is the only bridge back into the player's serialized state.

use super::super::audio_sources::track::Track;
use super::engine::PlaybackError;
use dashmap::DashMap;
use serenity::async_trait;
use serenity::model::id::{ChannelId, GuildId};
use songbird::input::HttpRequest;
use songbird::tracks::{PlayMode, TrackHandle};
use songbird::{Event, EventContext, EventHandler, Songbird, TrackEvent};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

/// Posted by an audio output when playback of one track finishes.
#[derive(Debug)]
pub struct CompletionEvent {
    pub guild_id: GuildId,
    /// The session epoch at the time the track started.
    pub epoch: u64,
    /// Present if the track ended because of a driver error.
    pub error: Option<String>,
}

/// One-shot handle used to report that a track finished playing.
pub struct CompletionSink {
    tx: UnboundedSender<CompletionEvent>,
    guild_id: GuildId,
    epoch: u64,
}

impl CompletionSink {
    pub(crate) fn new(tx: UnboundedSender<CompletionEvent>, guild_id: GuildId, epoch: u64) -> Self {
        Self { tx, guild_id, epoch }
    }

    /// Reports completion. Consumes the sink so it can fire at most once;
    /// a send failure only means the engine is gone, which is fine.
    pub fn complete(self, error: Option<String>) {
        let _ = self.tx.send(CompletionEvent {
            guild_id: self.guild_id,
            epoch: self.epoch,
            error,
        });
    }
}

/// Contract for the voice-connection and audio-streaming backend.
#[async_trait]
pub trait AudioOutput: Send + Sync + 'static {
    /// Joins the given voice channel.
    async fn connect(&self, guild_id: GuildId, channel_id: ChannelId)
    -> Result<(), PlaybackError>;

    /// Starts streaming a track. `on_complete` fires exactly once when
    /// playback ends naturally, is stopped, or errors.
    async fn play(
        &self,
        guild_id: GuildId,
        track: &Track,
        on_complete: CompletionSink,
    ) -> Result<(), PlaybackError>;

    /// Best-effort immediate halt of the current track. Triggers the
    /// pending completion with no error.
    async fn stop(&self, guild_id: GuildId);

    /// Releases the voice connection.
    async fn disconnect(&self, guild_id: GuildId) -> Result<(), PlaybackError>;

    /// Whether audio is actively streaming for this guild.
    async fn is_playing(&self, guild_id: GuildId) -> bool;
}

/// Songbird-backed audio output.
pub struct SongbirdOutput {
    songbird: Arc<Songbird>,
    http_client: reqwest::Client,
    // Current track handle per guild, kept for stop/is_playing.
    handles: DashMap<GuildId, TrackHandle>,
}

impl SongbirdOutput {
    pub fn new(songbird: Arc<Songbird>, http_client: reqwest::Client) -> Self {
        Self {
            songbird,
            http_client,
            handles: DashMap::new(),
        }
    }
}

#[async_trait]
impl AudioOutput for SongbirdOutput {
    async fn connect(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<(), PlaybackError> {
        self.songbird
            .join(guild_id, channel_id)
            .await
            .map(|_| ())
            .map_err(|e| PlaybackError::VoiceConnection(e.to_string()))
    }

    async fn play(
        &self,
        guild_id: GuildId,
        track: &Track,
        on_complete: CompletionSink,
    ) -> Result<(), PlaybackError> {
        let call = self.songbird.get(guild_id).ok_or_else(|| {
            PlaybackError::VoiceConnection("not connected to a voice channel".to_string())
        })?;

        let source = HttpRequest::new(self.http_client.clone(), track.stream_url.clone());
        let handle = call.lock().await.play_only_input(source.into());

        // End and Error share one sink; whichever fires first consumes it.
        let sink = Arc::new(Mutex::new(Some(on_complete)));
        let _ = handle.add_event(
            Event::Track(TrackEvent::End),
            PlaybackEndNotifier { sink: sink.clone() },
        );
        let _ = handle.add_event(Event::Track(TrackEvent::Error), PlaybackEndNotifier { sink });

        self.handles.insert(guild_id, handle);
        Ok(())
    }

    async fn stop(&self, guild_id: GuildId) {
        if let Some(handle) = self.handles.get(&guild_id) {
            if let Err(e) = handle.stop() {
                debug!("Failed to stop track for guild {}: {}", guild_id, e);
            }
        }
    }

    async fn disconnect(&self, guild_id: GuildId) -> Result<(), PlaybackError> {
        self.handles.remove(&guild_id);
        self.songbird
            .remove(guild_id)
            .await
            .map_err(|e| PlaybackError::VoiceConnection(e.to_string()))
    }

    async fn is_playing(&self, guild_id: GuildId) -> bool {
        let Some(handle) = self.handles.get(&guild_id) else {
            return false;
        };
        match handle.get_info().await {
            Ok(info) => matches!(info.playing, PlayMode::Play),
            Err(_) => false,
        }
    }
}

/// Songbird event handler that fires the completion sink once.
struct PlaybackEndNotifier {
    sink: Arc<Mutex<Option<CompletionSink>>>,
}

#[async_trait]
impl EventHandler for PlaybackEndNotifier {
    async fn act(&self, ctx: &EventContext<'_>) -> Option<Event> {
        if let EventContext::Track(tracks) = ctx {
            let error = tracks.iter().find_map(|(state, _)| match &state.playing {
                PlayMode::Errored(e) => Some(e.to_string()),
                _ => None,
            });

            let sink = match self.sink.lock() {
                Ok(mut guard) => guard.take(),
                Err(e) => {
                    warn!("Completion sink lock poisoned: {}", e);
                    None
                }
            };
            if let Some(sink) = sink {
                sink.complete(error);
            }
        }
        None
    }
}
