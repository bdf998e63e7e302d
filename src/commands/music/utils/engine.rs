//! The playback engine: drives the per-guild queue/session state machine.
//!
//! Each guild moves between Idle (no voice connection, no current track),
//! Playing (audio streaming), and Advancing (a completion event is being
//! applied). Commands arrive on the gateway context; completion events
//! arrive from the audio driver's own threads and are posted as messages
//! onto an mpsc channel, where a dispatcher hands each one its own task.
//! Both paths lock the guild's session before touching it, so all
//! mutations for a guild are serialized while guilds stay independent.
//!
//! Stream URLs from the resolver expire, so any playback start that did
//! not immediately follow resolution (auto-advance, resume) re-resolves
//! the track from its stable page URL first.

use super::super::audio_sources::{AudioSource, StreamResolver, track::Track};
use super::notify::{Notice, Notifier};
use super::output::{AudioOutput, CompletionEvent, CompletionSink};
use super::session::{PlaybackSession, SessionRegistry};
use crate::config::PlayerConfig;
use serenity::model::id::{ChannelId, GuildId};
use std::future::Future;
use std::sync::{Arc, Weak};
use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};

/// Errors that can occur during playback operations.
#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("the queue is empty")]
    EmptyQueue,

    #[error("you need to be in a voice channel")]
    NotInVoiceChannel,

    #[error("track is too long: {duration}s exceeds the {max}s limit")]
    TrackTooLong { duration: u64, max: u64 },

    #[error("failed to resolve track: {0}")]
    ResolutionFailed(String),

    #[error("voice connection error: {0}")]
    VoiceConnection(String),

    #[error("this command can only be used in a server")]
    NotInGuild,
}

/// Result of a `play_now` request.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayOutcome {
    /// Nothing was playing; the requested track started directly.
    Started(Track),
    /// A track was playing; it was returned to the queue front behind the
    /// requested track, and the completion path will start the new track.
    Interrupted(Track),
}

/// Result of an `enqueue` request.
#[derive(Debug, Clone, PartialEq)]
pub enum EnqueueOutcome {
    /// The track was appended while something was already playing.
    Queued { position: usize },
    /// Nothing was playing, so playback started with the queue front.
    Started { track: Track, position: usize },
}

/// Result of a `resume` request.
#[derive(Debug, Clone, PartialEq)]
pub enum ResumeOutcome {
    AlreadyPlaying,
    Resumed(Track),
}

/// Snapshot of a guild's queue for display.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueView {
    pub current: Option<Track>,
    pub upcoming: Vec<Track>,
    pub total: usize,
}

pub struct PlaybackEngine<R, O, N> {
    resolver: R,
    output: O,
    notifier: N,
    sessions: SessionRegistry,
    config: PlayerConfig,
    completions: UnboundedSender<CompletionEvent>,
}

impl<R, O, N> PlaybackEngine<R, O, N>
where
    R: StreamResolver,
    O: AudioOutput,
    N: Notifier,
{
    /// Creates the engine and spawns its completion worker. The worker
    /// holds a weak reference, so dropping the last `Arc` shuts it down.
    pub fn new(resolver: R, output: O, notifier: N, config: PlayerConfig) -> Arc<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = Arc::new(Self {
            resolver,
            output,
            notifier,
            sessions: SessionRegistry::new(),
            config,
            completions: tx,
        });
        Self::spawn_completion_worker(Arc::downgrade(&engine), rx);
        engine
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    fn spawn_completion_worker(engine: Weak<Self>, mut rx: UnboundedReceiver<CompletionEvent>) {
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let Some(engine) = engine.upgrade() else {
                    break;
                };
                // Each event gets its own task: an advance that is slow to
                // re-resolve in one guild must not hold up another guild's
                // completion. The session lock keeps a guild's own events
                // ordered, and the epoch check discards stale ones.
                tokio::spawn(async move {
                    engine.handle_completion(event).await;
                });
            }
            debug!("Completion worker shut down");
        });
    }

    /// Resolves user input (link or search term) into a track, bounded by
    /// the configured resolution timeout.
    pub async fn resolve(&self, input: &str) -> Result<Track, PlaybackError> {
        if AudioSource::is_url(input) {
            self.timed(self.resolver.resolve_url(input)).await
        } else {
            self.timed(self.resolver.resolve_query(input)).await
        }
    }

    /// Plays a track right away, preserving whatever was playing.
    ///
    /// If a track is active, it is re-inserted at the queue front so it is
    /// never lost, the new track goes in front of it, and the output is
    /// stopped; the resulting completion event advances to the new track.
    pub async fn play_now(
        &self,
        guild_id: GuildId,
        user_channel: Option<ChannelId>,
        notify_channel: ChannelId,
        track: Track,
    ) -> Result<PlayOutcome, PlaybackError> {
        let session = self.sessions.session(guild_id);
        let mut session = session.lock().await;
        session.notify_channel = Some(notify_channel);

        if self.output.is_playing(guild_id).await {
            if let Some(current) = session.current.clone() {
                session.queue.push_front(current);
            }
            session.queue.push_front(track.clone());
            // The epoch is left alone: the stop below fires a completion
            // event for the active track, and that event must advance to
            // the track we just put at the front.
            self.output.stop(guild_id).await;
            return Ok(PlayOutcome::Interrupted(track));
        }

        session.queue.push_front(track);
        // The stream URL was resolved moments ago; no refresh needed.
        let started = self.start_next(&mut session, user_channel, false).await?;
        Ok(PlayOutcome::Started(started))
    }

    /// Appends a track to the queue. If nothing is playing, playback
    /// starts immediately from the queue front.
    pub async fn enqueue(
        &self,
        guild_id: GuildId,
        user_channel: Option<ChannelId>,
        notify_channel: ChannelId,
        track: Track,
    ) -> Result<EnqueueOutcome, PlaybackError> {
        let session = self.sessions.session(guild_id);
        let mut session = session.lock().await;
        session.notify_channel = Some(notify_channel);

        session.queue.push_back(track);
        let position = session.queue.len();

        if self.output.is_playing(guild_id).await {
            return Ok(EnqueueOutcome::Queued { position });
        }

        // The queue front may be older than the track just added, so the
        // start always refreshes.
        let started = self.start_next(&mut session, user_channel, true).await?;
        Ok(EnqueueOutcome::Started {
            track: started,
            position,
        })
    }

    /// Stops the current track so the completion path advances to the next
    /// one. The skipped track is discarded, not re-queued. Returns false
    /// if nothing was playing.
    pub async fn skip(&self, guild_id: GuildId) -> bool {
        let session = self.sessions.session(guild_id);
        let _session = session.lock().await;

        if !self.output.is_playing(guild_id).await {
            return false;
        }
        info!("Skipping current track for guild {}", guild_id);
        self.output.stop(guild_id).await;
        true
    }

    /// Stops playback and disconnects. The interrupted track is returned
    /// to the queue front so `resume` picks it up again; `current` keeps
    /// pointing at it in the meantime. Returns false if there was no
    /// voice connection.
    pub async fn stop(&self, guild_id: GuildId) -> bool {
        let session = self.sessions.session(guild_id);
        let mut session = session.lock().await;

        if let Some(current) = session.current.clone() {
            session.queue.push_front(current);
        }
        // Invalidate the completion event fired by the stop below, so it
        // does not auto-advance into the track we just preserved.
        session.epoch += 1;
        self.output.stop(guild_id).await;

        let was_connected = session.voice_channel.is_some();
        self.release_voice(&mut session).await;
        was_connected
    }

    /// Restarts playback from the queue front, refreshing the stream URL.
    pub async fn resume(
        &self,
        guild_id: GuildId,
        user_channel: Option<ChannelId>,
        notify_channel: ChannelId,
    ) -> Result<ResumeOutcome, PlaybackError> {
        let session = self.sessions.session(guild_id);
        let mut session = session.lock().await;
        session.notify_channel = Some(notify_channel);

        if self.output.is_playing(guild_id).await {
            return Ok(ResumeOutcome::AlreadyPlaying);
        }
        if session.queue.is_empty() {
            return Err(PlaybackError::EmptyQueue);
        }

        let started = self.start_next(&mut session, user_channel, true).await?;
        Ok(ResumeOutcome::Resumed(started))
    }

    /// Empties the queue. `current` and the voice connection are left
    /// untouched. Returns the number of tracks removed.
    pub async fn clear(&self, guild_id: GuildId) -> usize {
        let session = self.sessions.session(guild_id);
        let mut session = session.lock().await;
        session.queue.clear()
    }

    /// Snapshot of the current track and up to `limit` upcoming tracks.
    pub async fn queue_view(&self, guild_id: GuildId, limit: usize) -> QueueView {
        let session = self.sessions.session(guild_id);
        let session = session.lock().await;
        QueueView {
            current: session.current.clone(),
            upcoming: session.queue.peek_all(limit),
            total: session.queue.len(),
        }
    }

    /// Pops the queue front and starts playing it. Must be called with the
    /// session lock held; the lock stays held across the connect/resolve/
    /// play suspension points, which is what keeps advances for one guild
    /// strictly sequential.
    async fn start_next(
        &self,
        session: &mut PlaybackSession,
        user_channel: Option<ChannelId>,
        refresh: bool,
    ) -> Result<Track, PlaybackError> {
        if session.queue.is_empty() {
            return Err(PlaybackError::EmptyQueue);
        }

        if session.voice_channel.is_none() {
            let channel = user_channel.ok_or(PlaybackError::NotInVoiceChannel)?;
            self.output.connect(session.guild_id, channel).await?;
            session.voice_channel = Some(channel);
        }

        let queued = session.queue.pop_front().ok_or(PlaybackError::EmptyQueue)?;
        let track = if refresh {
            // Re-resolve from the stable page URL; the queued stream URL
            // may have expired. A failure drops the track rather than
            // wedging the queue front on a dead link.
            self.timed(self.resolver.resolve_url(&queued.page_url))
                .await?
        } else {
            queued
        };

        session.current = Some(track.clone());
        session.epoch += 1;
        let sink = CompletionSink::new(self.completions.clone(), session.guild_id, session.epoch);
        self.output.play(session.guild_id, &track, sink).await?;

        info!(
            "Started playback of '{}' for guild {} (epoch {})",
            track.title, session.guild_id, session.epoch
        );
        Ok(track)
    }

    /// Applies one completion event: discards it if stale, otherwise
    /// advances to the next track or winds the session down to Idle.
    async fn handle_completion(&self, event: CompletionEvent) {
        if let Some(reason) = &event.error {
            warn!(
                "Playback for guild {} ended with error: {}",
                event.guild_id, reason
            );
        }

        let session = self.sessions.session(event.guild_id);
        let mut session = session.lock().await;

        if event.epoch != session.epoch {
            debug!(
                "Discarding stale completion for guild {} (event epoch {}, session epoch {})",
                event.guild_id, event.epoch, session.epoch
            );
            return;
        }

        session.current = None;

        if session.queue.is_empty() {
            info!(
                "Queue drained for guild {}, disconnecting",
                session.guild_id
            );
            self.release_voice(&mut session).await;
            self.notify(&session, Notice::QueueEmpty).await;
            return;
        }

        match self.start_next(&mut session, None, true).await {
            Ok(track) => {
                self.notify(&session, Notice::NowPlaying(track)).await;
            }
            Err(err) => {
                // The advance halts here; the rest of the queue stays put
                // and the session is left idle for a manual resume.
                error!(
                    "Failed to advance queue for guild {}: {}",
                    session.guild_id, err
                );
                self.notify(&session, Notice::AdvanceFailed(err.to_string()))
                    .await;
            }
        }
    }

    /// Releases the voice connection, at most once per connection.
    async fn release_voice(&self, session: &mut PlaybackSession) {
        if session.voice_channel.take().is_some() {
            session.epoch += 1;
            if let Err(e) = self.output.disconnect(session.guild_id).await {
                warn!(
                    "Failed to disconnect from voice in guild {}: {}",
                    session.guild_id, e
                );
            }
        }
    }

    async fn notify(&self, session: &PlaybackSession, notice: Notice) {
        if let Some(channel) = session.notify_channel {
            self.notifier.send(channel, notice).await;
        }
    }

    async fn timed(
        &self,
        resolve: impl Future<Output = Result<Track, PlaybackError>>,
    ) -> Result<Track, PlaybackError> {
        let deadline = self.config.resolve_timeout;
        match tokio::time::timeout(deadline, resolve).await {
            Ok(result) => result,
            Err(_) => Err(PlaybackError::ResolutionFailed(format!(
                "resolution timed out after {}s",
                deadline.as_secs()
            ))),
        }
    }
}
