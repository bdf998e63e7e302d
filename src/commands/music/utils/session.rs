//! Per-guild playback state and the registry that owns it.
//!
//! The registry replaces the ambient guild-keyed maps of earlier bots with
//! a single object injected into the playback engine. Each session sits
//! behind its own `tokio::sync::Mutex`; commands and completion handling
//! both lock it, which serializes every mutation for a guild while leaving
//! guilds fully independent of each other.

use super::super::audio_sources::track::Track;
use super::queue::TrackQueue;
use dashmap::DashMap;
use serenity::model::id::{ChannelId, GuildId};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Mutable playback state for one guild.
pub struct PlaybackSession {
    pub guild_id: GuildId,
    pub queue: TrackQueue,
    /// The track that is playing, or was last playing. A `stop` keeps it
    /// set so the session remembers what to resume.
    pub current: Option<Track>,
    /// The voice channel we are connected to, if any.
    pub voice_channel: Option<ChannelId>,
    /// The text channel that playback notices are sent to.
    pub notify_channel: Option<ChannelId>,
    /// Generation counter, bumped on every playback start and explicit
    /// stop. Completion events carrying an older value are discarded.
    pub epoch: u64,
}

impl PlaybackSession {
    fn new(guild_id: GuildId) -> Self {
        Self {
            guild_id,
            queue: TrackQueue::new(),
            current: None,
            voice_channel: None,
            notify_channel: None,
            epoch: 0,
        }
    }
}

/// Maps guild IDs to their playback sessions. Sessions are created lazily
/// on first touch and persist (possibly empty) between uses.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<GuildId, Arc<Mutex<PlaybackSession>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the session for a guild, creating it if absent.
    pub fn session(&self, guild_id: GuildId) -> Arc<Mutex<PlaybackSession>> {
        self.sessions
            .entry(guild_id)
            .or_insert_with(|| Arc::new(Mutex::new(PlaybackSession::new(guild_id))))
            .clone()
    }
}
