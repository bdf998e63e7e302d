//! Best-effort user-facing notices originated by the engine itself, i.e.
//! outside any command invocation (auto-advance, empty-queue shutdown).
//! Delivery failures are logged and swallowed; they must never abort
//! playback logic.

use super::super::audio_sources::track::Track;
use super::embedded_messages;
use poise::serenity_prelude as serenity;
use serenity::all::CreateMessage;
use serenity::async_trait;
use serenity::model::id::ChannelId;
use std::sync::Arc;
use tracing::warn;

/// An engine-originated playback notice.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// The queue advanced to a new track.
    NowPlaying(Track),
    /// The queue drained; playback stopped and the bot disconnected.
    QueueEmpty,
    /// Advancing failed (typically a stream re-resolution failure).
    AdvanceFailed(String),
}

#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    async fn send(&self, channel_id: ChannelId, notice: Notice);
}

/// Sends notices as embeds to the guild's last-used text channel.
pub struct ChannelNotifier {
    http: Arc<serenity::Http>,
}

impl ChannelNotifier {
    pub fn new(http: Arc<serenity::Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn send(&self, channel_id: ChannelId, notice: Notice) {
        let embed = match &notice {
            Notice::NowPlaying(track) => embedded_messages::now_playing_embed(track),
            Notice::QueueEmpty => embedded_messages::queue_empty_embed(),
            Notice::AdvanceFailed(reason) => embedded_messages::advance_failed_embed(reason),
        };

        let message = CreateMessage::new().embed(embed);
        if let Err(e) = channel_id.send_message(self.http.clone(), message).await {
            warn!(
                "Failed to send playback notice to channel {}: {}",
                channel_id, e
            );
        }
    }
}
