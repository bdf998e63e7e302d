//! Sample data used across the integration tests.

use jukebot::commands::music::audio_sources::track::Track;
use serenity::model::id::{ChannelId, GuildId};
use std::time::Duration;

pub fn guild() -> GuildId {
    GuildId::new(900_100_001)
}

pub fn other_guild() -> GuildId {
    GuildId::new(900_100_002)
}

pub fn voice_channel() -> ChannelId {
    ChannelId::new(111_222_333)
}

pub fn text_channel() -> ChannelId {
    ChannelId::new(444_555_666)
}

pub fn page_url(name: &str) -> String {
    format!("https://videos.example/watch?v={}", name)
}

pub fn track(name: &str) -> Track {
    Track {
        stream_url: format!("https://cdn.example/stream/{}", name),
        title: name.to_string(),
        page_url: page_url(name),
        duration: Duration::from_secs(180),
    }
}
