use poise::serenity_prelude as serenity;
use serenity::model::id::{ChannelId, GuildId, UserId};
use std::time::Duration;

pub mod embedded_messages;
pub mod engine;
pub mod notify;
pub mod output;
pub mod queue;
pub mod session;

/// Format a duration into a human-readable string (e.g., "3:45" or "1:23:45")
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Get the voice channel the user is currently in, if any.
pub fn user_voice_channel(
    ctx: &serenity::Context,
    guild_id: GuildId,
    user_id: UserId,
) -> Option<ChannelId> {
    let guild = ctx.cache.guild(guild_id)?;
    guild
        .voice_states
        .get(&user_id)
        .and_then(|state| state.channel_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0 => "0:00")]
    #[test_case(59 => "0:59")]
    #[test_case(225 => "3:45")]
    #[test_case(3600 => "1:00:00")]
    #[test_case(5025 => "1:23:45")]
    fn formats_durations(seconds: u64) -> String {
        format_duration(Duration::from_secs(seconds))
    }
}
