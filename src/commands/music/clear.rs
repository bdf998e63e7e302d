use super::*;
use crate::commands::music::utils::{embedded_messages, engine::PlaybackError};

/// Clear the music queue, leaving the current track playing
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn clear(ctx: Context<'_>) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or_else(|| {
        Box::new(PlaybackError::NotInGuild) as Box<dyn std::error::Error + Send + Sync>
    })?;

    let removed = ctx.data().player.clear(guild_id).await;
    ctx.send(embedded_messages::queue_cleared(removed)).await?;

    Ok(())
}
