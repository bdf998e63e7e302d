use super::*;
use crate::commands::music::utils::{embedded_messages, engine::PlaybackError};

/// Skip the currently playing track
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn skip(ctx: Context<'_>) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or_else(|| {
        Box::new(PlaybackError::NotInGuild) as Box<dyn std::error::Error + Send + Sync>
    })?;

    if ctx.data().player.skip(guild_id).await {
        ctx.send(embedded_messages::skipped()).await?;
    } else {
        ctx.send(embedded_messages::nothing_playing()).await?;
    }

    Ok(())
}
