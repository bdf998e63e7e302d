use super::*;
use crate::commands::music::utils::{embedded_messages, engine::PlaybackError};

/// Stop playback and disconnect, keeping the interrupted track queued
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn stop(ctx: Context<'_>) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or_else(|| {
        Box::new(PlaybackError::NotInGuild) as Box<dyn std::error::Error + Send + Sync>
    })?;

    if ctx.data().player.stop(guild_id).await {
        ctx.send(embedded_messages::stopped()).await?;
    } else {
        ctx.send(embedded_messages::not_connected()).await?;
    }

    Ok(())
}
