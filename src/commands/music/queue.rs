use super::*;
use crate::commands::music::utils::{embedded_messages, engine::PlaybackError};

/// View the current music queue
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn queue(ctx: Context<'_>) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or_else(|| {
        Box::new(PlaybackError::NotInGuild) as Box<dyn std::error::Error + Send + Sync>
    })?;

    let player = &ctx.data().player;
    let view = player
        .queue_view(guild_id, player.config().queue_preview)
        .await;

    ctx.send(embedded_messages::queue(&view)).await?;

    Ok(())
}
