use super::*;
use crate::commands::music::utils::{
    embedded_messages,
    engine::{PlaybackError, ResumeOutcome},
    user_voice_channel,
};
use poise::serenity_prelude as serenity;
use serenity::model::id::GuildId;

/// Resume playback from the front of the queue
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn resume(ctx: Context<'_>) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or_else(|| {
        Box::new(PlaybackError::NotInGuild) as Box<dyn std::error::Error + Send + Sync>
    })?;

    resume_playback(ctx, guild_id).await
}

/// Shared resume path, also used by a bare `play` invocation.
pub(crate) async fn resume_playback(ctx: Context<'_>, guild_id: GuildId) -> CommandResult {
    let user_channel = user_voice_channel(ctx.serenity_context(), guild_id, ctx.author().id);
    let player = &ctx.data().player;

    // Resuming re-resolves the stream URL, which may take a moment.
    ctx.defer().await?;

    match player
        .resume(guild_id, user_channel, ctx.channel_id())
        .await
    {
        Ok(ResumeOutcome::AlreadyPlaying) => {
            ctx.send(embedded_messages::already_playing()).await?;
        }
        Ok(ResumeOutcome::Resumed(track)) => {
            ctx.send(embedded_messages::now_playing(&track)).await?;
        }
        Err(err) => {
            ctx.send(embedded_messages::playback_error(&err)).await?;
        }
    }

    Ok(())
}
