use super::*;
use crate::commands::music::utils::{
    embedded_messages,
    engine::{EnqueueOutcome, PlaybackError, PlayOutcome},
    user_voice_channel,
};
use tracing::info;

/// Play a track from a URL or search term
///
/// Pass --add to queue it behind the current track instead of interrupting it.
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn play(
    ctx: Context<'_>,
    #[rest]
    #[description = "URL or search query; append --add to queue without interrupting"]
    query: Option<String>,
) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or_else(|| {
        Box::new(PlaybackError::NotInGuild) as Box<dyn std::error::Error + Send + Sync>
    })?;

    // A bare `play` restarts playback from the queue, like `resume`.
    let Some(raw) = query else {
        return resume::resume_playback(ctx, guild_id).await;
    };

    // The original command syntax mixes the flag into the free text.
    let mut terms: Vec<&str> = raw.split_whitespace().collect();
    let add = terms.iter().any(|term| *term == "--add");
    terms.retain(|term| *term != "--add");
    let input = terms.join(" ");

    if input.is_empty() {
        return resume::resume_playback(ctx, guild_id).await;
    }

    let user_channel = user_voice_channel(ctx.serenity_context(), guild_id, ctx.author().id);
    if user_channel.is_none() {
        ctx.send(embedded_messages::playback_error(
            &PlaybackError::NotInVoiceChannel,
        ))
        .await?;
        return Ok(());
    }

    info!("Received play command for guild {}: {}", guild_id, input);

    // Resolution may take a while.
    ctx.defer().await?;

    let player = &ctx.data().player;
    let track = match player.resolve(&input).await {
        Ok(track) => track,
        Err(err) => {
            ctx.send(embedded_messages::playback_error(&err)).await?;
            return Ok(());
        }
    };

    let notify_channel = ctx.channel_id();

    if add {
        match player
            .enqueue(guild_id, user_channel, notify_channel, track.clone())
            .await
        {
            Ok(EnqueueOutcome::Started {
                track: started,
                position,
            }) => {
                ctx.send(embedded_messages::added_to_queue(&track, position))
                    .await?;
                ctx.send(embedded_messages::now_playing(&started)).await?;
            }
            Ok(EnqueueOutcome::Queued { position }) => {
                ctx.send(embedded_messages::added_to_queue(&track, position))
                    .await?;
            }
            Err(err) => {
                ctx.send(embedded_messages::playback_error(&err)).await?;
            }
        }
        return Ok(());
    }

    match player
        .play_now(guild_id, user_channel, notify_channel, track)
        .await
    {
        Ok(PlayOutcome::Started(started)) => {
            ctx.send(embedded_messages::now_playing(&started)).await?;
        }
        Ok(PlayOutcome::Interrupted(requested)) => {
            // The "now playing" notice follows from the engine once the
            // interrupted track's completion has been applied.
            ctx.send(embedded_messages::playing_next(&requested)).await?;
        }
        Err(err) => {
            ctx.send(embedded_messages::playback_error(&err)).await?;
        }
    }

    Ok(())
}
