use ::serenity::all::ClientBuilder;
use dotenv::dotenv;
use poise::serenity_prelude as serenity;
use songbird::SerenityInit;
use std::env;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use jukebot::commands::music::audio_sources::ytdl::YtDlpResolver;
use jukebot::commands::music::utils::embedded_messages;
use jukebot::commands::music::utils::engine::{PlaybackEngine, PlaybackError};
use jukebot::commands::music::utils::notify::ChannelNotifier;
use jukebot::commands::music::utils::output::SongbirdOutput;
use jukebot::commands::music::{clear::*, play::*, queue::*, resume::*, skip::*, stop::*};
use jukebot::config::PlayerConfig;
use jukebot::{CommandResult, Context, Data, Error, HTTP_CLIENT};

#[poise::command(slash_command, category = "General")]
async fn help(
    ctx: Context<'_>,
    #[description = "Specific command to show help about"]
    #[autocomplete = "poise::builtins::autocomplete_command"]
    command: Option<String>,
) -> CommandResult {
    poise::builtins::help(
        ctx,
        command.as_deref(),
        poise::builtins::HelpConfiguration {
            show_context_menu_commands: true,
            ..Default::default()
        },
    )
    .await
    .map_err(|e| e.into())
}

#[poise::command(prefix_command, hide_in_help)]
async fn register(ctx: Context<'_>) -> Result<(), Error> {
    poise::builtins::register_application_commands_buttons(ctx)
        .await
        .map_err(|e| e.into())
}

/// Handles a failure no layer recognized: logged and swallowed in lenient
/// mode; in strict mode the task panics so development setups fail fast
/// instead of limping on.
fn report_unrecognized(strict: bool, command: &str, error: &Error) {
    if strict {
        panic!("Unhandled error in command '{}': {:?}", command, error);
    }
    warn!("Error in command '{}': {}", command, error);
}

/// Boundary error handler: expected playback errors become friendly
/// replies; anything unrecognized notifies the user first, then goes
/// through `report_unrecognized`.
async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            if let Some(playback) = error.downcast_ref::<PlaybackError>() {
                if let Err(e) = ctx.send(embedded_messages::playback_error(playback)).await {
                    error!("Failed to send error reply: {}", e);
                }
                return;
            }

            if let Err(e) = ctx.say("⚠️ An unexpected error occurred.").await {
                error!("Failed to send error reply: {}", e);
            }
            report_unrecognized(
                ctx.data().player.config().strict_errors,
                &ctx.command().qualified_name,
                &error,
            );
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize logging with debug level for our crate
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("jukebot=debug,warn")),
        )
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_target(true)
        .with_ansi(true)
        .pretty()
        .init();

    dotenv().ok();

    let token = env::var("DISCORD_TOKEN").expect("Missing DISCORD_TOKEN");

    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::GUILD_VOICE_STATES;

    let commands = vec![
        // Default commands
        register(),
        help(),
        // Music commands
        play(),
        skip(),
        stop(),
        resume(),
        queue(),
        clear(),
    ];

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands,
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some("!".into()),
                ..Default::default()
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, _ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;

                let songbird = songbird::get(ctx)
                    .await
                    .expect("Songbird voice client placed in scope at initialization.");

                let config = PlayerConfig::from_env();
                let player = PlaybackEngine::new(
                    YtDlpResolver::new(&config),
                    SongbirdOutput::new(songbird, HTTP_CLIENT.clone()),
                    ChannelNotifier::new(ctx.http.clone()),
                    config,
                );

                Ok(Data { player })
            })
        });

    let mut client = ClientBuilder::new(token, intents)
        .framework(framework.build())
        .register_songbird()
        .await?;

    client.start().await.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "Unhandled error in command 'play'")]
    fn strict_mode_panics_on_unrecognized_errors() {
        let error: Error = "something went sideways".into();
        report_unrecognized(true, "play", &error);
    }

    #[test]
    fn lenient_mode_swallows_unrecognized_errors() {
        let error: Error = "something went sideways".into();
        report_unrecognized(false, "play", &error);
    }
}
