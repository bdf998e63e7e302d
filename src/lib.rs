use std::sync::{Arc, LazyLock};

pub mod commands;
pub mod config;

use commands::music::audio_sources::ytdl::YtDlpResolver;
use commands::music::utils::engine::PlaybackEngine;
use commands::music::utils::notify::ChannelNotifier;
use commands::music::utils::output::SongbirdOutput;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
pub type CommandResult = Result<(), Error>;

/// The production playback engine: yt-dlp resolution, songbird output,
/// notices sent back to Discord text channels.
pub type Player = PlaybackEngine<YtDlpResolver, SongbirdOutput, ChannelNotifier>;

/// User data, which is stored and accessible in all command invocations
pub struct Data {
    pub player: Arc<Player>,
}

/// Shared HTTP client handed to songbird audio inputs.
pub static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(reqwest::Client::new);
