//! Embed builders for command replies and engine notices.

use poise::{CreateReply, serenity_prelude as serenity};
use serenity::all::CreateEmbed;

use super::super::audio_sources::track::Track;
use super::engine::{PlaybackError, QueueView};
use super::format_duration;

fn track_line(track: &Track) -> String {
    format!("[{}]({})", track.title, track.page_url)
}

pub fn now_playing_embed(track: &Track) -> CreateEmbed {
    CreateEmbed::new()
        .title("🎶 Now Playing")
        .description(track_line(track))
        .field("Duration", format!("`{}`", format_duration(track.duration)), true)
        .color(0x00ff00)
}

pub fn queue_empty_embed() -> CreateEmbed {
    CreateEmbed::new()
        .title("📭 Queue Empty")
        .description("The queue is empty, stopping playback.")
        .color(0xffaa00)
}

pub fn advance_failed_embed(reason: &str) -> CreateEmbed {
    CreateEmbed::new()
        .title("❌ Playback Error")
        .description(format!("Could not play the next track: {}", reason))
        .color(0xff0000)
}

pub fn now_playing(track: &Track) -> CreateReply {
    CreateReply::default().embed(now_playing_embed(track))
}

pub fn added_to_queue(track: &Track, position: usize) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title("✅ Added to Queue")
            .description(track_line(track))
            .field("Duration", format!("`{}`", format_duration(track.duration)), true)
            .field("Position", format!("`#{}`", position), true)
            .color(0x00ff00),
    )
}

/// Reply for a `play` that interrupts the current track.
pub fn playing_next(track: &Track) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title("▶️ Playing Immediately")
            .description(format!(
                "{}\nThe interrupted track was returned to the front of the queue.",
                track_line(track)
            ))
            .color(0x00ff00),
    )
}

pub fn skipped() -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title("⏭️ Skipped")
            .description("Playing the next track in the queue.")
            .color(0x00ff00),
    )
}

pub fn nothing_playing() -> CreateReply {
    CreateReply::default()
        .embed(
            CreateEmbed::new()
                .title("🔇 Nothing Playing")
                .description("There is no track playing right now.")
                .color(0xffaa00),
        )
        .ephemeral(true)
}

pub fn stopped() -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title("🛑 Playback Stopped")
            .description("The current track was kept at the front of the queue; use `/resume` to pick it back up.")
            .color(0xffaa00),
    )
}

pub fn not_connected() -> CreateReply {
    CreateReply::default()
        .embed(
            CreateEmbed::new()
                .title("🔇 Not Connected")
                .description("The bot is not connected to a voice channel.")
                .color(0xffaa00),
        )
        .ephemeral(true)
}

pub fn already_playing() -> CreateReply {
    CreateReply::default()
        .embed(
            CreateEmbed::new()
                .title("🎶 Already Playing")
                .description("A track is already playing.")
                .color(0xffaa00),
        )
        .ephemeral(true)
}

pub fn queue_cleared(removed: usize) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title("🗑️ Queue Cleared")
            .description(format!("Removed `{}` track(s) from the queue.", removed))
            .color(0x00ff00),
    )
}

pub fn queue(view: &QueueView) -> CreateReply {
    let mut description = String::new();

    match &view.current {
        Some(track) => {
            description.push_str("**🎶 Now Playing**\n");
            description.push_str(&format!(
                "{} `{}`\n\n",
                track_line(track),
                format_duration(track.duration)
            ));
        }
        None => description.push_str("**🔇 Nothing playing**\n\n"),
    }

    if view.upcoming.is_empty() {
        description.push_str("**📭 Queue is empty**");
    } else {
        description.push_str(&format!("**🗒️ Queue - {} track(s)**\n", view.total));
        for (index, track) in view.upcoming.iter().enumerate() {
            description.push_str(&format!(
                "{}. {} `{}`\n",
                index + 1,
                track_line(track),
                format_duration(track.duration)
            ));
        }
        let hidden = view.total.saturating_sub(view.upcoming.len());
        if hidden > 0 {
            description.push_str(&format!("...and {} more", hidden));
        }
    }

    CreateReply::default().embed(
        CreateEmbed::new()
            .title("🎵 Music Queue")
            .description(description)
            .color(0x00ff00),
    )
}

pub fn playback_error(error: &PlaybackError) -> CreateReply {
    CreateReply::default()
        .embed(
            CreateEmbed::new()
                .title("❌ Error")
                .description(error.to_string())
                .color(0xff0000),
        )
        .ephemeral(true)
}
