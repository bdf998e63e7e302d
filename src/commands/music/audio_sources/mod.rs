//! This module defines the structure and traits for resolving user input
//! (search terms or links) into playable tracks. The production
//! implementation shells out to `yt-dlp`; the trait keeps the playback
//! engine independent of any particular resolver.

/// Submodule defining the `Track` struct used across the player.
pub mod track;
/// Submodule implementing the `StreamResolver` trait via `yt-dlp`.
pub mod ytdl;

use crate::commands::music::utils::engine::PlaybackError;
use serenity::async_trait;
use track::Track;
use url::Url;

/// Trait defining the common interface for stream resolvers.
/// Requires `Send + Sync` to be safely used across async tasks.
#[async_trait]
pub trait StreamResolver: Send + Sync + 'static {
    /// Resolves a free-text search query to the best matching track.
    async fn resolve_query(&self, query: &str) -> Result<Track, PlaybackError>;

    /// Resolves a direct link to a track. Also used to refresh a stale
    /// stream URL from a track's stable page URL.
    async fn resolve_url(&self, url: &str) -> Result<Track, PlaybackError>;
}

/// A utility struct providing general helper functions for audio sources.
pub struct AudioSource;

impl AudioSource {
    /// Checks whether the input should be treated as a link rather than a
    /// search term. Only http(s) URLs count; anything else is a query.
    pub fn is_url(input: &str) -> bool {
        Url::parse(input)
            .map(|url| matches!(url.scheme(), "http" | "https"))
            .unwrap_or(false)
    }
}
