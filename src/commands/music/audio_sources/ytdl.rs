//! Implements the `StreamResolver` trait using the `yt-dlp` command-line
//! tool. Handles both free-text searches (`ytsearch1:`) and direct links,
//! and enforces the configured maximum track duration.

use super::{StreamResolver, track::Track};
use crate::commands::music::utils::engine::PlaybackError;
use crate::config::PlayerConfig;
use serenity::async_trait;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

/// Resolves tracks by invoking `yt-dlp` and parsing its JSON output.
pub struct YtDlpResolver {
    max_duration: Duration,
    proxy: Option<String>,
}

impl YtDlpResolver {
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            max_duration: config.max_track_duration,
            proxy: config.proxy.clone(),
        }
    }

    /// Runs `yt-dlp -j` against the given target (a URL or a `ytsearch1:`
    /// expression) and converts the JSON output into a `Track`.
    async fn extract(&self, target: &str) -> Result<Track, PlaybackError> {
        let mut command = Command::new("yt-dlp");
        command.args(["-j", "--no-playlist", "-f", "bestaudio/best"]);
        if let Some(proxy) = &self.proxy {
            command.args(["--proxy", proxy]);
        }
        command.arg(target);

        let output = command.output().await.map_err(|e| {
            PlaybackError::ResolutionFailed(format!("failed to execute yt-dlp: {}", e))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("yt-dlp failed for '{}': {}", target, stderr.trim());
            return Err(PlaybackError::ResolutionFailed(format!(
                "yt-dlp exited with {}",
                output.status
            )));
        }

        let info: serde_json::Value = serde_json::from_slice(&output.stdout).map_err(|e| {
            PlaybackError::ResolutionFailed(format!("failed to parse yt-dlp output: {}", e))
        })?;

        track_from_info(&info, self.max_duration)
    }
}

#[async_trait]
impl StreamResolver for YtDlpResolver {
    async fn resolve_query(&self, query: &str) -> Result<Track, PlaybackError> {
        info!("Resolving search query: {}", query);
        self.extract(&format!("ytsearch1:{}", query)).await
    }

    async fn resolve_url(&self, url: &str) -> Result<Track, PlaybackError> {
        info!("Resolving URL: {}", url);
        self.extract(url).await
    }
}

/// Converts a `yt-dlp -j` JSON document into a `Track`, rejecting tracks
/// longer than `max_duration`. Search results arrive wrapped in an
/// `entries` array; direct links arrive as a bare object.
fn track_from_info(
    info: &serde_json::Value,
    max_duration: Duration,
) -> Result<Track, PlaybackError> {
    let info = match info.get("entries").and_then(|e| e.as_array()) {
        Some(entries) => entries
            .first()
            .ok_or_else(|| PlaybackError::ResolutionFailed("no search results".to_string()))?,
        None => info,
    };

    // A malformed document can carry a negative or non-finite duration,
    // which `from_secs_f64` refuses.
    let seconds = info["duration"].as_f64().unwrap_or(0.0);
    let duration = if seconds.is_finite() && seconds > 0.0 {
        Duration::from_secs_f64(seconds)
    } else {
        Duration::ZERO
    };
    if duration > max_duration {
        return Err(PlaybackError::TrackTooLong {
            duration: duration.as_secs(),
            max: max_duration.as_secs(),
        });
    }

    let stream_url = info["url"]
        .as_str()
        .ok_or_else(|| PlaybackError::ResolutionFailed("missing stream URL".to_string()))?
        .to_string();

    let page_url = info["webpage_url"]
        .as_str()
        .ok_or_else(|| PlaybackError::ResolutionFailed("missing page URL".to_string()))?
        .to_string();

    let title = info["title"].as_str().unwrap_or("Unknown Track").to_string();

    Ok(Track {
        stream_url,
        title,
        page_url,
        duration,
    })
}
