//! Defines the `Track` struct, the unified representation of a resolved,
//! playable audio reference.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A resolved track: a direct audio stream URL plus display metadata.
///
/// `stream_url` is the short-lived media URL handed to the audio driver,
/// while `page_url` is the stable watch-page URL used to re-resolve the
/// stream when the original link has gone stale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Track {
    /// Direct URL to the audio stream. Expires after a while.
    pub stream_url: String,
    /// The title of the track.
    pub title: String,
    /// Stable URL of the track's page, suitable for re-resolution.
    pub page_url: String,
    /// The duration of the track.
    #[serde(with = "humantime_serde")]
    pub duration: Duration,
}
