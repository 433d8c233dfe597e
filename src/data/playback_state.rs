/// Playback state enumeration defining possible transport states
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// Player is actively playing media
    Playing,
    /// Playback is paused
    Paused,
    /// Playback is stopped
    Stopped,
    /// Player state cannot be determined
    Unknown,
}

impl Default for PlaybackState {
    fn default() -> Self {
        PlaybackState::Unknown
    }
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackState::Playing => write!(f, "playing"),
            PlaybackState::Paused => write!(f, "paused"),
            PlaybackState::Stopped => write!(f, "stopped"),
            PlaybackState::Unknown => write!(f, "unknown"),
        }
    }
}
