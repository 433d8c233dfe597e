/// Metadata for the song a player reports as current
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Song {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>, // in seconds
}

impl Song {
    /// Song duration rounded to whole seconds, as Last.fm expects it
    pub fn duration_secs(&self) -> u64 {
        self.duration.map(|d| d.round() as u64).unwrap_or(0)
    }
}

impl PartialEq for Song {
    fn eq(&self, other: &Self) -> bool {
        // Compare only title, artist and album: this is the identity used
        // to detect song changes between polls
        self.title == other.title && self.artist == other.artist && self.album == other.album
    }
}

impl fmt::Display for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut display_str = self.title.as_deref().unwrap_or("Unknown Title").to_string();
        if let Some(artist_name) = &self.artist {
            if !artist_name.is_empty() {
                display_str.push_str(" by ");
                display_str.push_str(artist_name);
            }
        }
        write!(f, "{}", display_str)
    }
}
