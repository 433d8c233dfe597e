/// Song and playback state types shared across the crate
pub mod data;

/// Player access (MPD playback source)
pub mod players;

/// Last.fm API services: signing, authentication, notifications
pub mod lastfm;

/// Tick-driven scrobble poller
pub mod scrobbler;

/// Configuration loading
pub mod config;

// Re-export the most commonly used types
pub use config::Config;
pub use data::{PlaybackSnapshot, PlaybackState, Song};
pub use players::{MpdSource, PlaybackSource};
pub use scrobbler::{Context, ScrobblePoller};
