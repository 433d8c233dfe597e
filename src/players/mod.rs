/// Playback sources the poller can observe
pub mod mpd;

pub use self::mpd::MpdSource;

use crate::data::PlaybackSnapshot;

/// Read-only access to the player, polled once per tick
pub trait PlaybackSource {
    /// Current song and transport state
    ///
    /// Implementations report an empty snapshot when the player is
    /// unreachable; the poller treats that the same as nothing playing.
    fn snapshot(&mut self) -> PlaybackSnapshot;
}
