use crate::data::{PlaybackState, Song};

/// Read-only view of the player, taken once per poll tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackSnapshot {
    /// Song the player reports as current, if any
    pub song: Option<Song>,

    /// Transport state at the time of the poll
    pub state: PlaybackState,
}
