pub mod playback_state;
pub mod snapshot;
pub mod song;

pub use playback_state::PlaybackState;
pub use snapshot::PlaybackSnapshot;
pub use song::Song;
