/// MPD playback source
use crate::data::{PlaybackSnapshot, PlaybackState, Song};
use crate::players::PlaybackSource;
use log::{debug, info, warn};
use mpd::Client;
use std::net::TcpStream;

pub struct MpdSource {
    hostname: String,
    port: u16,
    client: Option<Client<TcpStream>>,
}

impl MpdSource {
    pub fn new(hostname: &str, port: u16) -> Self {
        Self {
            hostname: hostname.to_string(),
            port,
            client: None,
        }
    }

    fn connect(&mut self) -> bool {
        if self.client.is_some() {
            return true;
        }

        let addr = format!("{}:{}", self.hostname, self.port);
        match Client::connect(&addr) {
            Ok(client) => {
                info!("Connected to MPD at {}", addr);
                self.client = Some(client);
                true
            }
            Err(e) => {
                debug!("MPD connection to {} failed: {}", addr, e);
                false
            }
        }
    }

    fn read_snapshot(client: &mut Client<TcpStream>) -> Result<PlaybackSnapshot, mpd::error::Error> {
        let status = client.status()?;
        let state = match status.state {
            mpd::State::Play => PlaybackState::Playing,
            mpd::State::Pause => PlaybackState::Paused,
            mpd::State::Stop => PlaybackState::Stopped,
        };

        let song = client.currentsong()?.map(convert_mpd_song);
        Ok(PlaybackSnapshot { song, state })
    }
}

/// Convert an MPD song to our Song format
fn convert_mpd_song(mpd_song: mpd::Song) -> Song {
    // Album only arrives as a generic tag
    let album = mpd_song
        .tags
        .iter()
        .find(|(tag, _)| tag == "Album")
        .map(|(_, value)| value.clone());

    Song {
        title: mpd_song.title,
        artist: mpd_song.artist,
        album,
        duration: mpd_song.duration.map(|d| d.as_secs_f32() as f64),
    }
}

impl PlaybackSource for MpdSource {
    fn snapshot(&mut self) -> PlaybackSnapshot {
        if !self.connect() {
            return PlaybackSnapshot::default();
        }

        let result = match self.client.as_mut() {
            Some(client) => Self::read_snapshot(client),
            None => return PlaybackSnapshot::default(),
        };

        match result {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Lost connection to MPD: {}", e);
                // Drop the client so the next tick reconnects
                self.client = None;
                PlaybackSnapshot::default()
            }
        }
    }
}
