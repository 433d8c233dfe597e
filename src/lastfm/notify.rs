/// Playback notification services: now-playing updates and scrobbles
///
/// Both populate the same argument set from the playback snapshot and
/// submit a signed POST. Response bodies are echoed back as the success
/// message without structured validation.
use crate::data::Song;
use crate::lastfm::error::Result;
use crate::lastfm::request::{perform, sign, Arguments, Verb};
use log::debug;

fn populate(args: &mut Arguments, song: &Song, session_token: &str) {
    args.set("artist", song.artist.as_deref().unwrap_or(""));
    args.set("album", song.album.as_deref().unwrap_or(""));
    args.set("track", song.title.as_deref().unwrap_or(""));
    args.set("duration", song.duration_secs().to_string());
    args.set("sk", session_token);
}

/// Best-effort `track.updateNowPlaying` notification
pub struct NowPlayingService {
    agent: ureq::Agent,
    args: Arguments,
    secret: String,
    session_token: String,
}

impl NowPlayingService {
    pub fn new(agent: ureq::Agent, api_key: &str, secret: &str) -> Self {
        let mut args = Arguments::new();
        args.set("api_key", api_key);
        Self {
            agent,
            args,
            secret: secret.to_string(),
            session_token: String::new(),
        }
    }

    pub fn set_session_token(&mut self, token: &str) {
        self.session_token = token.to_string();
    }

    pub fn notify(&mut self, song: &Song) -> Result<String> {
        populate(&mut self.args, song, &self.session_token);
        let sig = sign("track.updateNowPlaying", &self.args, &self.secret);
        self.args.set("api_sig", sig);

        debug!("Updating now playing: {}", song);
        perform(&self.agent, Verb::Post, "track.updateNowPlaying", &self.args)
    }
}

/// `track.scrobble` submission carrying the listen start timestamp
pub struct ScrobbleService {
    agent: ureq::Agent,
    args: Arguments,
    secret: String,
    session_token: String,
}

impl ScrobbleService {
    pub fn new(agent: ureq::Agent, api_key: &str, secret: &str) -> Self {
        let mut args = Arguments::new();
        args.set("api_key", api_key);
        Self {
            agent,
            args,
            secret: secret.to_string(),
            session_token: String::new(),
        }
    }

    pub fn set_session_token(&mut self, token: &str) {
        self.session_token = token.to_string();
    }

    /// Submit a scrobble; `timestamp` is the Unix time the listen started
    pub fn notify(&mut self, song: &Song, timestamp: u64) -> Result<String> {
        populate(&mut self.args, song, &self.session_token);
        self.args.set("timestamp", timestamp.to_string());
        let sig = sign("track.scrobble", &self.args, &self.secret);
        self.args.set("api_sig", sig);

        debug!("Scrobbling: {} (started at {})", song, timestamp);
        perform(&self.agent, Verb::Post, "track.scrobble", &self.args)
    }
}
