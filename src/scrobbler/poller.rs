/// Tick-driven scrobble poller
///
/// Invoked once per host tick: first retries the authentication
/// handshake on a 10-second window, then inspects the playback snapshot
/// and fires now-playing and scrobble notifications as the Last.fm
/// eligibility thresholds are crossed.
use crate::config::Config;
use crate::data::{PlaybackSnapshot, PlaybackState, Song};
use crate::lastfm::{Authenticator, NowPlayingService, ScrobbleService};
use crate::players::PlaybackSource;
use crate::scrobbler::context::Context;
use log::{debug, info, warn};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Tracks of 30 seconds or less are never scrobbled (service policy)
const SCROBBLE_MIN_DURATION_SECS: u64 = 30;

/// A track is scrobbled after half its duration or 4 minutes, whichever
/// comes earlier
const SCROBBLE_TIME_CAP_SECS: u64 = 240;

/// Minimum time between authentication attempts
const AUTH_RETRY_WINDOW: Duration = Duration::from_secs(10);

/// Notification decided by the eligibility state machine for one tick
#[derive(Debug, Clone, PartialEq)]
enum PlaybackAction {
    AnnounceNowPlaying,
    SubmitScrobble { started: SystemTime },
}

/// Per-listen eligibility state
///
/// Owned exclusively by the poller; reset on song change and whenever a
/// repeat is detected.
#[derive(Default)]
struct ScrobbleState {
    prev_song: Option<Song>,
    started: Option<SystemTime>,
    scrobbled: bool,
}

impl ScrobbleState {
    /// Advance the state machine by one tick and return the
    /// notifications to fire
    fn advance(&mut self, snapshot: &PlaybackSnapshot, now: SystemTime) -> Vec<PlaybackAction> {
        let mut actions = Vec::new();

        let song = match &snapshot.song {
            Some(song) => song,
            None => return actions,
        };
        if snapshot.state != PlaybackState::Playing {
            return actions;
        }

        if self.prev_song.as_ref() != Some(song) {
            self.prev_song = Some(song.clone());
            self.started = Some(now);
            self.scrobbled = false;
            actions.push(PlaybackAction::AnnounceNowPlaying);
        }

        // Docs: the track must be longer than 30 seconds
        let duration = song.duration_secs();
        if duration <= SCROBBLE_MIN_DURATION_SECS {
            return actions;
        }

        let started = match self.started {
            Some(started) => started,
            None => return actions,
        };
        let elapsed = now.duration_since(started).unwrap_or_default().as_secs();

        // Docs: and the track has been played for at least half its
        // duration, or for 4 minutes (whichever occurs earlier)
        let threshold = std::cmp::min(duration / 2, SCROBBLE_TIME_CAP_SECS);
        if !self.scrobbled && elapsed >= threshold {
            actions.push(PlaybackAction::SubmitScrobble { started });
            self.scrobbled = true;
        }

        // If the song was repeated, allow scrobbling again. This permits
        // multiple scrobbles on the same listen when the track was paused
        // for a long stretch, a documented limitation.
        if elapsed > duration {
            self.scrobbled = false;
            self.prev_song = None;
        }

        actions
    }
}

fn retry_due(last_attempt: Option<SystemTime>, now: SystemTime) -> bool {
    match last_attempt {
        None => true,
        Some(at) => now
            .duration_since(at)
            .map(|elapsed| elapsed >= AUTH_RETRY_WINDOW)
            .unwrap_or(false),
    }
}

pub struct ScrobblePoller {
    auth: Authenticator,
    now_playing: NowPlayingService,
    scrobbler: ScrobbleService,
    context: Context,
    state: ScrobbleState,
    setup_done: bool,
    last_attempt: Option<SystemTime>,
}

impl ScrobblePoller {
    pub fn new(config: &Config, context: Context) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.lastfm.request_timeout_secs))
            .build();

        let api_key = config.lastfm.resolved_api_key();
        let secret = config.lastfm.resolved_api_secret();

        Self {
            auth: Authenticator::new(&agent, &api_key, &secret, &config.lastfm.data_dir),
            now_playing: NowPlayingService::new(agent.clone(), &api_key, &secret),
            scrobbler: ScrobbleService::new(agent, &api_key, &secret),
            context,
            state: ScrobbleState::default(),
            setup_done: false,
            last_attempt: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    pub fn username(&self) -> &str {
        self.auth.username()
    }

    /// Attempt the next unfinished handshake step
    ///
    /// Attempts inside the retry window are no-ops that only refresh the
    /// retry timestamp. Any failure is reported through the status sink
    /// and resets the handshake to the setup phase; there is no
    /// partial-state resume.
    pub fn authenticate(&mut self) {
        let now = self.context.clock.now();

        if !self.auth.is_authenticated() && retry_due(self.last_attempt, now) {
            let step = if !self.setup_done {
                self.auth.setup_fetch()
            } else {
                self.auth.fetch_session_token().map(|_| ())
            };

            match step {
                Ok(()) => {
                    self.setup_done = true;
                    if self.auth.is_authenticated() {
                        let token = self.auth.session_token().to_string();
                        self.now_playing.set_session_token(&token);
                        self.scrobbler.set_session_token(&token);
                    }
                }
                Err(err) => {
                    self.context.status.report(&format!("Auth failed: {}", err));
                    self.setup_done = false;
                }
            }
        }

        self.last_attempt = Some(now);
    }

    /// Evaluate one playback tick
    ///
    /// Does nothing while no session token is held.
    pub fn run(&mut self, source: &mut dyn PlaybackSource) {
        if self.auth.session_token().is_empty() {
            return;
        }

        let snapshot = source.snapshot();
        let now = self.context.clock.now();
        let actions = self.state.advance(&snapshot, now);

        let song = match &snapshot.song {
            Some(song) => song,
            None => return,
        };

        for action in actions {
            match action {
                PlaybackAction::AnnounceNowPlaying => {
                    // Fire-and-forget: a failed update is not retried
                    if let Err(err) = self.now_playing.notify(song) {
                        debug!("Now playing update failed: {}", err);
                    }
                }
                PlaybackAction::SubmitScrobble { started } => {
                    let timestamp = started
                        .duration_since(UNIX_EPOCH)
                        .unwrap_or_default()
                        .as_secs();
                    match self.scrobbler.notify(song, timestamp) {
                        Ok(_) => info!("Scrobbled: {}", song),
                        // Known limitation: the submission is lost, there
                        // is no retry queue
                        Err(err) => warn!("Scrobble failed: {}", err),
                    }
                }
            }
        }
    }

    /// One full host tick: authentication retry, then playback handling
    pub fn tick(&mut self, source: &mut dyn PlaybackSource) {
        self.authenticate();
        self.run(source);
    }
}
