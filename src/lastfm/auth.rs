/// Authentication orchestrator for the Last.fm desktop handshake
///
/// Drives the flow: reuse a held or locally stored session token, or
/// fetch a request token, send the user to the consent page in an
/// external browser, and exchange the token for a session once consent
/// has been granted out-of-band.
use crate::lastfm::error::{LastfmError, Result};
use crate::lastfm::session::SessionService;
use crate::lastfm::token::TokenService;
use crate::lastfm::LASTFM_AUTH_URL;
use log::{debug, info};
use std::path::Path;

pub struct Authenticator {
    api_key: String,
    token: TokenService,
    session: SessionService,
    authenticated: bool,
}

impl Authenticator {
    pub fn new(agent: &ureq::Agent, api_key: &str, secret: &str, data_dir: &Path) -> Self {
        Self {
            api_key: api_key.to_string(),
            token: TokenService::new(agent.clone(), api_key, secret),
            session: SessionService::new(agent.clone(), api_key, secret, data_dir),
            authenticated: false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn session_token(&self) -> &str {
        self.session.session_token()
    }

    pub fn username(&self) -> &str {
        self.session.username()
    }

    /// Run the setup phase of the handshake
    ///
    /// Returns Ok once either a session token is available (held, stored
    /// locally, or obtained live) or the consent page has been opened in
    /// the browser. In the latter case the caller is expected to finish
    /// the exchange with `fetch_session_token` after the user granted
    /// consent. A held token is trusted without server-side verification
    /// until a call using it fails.
    pub fn setup_fetch(&mut self) -> Result<()> {
        if !self.session.session_token().is_empty() {
            self.authenticated = true;
            return Ok(());
        }

        match self.session.fetch_local() {
            Ok(()) => {
                self.authenticated = true;
                return Ok(());
            }
            // Corrupted local state aborts the attempt instead of being
            // papered over by a fresh handshake
            Err(e @ LastfmError::Invariant(_)) => return Err(e),
            Err(e) => debug!("No usable local session token: {}", e),
        }

        // A request token bound during an earlier attempt may have been
        // granted consent in the meantime
        if self.session.fetch().is_ok() {
            self.authenticated = true;
            return Ok(());
        }

        if self.token.request_token().is_empty() {
            self.token.fetch()?;
        }

        self.session.add_request_token(self.token.request_token());

        self.open_consent_page()?;
        Ok(())
    }

    /// Exchange the request token for a session token
    pub fn fetch_session_token(&mut self) -> Result<String> {
        self.session.fetch()?;
        self.authenticated = true;
        Ok(self.session.session_token().to_string())
    }

    fn open_consent_page(&self) -> Result<()> {
        let url = format!(
            "{}?api_key={}&token={}",
            LASTFM_AUTH_URL,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(self.token.request_token())
        );

        info!("Opening Last.fm consent page in browser");
        webbrowser::open(&url)
            .map_err(|e| LastfmError::Transport(format!("Couldn't open browser: {}", e)))
    }
}
