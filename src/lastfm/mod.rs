//! Last.fm web service access
//!
//! The handshake follows the desktop application flow: fetch a request
//! token, send the user to the consent page in a browser, then exchange
//! the token for a long-lived session key which is persisted locally.

pub mod auth;
pub mod error;
pub mod notify;
pub mod request;
pub mod session;
pub mod token;

pub use auth::Authenticator;
pub use error::{LastfmError, Result};
pub use notify::{NowPlayingService, ScrobbleService};
pub use session::SessionService;
pub use token::TokenService;

pub const LASTFM_API_ROOT: &str = "https://ws.audioscrobbler.com/2.0/";
pub const LASTFM_AUTH_URL: &str = "https://www.last.fm/api/auth/";

/// Default API key compiled in from secrets.txt (see build.rs)
pub fn default_api_key() -> String {
    option_env!("LASTFM_APIKEY")
        .unwrap_or("YOUR_API_KEY_HERE")
        .to_string()
}

/// Default API secret compiled in from secrets.txt (see build.rs)
pub fn default_api_secret() -> String {
    option_env!("LASTFM_APISECRET")
        .unwrap_or("YOUR_API_SECRET_HERE")
        .to_string()
}
