/// Session token service (`auth.getSession`) and local persistence
use crate::lastfm::error::{LastfmError, Result};
use crate::lastfm::request::{extract_tag, extract_tag_sized, perform, sign, Arguments, Verb};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

pub const SESSION_TOKEN_LEN: usize = 32;

/// File holding the session token, one per installation
const SESSION_FILE: &str = "lastfm.session";

pub struct SessionService {
    agent: ureq::Agent,
    args: Arguments,
    secret: String,
    session_file: PathBuf,
    session_token: String,
    username: String,
}

impl SessionService {
    pub fn new(agent: ureq::Agent, api_key: &str, secret: &str, data_dir: &Path) -> Self {
        let mut args = Arguments::new();
        args.set("api_key", api_key);
        Self {
            agent,
            args,
            secret: secret.to_string(),
            session_file: data_dir.join(SESSION_FILE),
            session_token: String::new(),
            username: String::new(),
        }
    }

    pub fn session_token(&self) -> &str {
        &self.session_token
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Bind the request token into the argument set
    ///
    /// Adding a parameter invalidates any previously computed signature,
    /// so it is re-derived here.
    pub fn add_request_token(&mut self, token: &str) {
        self.args.set("token", token);
        let sig = sign("auth.getSession", &self.args, &self.secret);
        self.args.set("api_sig", sig);
    }

    /// Exchange the bound request token for a session token
    ///
    /// On success the token is persisted; a token that could not be
    /// stored is reported as a failure so the caller never treats it as
    /// durably authenticated.
    pub fn fetch(&mut self) -> Result<()> {
        let sig = sign("auth.getSession", &self.args, &self.secret);
        self.args.set("api_sig", sig);

        let body = perform(&self.agent, Verb::Post, "auth.getSession", &self.args)?;

        let key = extract_tag_sized("key", &body, SESSION_TOKEN_LEN).unwrap_or("");
        if key.is_empty() {
            return Err(LastfmError::Protocol("Invalid response".to_string()));
        }
        self.session_token = key.to_string();

        // If the request was valid up to this point, assume the response
        // also carries the username
        self.username = extract_tag("name", &body).unwrap_or_default().to_string();

        if let Err(e) = self.store_session_token() {
            warn!("Could not persist session token: {}", e);
            return Err(LastfmError::Persistence(
                "Failed to store session token".to_string(),
            ));
        }

        info!("Authenticated with Last.fm as user: {}", self.username);
        Ok(())
    }

    /// Load a previously persisted session token
    ///
    /// An absent file is the normal "not yet authenticated" condition; a
    /// held token or a token of the wrong length is a corruption-class
    /// failure that must not be retried.
    pub fn fetch_local(&mut self) -> Result<()> {
        if !self.session_token.is_empty() {
            return Err(LastfmError::Invariant(
                "Attempting to fetch local token when a token is already held".to_string(),
            ));
        }

        let contents = match fs::read_to_string(&self.session_file) {
            Ok(contents) => contents,
            Err(_) => {
                return Err(LastfmError::Persistence(
                    "Couldn't fetch local token".to_string(),
                ))
            }
        };

        let token = contents.lines().next().unwrap_or("");
        if token.len() != SESSION_TOKEN_LEN {
            return Err(LastfmError::Invariant(
                "Stored session token length is invalid".to_string(),
            ));
        }

        self.session_token = token.to_string();
        debug!("Using stored session token from {}", self.session_file.display());
        Ok(())
    }

    fn store_session_token(&self) -> std::io::Result<()> {
        if let Some(parent) = self.session_file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.session_file, &self.session_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const TOKEN: &str = "0123456789abcdef0123456789abcdef";

    fn service(dir: &Path) -> SessionService {
        SessionService::new(ureq::agent(), "key", "secret", dir)
    }

    #[test]
    fn test_persistence_roundtrip() {
        let dir = tempdir().unwrap();

        let mut writer = service(dir.path());
        writer.session_token = TOKEN.to_string();
        writer.store_session_token().unwrap();

        let mut reader = service(dir.path());
        reader.fetch_local().unwrap();
        assert_eq!(reader.session_token(), TOKEN);
    }

    #[test]
    fn test_fetch_local_missing_file() {
        let dir = tempdir().unwrap();
        let err = service(dir.path()).fetch_local().unwrap_err();
        assert!(matches!(err, LastfmError::Persistence(_)));
        assert_eq!(err.to_string(), "Couldn't fetch local token");
    }

    #[test]
    fn test_fetch_local_rejects_corrupt_token() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(SESSION_FILE), "too-short").unwrap();

        let mut reader = service(dir.path());
        let err = reader.fetch_local().unwrap_err();
        assert!(matches!(err, LastfmError::Invariant(_)));
        // The corrupt value is never silently truncated or accepted
        assert!(reader.session_token().is_empty());
    }

    #[test]
    fn test_fetch_local_rejects_when_token_held() {
        let dir = tempdir().unwrap();
        let mut reader = service(dir.path());
        reader.session_token = TOKEN.to_string();
        assert!(matches!(
            reader.fetch_local().unwrap_err(),
            LastfmError::Invariant(_)
        ));
    }

    #[test]
    fn test_fetch_local_reads_first_line_only() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(SESSION_FILE), format!("{}\ngarbage", TOKEN)).unwrap();

        let mut reader = service(dir.path());
        reader.fetch_local().unwrap();
        assert_eq!(reader.session_token(), TOKEN);
    }
}
