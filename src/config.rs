/// Configuration for the scrobbler
///
/// Read from a JSON file; every field has a sensible default so a
/// missing file or a partial configuration still works.
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mpd: MpdConfig,
    pub lastfm: LastfmConfig,

    /// Seconds between playback polls
    pub poll_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mpd: MpdConfig::default(),
            lastfm: LastfmConfig::default(),
            poll_interval_secs: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MpdConfig {
    pub host: String,
    pub port: u16,
}

impl Default for MpdConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6600,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LastfmConfig {
    pub enabled: bool,

    /// API key; empty means use the compiled-in default
    pub api_key: String,

    /// API secret; empty means use the compiled-in default
    pub api_secret: String,

    /// Directory holding the persisted session token
    pub data_dir: PathBuf,

    /// Per-request timeout for calls to the Last.fm API
    pub request_timeout_secs: u64,
}

impl Default for LastfmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: String::new(),
            api_secret: String::new(),
            data_dir: default_data_dir(),
            request_timeout_secs: 10,
        }
    }
}

impl LastfmConfig {
    pub fn resolved_api_key(&self) -> String {
        if self.api_key.is_empty() {
            crate::lastfm::default_api_key()
        } else {
            self.api_key.clone()
        }
    }

    pub fn resolved_api_secret(&self) -> String {
        if self.api_secret.is_empty() {
            crate::lastfm::default_api_secret()
        } else {
            self.api_secret.clone()
        }
    }
}

fn default_data_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".local/share/mpdscrobble")
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {}", path.display(), e))?;
        serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file {}: {}", path.display(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.mpd.host, "localhost");
        assert_eq!(config.mpd.port, 6600);
        assert!(config.lastfm.enabled);
        assert_eq!(config.lastfm.request_timeout_secs, 10);
        assert_eq!(config.poll_interval_secs, 1);
    }

    #[test]
    fn test_partial_config_parses() {
        let config: Config =
            serde_json::from_str(r#"{ "mpd": { "host": "music.local" } }"#).unwrap();
        assert_eq!(config.mpd.host, "music.local");
        assert_eq!(config.mpd.port, 6600);
        assert!(config.lastfm.enabled);
    }

    #[test]
    fn test_explicit_credentials_win_over_defaults() {
        let mut config = LastfmConfig::default();
        config.api_key = "explicit".to_string();
        assert_eq!(config.resolved_api_key(), "explicit");
        // Empty secret still falls back
        assert_eq!(config.resolved_api_secret(), crate::lastfm::default_api_secret());
    }
}
