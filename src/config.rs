//! Poller configuration

use std::path::PathBuf;
use std::time::Duration;

/// VLC's status document on the default web interface port
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/requests/status.xml";

/// Text appended after the display string in the current-state file
pub const DEFAULT_SEPARATOR: &str = "   |   ";

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_CURRENT_PATH: &str = "Text/NowPlaying.txt";
pub const DEFAULT_HISTORY_PATH: &str = "Text/NowPlaying_History.txt";
pub const DEFAULT_ARTWORK_PATH: &str = "Images/albumArt.jpg";

/// Everything the poll loop needs to know at startup
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Status endpoint of the VLC web interface
    pub endpoint: String,

    /// Web interface password (the user name is always empty)
    pub password: String,

    /// Delay between two polls
    pub poll_interval: Duration,

    /// Written after the display string in the current-state file
    pub separator: String,

    /// Current-state file, overwritten on every change
    pub current_path: PathBuf,

    /// History file, one line appended per change
    pub history_path: PathBuf,

    /// Mirror of the current cover art
    pub artwork_path: PathBuf,
}

impl PollerConfig {
    /// Create a configuration with the stock defaults and the given password
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            password: password.into(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            separator: DEFAULT_SEPARATOR.to_string(),
            current_path: PathBuf::from(DEFAULT_CURRENT_PATH),
            history_path: PathBuf::from(DEFAULT_HISTORY_PATH),
            artwork_path: PathBuf::from(DEFAULT_ARTWORK_PATH),
        }
    }

    /// Set the status endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the delay between polls
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the separator written after the display string
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Set the three output paths
    pub fn with_outputs(mut self, current: PathBuf, history: PathBuf, artwork: PathBuf) -> Self {
        self.current_path = current;
        self.history_path = history;
        self.artwork_path = artwork;
        self
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self::new("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PollerConfig::new("secret");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.password, "secret");
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.separator, "   |   ");
        assert_eq!(config.current_path, PathBuf::from("Text/NowPlaying.txt"));
        assert_eq!(config.history_path, PathBuf::from("Text/NowPlaying_History.txt"));
        assert_eq!(config.artwork_path, PathBuf::from("Images/albumArt.jpg"));
    }

    #[test]
    fn test_builders() {
        let config = PollerConfig::default()
            .with_endpoint("http://127.0.0.1:9090/requests/status.xml")
            .with_poll_interval(Duration::from_millis(250))
            .with_separator(" // ")
            .with_outputs(
                PathBuf::from("a.txt"),
                PathBuf::from("b.txt"),
                PathBuf::from("c.jpg"),
            );

        assert!(config.password.is_empty());
        assert_eq!(config.endpoint, "http://127.0.0.1:9090/requests/status.xml");
        assert_eq!(config.poll_interval, Duration::from_millis(250));
        assert_eq!(config.separator, " // ");
        assert_eq!(config.artwork_path, PathBuf::from("c.jpg"));
    }
}
