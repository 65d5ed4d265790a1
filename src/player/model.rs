//! Data parsed out of one status document

use std::collections::HashMap;

/// Playback state reported in the top-level `<state>` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerState {
    Playing,
    Paused,
    Stopped,
    Other(String),
}

impl PlayerState {
    pub fn from_text(text: &str) -> Self {
        match text {
            "playing" => PlayerState::Playing,
            "paused" => PlayerState::Paused,
            "stopped" => PlayerState::Stopped,
            other => PlayerState::Other(other.to_string()),
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, PlayerState::Playing)
    }
}

/// One poll's worth of player status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerStatus {
    pub state: PlayerState,

    /// `info` entries of the `meta` category, keyed by their `name` attribute
    pub metadata: HashMap<String, String>,
}

impl PlayerStatus {
    pub fn new(state: PlayerState) -> Self {
        Self {
            state,
            metadata: HashMap::new(),
        }
    }

    /// Look up a metadata entry by name
    pub fn meta(&self, name: &str) -> Option<&str> {
        self.metadata.get(name).map(String::as_str)
    }
}
