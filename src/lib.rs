//! VLC Now Playing - publish VLC's current track for stream overlays
//!
//! This library polls the VLC web interface, works out a display string for
//! the current track and keeps a current-state file, a history log and a
//! cover-art file up to date.

pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod player;
pub mod poller;

pub use config::PollerConfig;
pub use error::{ArtworkError, PollError};
pub use poller::{CycleOutcome, DisplayState, Poller};
