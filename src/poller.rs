//! Poll loop
//!
//! One cycle fetches the status document, decides whether to refresh, syncs
//! artwork when its reference changed and rewrites the text outputs when the
//! display string changed. Cycles repeat at a fixed interval until shutdown.

use crate::config::PollerConfig;
use crate::error::PollError;
use crate::extract::TrackMetadata;
use crate::output::{ArtworkSync, TextOutputs};
use crate::player::{parse_status, PlayerState, StatusSource};
use std::io::{self, Write};
use std::sync::mpsc::{Receiver, RecvTimeoutError};

/// What has been published so far; carried from one cycle to the next
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayState {
    /// Last display string written to the current-state file
    pub current_song_info: String,

    /// Artwork reference the artwork file was last synced to
    pub current_artwork_url: String,
}

impl DisplayState {
    /// Whether a display string has been published yet
    pub fn is_tracking(&self) -> bool {
        !self.current_song_info.is_empty()
    }
}

/// Result of a successful cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Player is not playing and something is already on display
    Held(PlayerState),
    /// Display string is the one already published
    Unchanged,
    /// New display string published
    Updated(String),
}

/// Polls a status source and publishes what it finds
pub struct Poller<S: StatusSource> {
    config: PollerConfig,
    source: S,
    outputs: TextOutputs,
    artwork: ArtworkSync,
}

impl<S: StatusSource> Poller<S> {
    /// Create a poller writing to the outputs named in `config`
    pub fn new(config: PollerConfig, source: S) -> Self {
        let outputs = TextOutputs::new(
            config.current_path.clone(),
            config.history_path.clone(),
            config.separator.clone(),
        );
        let artwork = ArtworkSync::new(config.artwork_path.clone());

        Self {
            config,
            source,
            outputs,
            artwork,
        }
    }

    /// Replace the artwork syncer (e.g. to force a path flavor)
    pub fn with_artwork_sync(mut self, artwork: ArtworkSync) -> Self {
        self.artwork = artwork;
        self
    }

    /// Run one cycle against `state`
    ///
    /// The display string is only committed to `state` once the current-state
    /// file holds it; an error leaves it uncommitted so the next cycle retries.
    /// Artwork and history failures are logged and do not fail the cycle.
    pub fn poll(&self, state: &mut DisplayState) -> Result<CycleOutcome, PollError> {
        let body = self.source.fetch()?;
        let status = parse_status(&body)?;

        if !status.state.is_playing() && state.is_tracking() {
            log::debug!("Player is {:?}, keeping {:?}", status.state, state.current_song_info);
            return Ok(CycleOutcome::Held(status.state));
        }

        let metadata = TrackMetadata::from_status(&status);

        if metadata.artwork_url != state.current_artwork_url {
            self.sync_artwork(&metadata.artwork_url);
            state.current_artwork_url = metadata.artwork_url.clone();
        }

        let display = metadata.display_string();
        if display == state.current_song_info {
            return Ok(CycleOutcome::Unchanged);
        }

        self.outputs
            .write_current(&display)
            .map_err(|e| PollError::Output(format!("{:#}", e)))?;
        state.current_song_info = display.clone();
        announce(&display);

        if let Err(e) = self
            .outputs
            .append_history(chrono::Local::now().time(), &display)
        {
            log::warn!("Failed to append now playing history: {:#}", e);
        }

        Ok(CycleOutcome::Updated(display))
    }

    /// Poll until `shutdown` receives a message or its sender goes away
    ///
    /// Returns the final display state.
    pub fn run(&self, shutdown: &Receiver<()>) -> DisplayState {
        let mut state = DisplayState::default();

        log::info!(
            "Polling {} every {:?}",
            self.config.endpoint,
            self.config.poll_interval
        );

        loop {
            match self.poll(&mut state) {
                Ok(CycleOutcome::Updated(display)) => log::info!("Now playing: {}", display),
                Ok(outcome) => log::debug!("Cycle: {:?}", outcome),
                Err(e) => log::warn!("{}", hint(&e)),
            }

            match shutdown.recv_timeout(self.config.poll_interval) {
                Err(RecvTimeoutError::Timeout) => continue,
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        log::info!("Stopped polling");
        state
    }

    fn sync_artwork(&self, artwork_url: &str) {
        match self.artwork.sync(artwork_url) {
            Ok(action) => log::debug!("Artwork sync: {:?}", action),
            Err(e) => log::warn!("Artwork not updated: {}", e),
        }
    }
}

/// Print the new display string on stdout
fn announce(display: &str) {
    let mut stdout = io::stdout().lock();
    if let Err(e) = writeln!(stdout, "{}", display) {
        log::warn!("Could not print now playing text: {}", e);
    }
}

/// Log message for a failed cycle, with a pointer at the usual cause
fn hint(err: &PollError) -> String {
    match err {
        PollError::Connection { .. } => format!(
            "{} (is VLC running with the web interface enabled?)",
            err
        ),
        PollError::Auth => format!("{} (does the configured password match VLC's?)", err),
        PollError::Status(_) | PollError::Parse(_) | PollError::Output(_) => err.to_string(),
    }
}
