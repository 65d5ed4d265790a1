//! Error kinds for a poll cycle and for artwork sync

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure that ends the current poll cycle without publishing anything
///
/// None of these are fatal: the loop logs them and tries again on the next tick.
#[derive(Debug, Error)]
pub enum PollError {
    /// Endpoint unreachable, usually because VLC is not running or the
    /// web interface is disabled
    #[error("cannot reach VLC web interface at {url}: {reason}")]
    Connection { url: String, reason: String },

    /// Password rejected by the web interface
    #[error("VLC web interface rejected the password")]
    Auth,

    /// Any other non-2xx answer
    #[error("VLC web interface answered with HTTP {0}")]
    Status(u16),

    /// Response body is not a usable status document
    #[error("malformed status document: {0}")]
    Parse(String),

    /// Current-state file could not be written
    #[error("failed to write now playing text: {0}")]
    Output(String),
}

/// Failure of the artwork step; the text update still goes ahead
#[derive(Debug, Error)]
pub enum ArtworkError {
    #[error("invalid artwork uri {uri:?}: {reason}")]
    InvalidUri { uri: String, reason: String },

    #[error("invalid artwork uri {uri:?}: resulting path {path:?} is not absolute")]
    NotAbsolute { uri: String, path: String },

    #[error("failed to copy artwork {from:?} to {to:?}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to remove artwork {path:?}: {source}")]
    Delete {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
