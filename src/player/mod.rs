//! VLC web interface access
//!
//! Fetches `requests/status.xml` and turns it into a [`PlayerStatus`]:
//! the playback state plus the `info` entries of the `meta` category.

mod client;
mod model;
mod status;

pub use client::{HttpStatusSource, StatusSource, AUTH_FAILURE_MARKER};
pub use model::{PlayerState, PlayerStatus};
pub use status::parse_status;
