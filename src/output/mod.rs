//! Output files
//!
//! Two text outputs (current state + history) and the artwork mirror.

pub mod artwork;
pub mod text;

pub use artwork::{file_uri_to_path, ArtworkAction, ArtworkSync, PathFlavor};
pub use text::{history_line, TextOutputs};

use std::fs;
use std::io;
use std::path::Path;

/// Create the parent directory of an output file if it is missing
fn ensure_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
