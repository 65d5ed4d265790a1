//! Cover art mirroring
//!
//! VLC reports cover art as a `file://` URI into its art cache. The image
//! behind the current URI is copied to a fixed path so overlays can point at
//! a single file; when the track has no art the file is removed.

use super::ensure_parent;
use crate::error::ArtworkError;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Which path syntax a file URI resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathFlavor {
    Posix,
    Windows,
}

impl PathFlavor {
    /// Path syntax of the platform we are running on
    pub fn native() -> Self {
        if cfg!(windows) {
            PathFlavor::Windows
        } else {
            PathFlavor::Posix
        }
    }

    fn is_absolute(self, path: &str) -> bool {
        match self {
            PathFlavor::Posix => path.starts_with('/'),
            PathFlavor::Windows => {
                let bytes = path.as_bytes();
                let drive_rooted = bytes.len() >= 3
                    && bytes[0].is_ascii_alphabetic()
                    && bytes[1] == b':'
                    && bytes[2] == b'\\';
                drive_rooted || path.starts_with("\\\\")
            }
        }
    }
}

/// Convert a file URI (or bare absolute path) to a local path
///
/// Percent-escapes are decoded, the authority part is dropped and query or
/// fragment are ignored. For Windows paths the leading `/` in front of the
/// drive letter is removed and separators become `\`. The result must be
/// absolute.
pub fn file_uri_to_path(uri: &str, flavor: PathFlavor) -> Result<PathBuf, ArtworkError> {
    let invalid = |reason: String| ArtworkError::InvalidUri {
        uri: uri.to_string(),
        reason,
    };

    let mut rest = uri;
    if let Some((scheme, after)) = split_scheme(uri) {
        if !scheme.eq_ignore_ascii_case("file") {
            return Err(invalid(format!("unsupported scheme {:?}", scheme)));
        }
        rest = after;
    }

    if let Some(after) = rest.strip_prefix("//") {
        rest = after.find('/').map_or("", |slash| &after[slash..]);
    }

    let end = rest.find(['?', '#']).unwrap_or(rest.len());
    let decoded = urlencoding::decode(&rest[..end])
        .map_err(|_| invalid("percent-escapes do not decode to UTF-8".to_string()))?;

    let path = match flavor {
        PathFlavor::Posix => decoded.into_owned(),
        PathFlavor::Windows => decoded
            .strip_prefix('/')
            .unwrap_or(&*decoded)
            .replace('/', "\\"),
    };

    if !flavor.is_absolute(&path) {
        return Err(ArtworkError::NotAbsolute {
            uri: uri.to_string(),
            path,
        });
    }

    Ok(PathBuf::from(path))
}

/// Split `scheme:rest`; a single letter before the colon is a drive letter, not a scheme
fn split_scheme(uri: &str) -> Option<(&str, &str)> {
    let colon = uri.find(':')?;
    let scheme = &uri[..colon];

    let mut chars = scheme.chars();
    let valid = scheme.len() > 1
        && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

    valid.then(|| (scheme, &uri[colon + 1..]))
}

/// What an artwork sync did to the target file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtworkAction {
    /// Image copied from this local path
    Copied { from: PathBuf },
    /// Previous image removed
    Removed,
    /// No art and nothing to remove
    AlreadyAbsent,
}

/// Keeps the fixed artwork file in line with the current artwork reference
#[derive(Debug, Clone)]
pub struct ArtworkSync {
    target: PathBuf,
    flavor: PathFlavor,
}

impl ArtworkSync {
    pub fn new(target: PathBuf) -> Self {
        Self {
            target,
            flavor: PathFlavor::native(),
        }
    }

    /// Resolve artwork URIs with a specific path syntax
    pub fn with_flavor(mut self, flavor: PathFlavor) -> Self {
        self.flavor = flavor;
        self
    }

    /// Copy the referenced image over the target, or remove the target when
    /// `artwork_url` is empty
    pub fn sync(&self, artwork_url: &str) -> Result<ArtworkAction, ArtworkError> {
        if artwork_url.is_empty() {
            self.remove()
        } else {
            self.copy_from(artwork_url)
        }
    }

    fn copy_from(&self, artwork_url: &str) -> Result<ArtworkAction, ArtworkError> {
        let source = file_uri_to_path(artwork_url, self.flavor)?;
        log::debug!("Artwork {} resolves to {:?}", artwork_url, source);

        let copy_error = |err| ArtworkError::Copy {
            from: source.clone(),
            to: self.target.clone(),
            source: err,
        };

        ensure_parent(&self.target).map_err(copy_error)?;
        fs::copy(&source, &self.target).map_err(copy_error)?;

        log::info!("Copied artwork {:?} to {:?}", source, self.target);
        Ok(ArtworkAction::Copied { from: source })
    }

    fn remove(&self) -> Result<ArtworkAction, ArtworkError> {
        match fs::remove_file(&self.target) {
            Ok(()) => {
                log::info!("Removed artwork {:?}", self.target);
                Ok(ArtworkAction::Removed)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(ArtworkAction::AlreadyAbsent),
            Err(err) => Err(ArtworkError::Delete {
                path: self.target.clone(),
                source: err,
            }),
        }
    }
}
