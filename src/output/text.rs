//! Current-state and history text files

use super::ensure_parent;
use anyhow::{Context, Result};
use chrono::NaiveTime;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

/// Writer for the two text outputs
#[derive(Debug, Clone)]
pub struct TextOutputs {
    current_path: PathBuf,
    history_path: PathBuf,
    separator: String,
}

impl TextOutputs {
    pub fn new(current_path: PathBuf, history_path: PathBuf, separator: String) -> Self {
        Self {
            current_path,
            history_path,
            separator,
        }
    }

    /// Overwrite the current-state file with `display + separator`
    pub fn write_current(&self, display: &str) -> Result<()> {
        ensure_parent(&self.current_path).with_context(|| {
            format!("Failed to create directory for {:?}", self.current_path)
        })?;

        fs::write(&self.current_path, format!("{}{}", display, self.separator))
            .with_context(|| format!("Failed to write {:?}", self.current_path))?;

        log::debug!("Wrote current state to {:?}", self.current_path);
        Ok(())
    }

    /// Append one `HH:MM:SS: display` line to the history file
    pub fn append_history(&self, time: NaiveTime, display: &str) -> Result<()> {
        ensure_parent(&self.history_path).with_context(|| {
            format!("Failed to create directory for {:?}", self.history_path)
        })?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.history_path)
            .with_context(|| format!("Failed to open {:?}", self.history_path))?;

        file.write_all(history_line(time, display).as_bytes())
            .with_context(|| format!("Failed to append to {:?}", self.history_path))?;

        Ok(())
    }
}

/// Format a history entry, newline included
pub fn history_line(time: NaiveTime, display: &str) -> String {
    format!("{}: {}\n", time.format("%H:%M:%S"), display)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn outputs(dir: &TempDir) -> TextOutputs {
        TextOutputs::new(
            dir.path().join("Text/NowPlaying.txt"),
            dir.path().join("Text/NowPlaying_History.txt"),
            "   |   ".to_string(),
        )
    }

    #[test]
    fn test_history_line_format() {
        let time = NaiveTime::from_hms_opt(9, 5, 7).unwrap();
        assert_eq!(history_line(time, "Song A - Band B"), "09:05:07: Song A - Band B\n");
    }

    #[test]
    fn test_current_is_overwritten() {
        let dir = TempDir::new().unwrap();
        let outputs = outputs(&dir);

        outputs.write_current("First").unwrap();
        outputs.write_current("Second").unwrap();

        let content = fs::read_to_string(dir.path().join("Text/NowPlaying.txt")).unwrap();
        assert_eq!(content, "Second   |   ");
    }

    #[test]
    fn test_history_is_appended() {
        let dir = TempDir::new().unwrap();
        let outputs = outputs(&dir);

        outputs
            .append_history(NaiveTime::from_hms_opt(10, 0, 0).unwrap(), "One")
            .unwrap();
        outputs
            .append_history(NaiveTime::from_hms_opt(10, 3, 30).unwrap(), "Twö")
            .unwrap();

        let content = fs::read_to_string(dir.path().join("Text/NowPlaying_History.txt")).unwrap();
        assert_eq!(content, "10:00:00: One\n10:03:30: Twö\n");
    }
}
