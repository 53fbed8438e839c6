//! Plain-text transcript log.
//!
//! Turns are appended as they happen: user turns with a `You:` prefix,
//! replies as-is, separated by blank lines. The file is an export only and
//! is never read back.

use std::error::Error;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::core::message::Turn;

pub struct LoggingState {
    file_path: Option<PathBuf>,
    is_active: bool,
}

impl LoggingState {
    /// A log file given up front starts active.
    pub fn new(log_file: Option<PathBuf>) -> Self {
        let is_active = log_file.is_some();
        LoggingState {
            file_path: log_file,
            is_active,
        }
    }

    pub fn disabled() -> Self {
        Self::new(None)
    }

    /// Verify the file is writable and stamp it with the session start.
    pub fn start_session(&self, session_id: &str) -> Result<(), Box<dyn Error>> {
        if !self.is_active {
            return Ok(());
        }
        self.write_lines(&format!(
            "## Session {session_id} started {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ))
    }

    pub fn toggle_logging(&mut self) -> Result<String, Box<dyn Error>> {
        match &self.file_path {
            Some(path) => {
                let path = path.display().to_string();
                if self.is_active {
                    self.write_lines("## Logging paused")?;
                    self.is_active = false;
                    Ok(format!("Logging paused (file: {path})"))
                } else {
                    self.is_active = true;
                    Ok(format!("Logging resumed to: {path}"))
                }
            }
            None => Err("No log file specified. Start with --log <file> to enable logging.".into()),
        }
    }

    pub fn log_turn(&self, turn: &Turn) -> Result<(), Box<dyn Error>> {
        if !self.is_active {
            return Ok(());
        }
        match turn {
            Turn::User(content) => self.write_lines(&format!("You: {content}")),
            Turn::Assistant(result) => self.write_lines(&result.contract),
        }
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn get_status_string(&self) -> String {
        let file_name = |path: &Path| {
            path.file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .into_owned()
        };
        match (&self.file_path, self.is_active) {
            (None, _) => "disabled".to_string(),
            (Some(path), true) => format!("active ({})", file_name(path)),
            (Some(path), false) => format!("paused ({})", file_name(path)),
        }
    }

    fn write_lines(&self, content: &str) -> Result<(), Box<dyn Error>> {
        let Some(file_path) = self.file_path.as_ref() else {
            return Ok(());
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        let mut writer = BufWriter::new(file);

        for line in content.lines() {
            writeln!(writer, "{line}")?;
        }
        // Blank line between entries, matching the on-screen spacing
        writeln!(writer)?;

        writer.flush()?;
        Ok(())
    }
}
