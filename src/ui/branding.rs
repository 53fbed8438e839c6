use std::fs;
use std::path::Path;

use tracing::debug;

use crate::utils::sanitize::strip_control_sequences;

pub const DEFAULT_TITLE: &str = "AI Assistant";

/// Longest banner drawn above the transcript; extra lines are dropped.
const MAX_BANNER_LINES: usize = 12;

/// Title and optional banner shown around the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branding {
    pub title: String,
    pub banner: Vec<String>,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            banner: Vec::new(),
        }
    }
}

impl Branding {
    /// Read both files; anything missing or empty falls back silently.
    pub fn load(title_file: &Path, logo_file: &Path) -> Self {
        let title = read_optional(title_file)
            .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());

        let banner = read_optional(logo_file)
            .map(|text| {
                text.trim_matches('\n')
                    .lines()
                    .take(MAX_BANNER_LINES)
                    .map(|line| line.trim_end().to_string())
                    .collect()
            })
            .unwrap_or_default();

        Self { title, banner }
    }
}

fn read_optional(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(text) => Some(strip_control_sequences(&text)),
        Err(err) => {
            debug!(path = %path.display(), error = %err, "presentation file unavailable");
            None
        }
    }
}
