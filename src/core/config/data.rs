use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_TITLE_FILE: &str = "title.txt";
pub const DEFAULT_LOGO_FILE: &str = "logo.txt";

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Endpoint that receives `{sessionId, chatInput}` POSTs
    pub webhook_url: Option<String>,
    /// Bearer token; prefer `hookchat auth` so the token lives in the OS keyring
    pub bearer_token: Option<String>,
    /// Text file whose contents become the window title
    pub title_file: Option<PathBuf>,
    /// Text banner drawn above the transcript
    pub logo_file: Option<PathBuf>,
    /// Overall request timeout; the HTTP client default applies when unset
    pub request_timeout_secs: Option<u64>,
    /// UI theme name ("dark" or "light")
    pub theme: Option<String>,
}

impl Config {
    pub fn title_file_or_default(&self) -> PathBuf {
        self.title_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TITLE_FILE))
    }

    pub fn logo_file_or_default(&self) -> PathBuf {
        self.logo_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOGO_FILE))
    }

    pub fn print_all(&self, config_path: &Path) {
        println!("Configuration ({}):", path_display(config_path));
        println!(
            "  webhook-url: {}",
            self.webhook_url.as_deref().unwrap_or("(unset)")
        );
        println!(
            "  bearer-token: {}",
            if self.bearer_token.is_some() {
                "(set in file)"
            } else {
                "(unset)"
            }
        );
        println!(
            "  title-file: {}",
            path_display(self.title_file_or_default())
        );
        println!("  logo-file: {}", path_display(self.logo_file_or_default()));
        println!("  theme: {}", self.theme.as_deref().unwrap_or("dark"));
        match self.request_timeout_secs {
            Some(secs) => println!("  request-timeout: {secs}s"),
            None => println!("  request-timeout: (client default)"),
        }
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
