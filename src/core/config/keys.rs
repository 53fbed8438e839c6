use std::error::Error;
use std::fmt;
use std::path::PathBuf;

use crate::core::config::data::Config;
use crate::ui::theme::THEME_NAMES;
use crate::utils::url::parse_webhook_url;

/// Keys accepted by `hookchat set` and `hookchat unset`.
pub const SETTABLE_KEYS: &[&str] = &[
    "webhook-url",
    "title-file",
    "logo-file",
    "request-timeout",
    "theme",
];

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigKeyError {
    UnknownKey(String),
    InvalidValue { key: &'static str, reason: String },
}

impl fmt::Display for ConfigKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigKeyError::UnknownKey(key) => write!(
                f,
                "Unknown config key: {key} (expected one of: {})",
                SETTABLE_KEYS.join(", ")
            ),
            ConfigKeyError::InvalidValue { key, reason } => {
                write!(f, "Invalid value for {key}: {reason}")
            }
        }
    }
}

impl Error for ConfigKeyError {}

impl Config {
    /// Apply `key = value`, returning a confirmation line.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<String, ConfigKeyError> {
        let value = value.trim();
        match key {
            "webhook-url" => {
                let url = parse_webhook_url(value).map_err(|reason| {
                    ConfigKeyError::InvalidValue {
                        key: "webhook-url",
                        reason,
                    }
                })?;
                self.webhook_url = Some(url.to_string());
            }
            "title-file" => self.title_file = Some(PathBuf::from(value)),
            "logo-file" => self.logo_file = Some(PathBuf::from(value)),
            "request-timeout" => {
                let secs = value
                    .strip_suffix('s')
                    .unwrap_or(value)
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or_else(|| ConfigKeyError::InvalidValue {
                        key: "request-timeout",
                        reason: "expected a positive number of seconds".to_string(),
                    })?;
                self.request_timeout_secs = Some(secs);
            }
            "theme" => {
                if !THEME_NAMES.contains(&value) {
                    return Err(ConfigKeyError::InvalidValue {
                        key: "theme",
                        reason: format!("expected one of: {}", THEME_NAMES.join(", ")),
                    });
                }
                self.theme = Some(value.to_string());
            }
            other => return Err(ConfigKeyError::UnknownKey(other.to_string())),
        }
        Ok(format!("✅ Set {key} to: {value}"))
    }

    pub fn unset_value(&mut self, key: &str) -> Result<String, ConfigKeyError> {
        match key {
            "webhook-url" => self.webhook_url = None,
            "title-file" => self.title_file = None,
            "logo-file" => self.logo_file = None,
            "request-timeout" => self.request_timeout_secs = None,
            "theme" => self.theme = None,
            other => return Err(ConfigKeyError::UnknownKey(other.to_string())),
        }
        Ok(format!("✅ Unset {key}"))
    }
}
