//! Startup resolution of the gateway endpoint and credentials.
//!
//! Settings are resolved once, before the UI starts, and every later call uses
//! the validated [`GatewaySettings`]. Missing or malformed values stop the
//! program with a message that says where each value can come from.

use std::error::Error;
use std::fmt;
use std::time::Duration;

use reqwest::Url;
use tracing::{debug, warn};

use crate::core::config::data::Config;
use crate::core::keyring::{KeyringAccessError, TokenStore};
use crate::utils::url::{parse_webhook_url, redact_url};

pub const WEBHOOK_URL_ENV: &str = "WEBHOOK_URL";
pub const BEARER_TOKEN_ENV: &str = "BEARER_TOKEN";

#[derive(Clone)]
pub struct GatewaySettings {
    pub webhook_url: Url,
    pub bearer_token: String,
    pub request_timeout: Option<Duration>,
}

impl fmt::Debug for GatewaySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewaySettings")
            .field("webhook_url", &redact_url(&self.webhook_url))
            .field("bearer_token", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Values given on the command line; these win over everything else.
#[derive(Debug, Default, Clone)]
pub struct SettingsOverrides {
    pub webhook_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Environment,
    Keyring,
    ConfigFile,
}

impl fmt::Display for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenSource::Environment => write!(f, "{BEARER_TOKEN_ENV} environment variable"),
            TokenSource::Keyring => write!(f, "system keyring"),
            TokenSource::ConfigFile => write!(f, "config file"),
        }
    }
}

#[derive(Debug)]
pub enum SettingsError {
    MissingWebhookUrl,
    InvalidWebhookUrl { value: String, reason: String },
    MissingBearerToken,
    Keyring(KeyringAccessError),
}

impl SettingsError {
    pub fn quick_fixes(&self) -> Vec<String> {
        match self {
            SettingsError::MissingWebhookUrl | SettingsError::InvalidWebhookUrl { .. } => vec![
                format!("export {WEBHOOK_URL_ENV}=https://your-host/webhook/<id>"),
                "hookchat set webhook-url https://your-host/webhook/<id>".to_string(),
                "hookchat --webhook-url https://your-host/webhook/<id>".to_string(),
            ],
            SettingsError::MissingBearerToken => vec![
                "hookchat auth".to_string(),
                format!("export {BEARER_TOKEN_ENV}=<token>"),
            ],
            SettingsError::Keyring(_) => vec![
                format!("export {BEARER_TOKEN_ENV}=<token> to bypass the keyring"),
            ],
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            SettingsError::Keyring(_) => 3,
            _ => 2,
        }
    }
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::MissingWebhookUrl => write!(f, "❌ No webhook URL configured"),
            SettingsError::InvalidWebhookUrl { value, reason } => {
                write!(f, "❌ Invalid webhook URL '{value}': {reason}")
            }
            SettingsError::MissingBearerToken => write!(f, "❌ No bearer token configured"),
            SettingsError::Keyring(err) => {
                write!(f, "❌ Could not read the bearer token from the keyring: {err}")
            }
        }
    }
}

impl Error for SettingsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SettingsError::Keyring(err) => Some(err),
            _ => None,
        }
    }
}

/// Resolve gateway settings.
///
/// URL precedence: override, then `WEBHOOK_URL`, then the config file.
/// Token precedence: `BEARER_TOKEN`, then the keyring, then the config file.
/// Blank values count as unset.
pub fn resolve_settings<E>(
    config: &Config,
    overrides: &SettingsOverrides,
    env: E,
    tokens: &dyn TokenStore,
) -> Result<(GatewaySettings, TokenSource), SettingsError>
where
    E: Fn(&str) -> Option<String>,
{
    let raw_url = non_blank(overrides.webhook_url.clone())
        .or_else(|| non_blank(env(WEBHOOK_URL_ENV)))
        .or_else(|| non_blank(config.webhook_url.clone()))
        .ok_or(SettingsError::MissingWebhookUrl)?;
    let webhook_url =
        parse_webhook_url(&raw_url).map_err(|reason| SettingsError::InvalidWebhookUrl {
            value: raw_url.clone(),
            reason,
        })?;

    let (bearer_token, source) = resolve_token(config, &env, tokens)?;
    debug!(url = %redact_url(&webhook_url), %source, "resolved gateway settings");

    Ok((
        GatewaySettings {
            webhook_url,
            bearer_token,
            request_timeout: config.request_timeout_secs.map(Duration::from_secs),
        },
        source,
    ))
}

fn resolve_token<E>(
    config: &Config,
    env: &E,
    tokens: &dyn TokenStore,
) -> Result<(String, TokenSource), SettingsError>
where
    E: Fn(&str) -> Option<String>,
{
    if let Some(token) = non_blank(env(BEARER_TOKEN_ENV)) {
        return Ok((token, TokenSource::Environment));
    }

    match tokens.load_token() {
        Ok(Some(token)) if !token.trim().is_empty() => {
            return Ok((token, TokenSource::Keyring));
        }
        Ok(_) => {}
        Err(err) if err.is_recoverable() => {
            warn!(error = %err, "keyring unavailable; falling back to config file");
        }
        Err(err) => return Err(SettingsError::Keyring(err)),
    }

    non_blank(config.bearer_token.clone())
        .map(|token| (token, TokenSource::ConfigFile))
        .ok_or(SettingsError::MissingBearerToken)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
