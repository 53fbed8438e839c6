use super::data::Config;
use super::io::ConfigError;
use super::keys::ConfigKeyError;
use super::settings::{
    resolve_settings, SettingsError, SettingsOverrides, TokenSource, BEARER_TOKEN_ENV,
    WEBHOOK_URL_ENV,
};
use crate::core::keyring::testing::MemoryTokenStore;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

fn file_config() -> Config {
    Config {
        webhook_url: Some("https://file.example.com/webhook".to_string()),
        bearer_token: Some("file-token".to_string()),
        ..Default::default()
    }
}

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
}

#[test]
fn test_config_persistence_lifecycle() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config
        .set_value("webhook-url", "https://hooks.example.com/webhook/abc")
        .expect("set url");
    config
        .set_value("request-timeout", "30s")
        .expect("set timeout");
    config.save_to_path(&config_path).expect("save");

    let loaded = Config::load_from_path(&config_path).expect("load");
    assert_eq!(
        loaded.webhook_url.as_deref(),
        Some("https://hooks.example.com/webhook/abc")
    );
    assert_eq!(loaded.request_timeout_secs, Some(30));

    let mut loaded = loaded;
    loaded.unset_value("request-timeout").expect("unset");
    loaded.save_to_path(&config_path).expect("save");

    let reloaded = Config::load_from_path(&config_path).expect("reload");
    assert_eq!(reloaded.request_timeout_secs, None);
    assert!(reloaded.webhook_url.is_some());
}

#[test]
fn invalid_toml_reports_parse_error_with_path() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "webhook_url = [unterminated").expect("write");

    let err = Config::load_from_path(&config_path).expect_err("parse should fail");
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("config.toml"));
}

#[test]
fn set_value_rejects_unknown_keys_and_bad_values() {
    let mut config = Config::default();
    assert_eq!(
        config.set_value("model", "gpt"),
        Err(ConfigKeyError::UnknownKey("model".to_string()))
    );
    assert!(matches!(
        config.set_value("webhook-url", "ftp://x"),
        Err(ConfigKeyError::InvalidValue { key: "webhook-url", .. })
    ));
    assert!(matches!(
        config.set_value("request-timeout", "0"),
        Err(ConfigKeyError::InvalidValue { key: "request-timeout", .. })
    ));
    for doubled in ["5ss", "5sss"] {
        assert!(matches!(
            config.set_value("request-timeout", doubled),
            Err(ConfigKeyError::InvalidValue { key: "request-timeout", .. })
        ));
    }
    assert_eq!(config, Config::default());
}

#[test]
fn presentation_files_fall_back_to_defaults() {
    let config = Config::default();
    assert_eq!(config.title_file_or_default(), PathBuf::from("title.txt"));
    assert_eq!(config.logo_file_or_default(), PathBuf::from("logo.txt"));
}

#[test]
fn environment_beats_config_file() {
    let env = env_from(&[
        (WEBHOOK_URL_ENV, "https://env.example.com/hook"),
        (BEARER_TOKEN_ENV, "env-token"),
    ]);
    let store = MemoryTokenStore::with_token("keyring-token");

    let (settings, source) =
        resolve_settings(&file_config(), &SettingsOverrides::default(), env, &store)
            .expect("resolve");

    assert_eq!(settings.webhook_url.as_str(), "https://env.example.com/hook");
    assert_eq!(settings.bearer_token, "env-token");
    assert_eq!(source, TokenSource::Environment);
}

#[test]
fn command_line_url_beats_environment() {
    let env = env_from(&[(WEBHOOK_URL_ENV, "https://env.example.com/hook")]);
    let overrides = SettingsOverrides {
        webhook_url: Some("https://cli.example.com/hook".to_string()),
    };
    let store = MemoryTokenStore::default();

    let (settings, _) =
        resolve_settings(&file_config(), &overrides, env, &store).expect("resolve");

    assert_eq!(settings.webhook_url.as_str(), "https://cli.example.com/hook");
}

#[test]
fn keyring_token_beats_config_file() {
    let store = MemoryTokenStore::with_token("keyring-token");

    let (settings, source) = resolve_settings(
        &file_config(),
        &SettingsOverrides::default(),
        env_from(&[]),
        &store,
    )
    .expect("resolve");

    assert_eq!(settings.bearer_token, "keyring-token");
    assert_eq!(source, TokenSource::Keyring);
}

#[test]
fn unavailable_keyring_falls_back_to_config_file() {
    let store = MemoryTokenStore::unavailable();

    let (settings, source) = resolve_settings(
        &file_config(),
        &SettingsOverrides::default(),
        env_from(&[]),
        &store,
    )
    .expect("resolve");

    assert_eq!(settings.bearer_token, "file-token");
    assert_eq!(source, TokenSource::ConfigFile);
}

#[test]
fn blank_values_count_as_missing() {
    let env = env_from(&[(WEBHOOK_URL_ENV, "   "), (BEARER_TOKEN_ENV, "")]);
    let store = MemoryTokenStore::default();

    let err = resolve_settings(&Config::default(), &SettingsOverrides::default(), env, &store)
        .expect_err("should fail");
    assert!(matches!(err, SettingsError::MissingWebhookUrl));
}

#[test]
fn missing_token_fails_fast_with_quick_fixes() {
    let config = Config {
        webhook_url: Some("https://file.example.com/webhook".to_string()),
        ..Default::default()
    };
    let store = MemoryTokenStore::default();

    let err = resolve_settings(&config, &SettingsOverrides::default(), env_from(&[]), &store)
        .expect_err("should fail");

    assert!(matches!(err, SettingsError::MissingBearerToken));
    assert!(err.quick_fixes().iter().any(|fix| fix == "hookchat auth"));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn malformed_url_is_rejected() {
    let env = env_from(&[(WEBHOOK_URL_ENV, "hooks.example.com/webhook")]);
    let store = MemoryTokenStore::with_token("t");

    let err = resolve_settings(&Config::default(), &SettingsOverrides::default(), env, &store)
        .expect_err("should fail");

    match err {
        SettingsError::InvalidWebhookUrl { value, .. } => {
            assert_eq!(value, "hooks.example.com/webhook")
        }
        other => panic!("expected invalid url, got {other:?}"),
    }
}

#[test]
fn timeout_comes_from_config() {
    let config = Config {
        request_timeout_secs: Some(12),
        ..file_config()
    };
    let store = MemoryTokenStore::default();

    let (settings, _) =
        resolve_settings(&config, &SettingsOverrides::default(), env_from(&[]), &store)
            .expect("resolve");

    assert_eq!(settings.request_timeout, Some(Duration::from_secs(12)));
    let debug = format!("{settings:?}");
    assert!(!debug.contains("file-token"));
}
