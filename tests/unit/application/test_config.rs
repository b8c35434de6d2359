use discord_rs::application::config::{Config, ConfigFile};
use discord_rs::error::AppError;
use discord_rs::model::gateway::Intents;
use std::path::PathBuf;

fn write_temp(contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("discord-rs-{}.json", nanoid::nanoid!()));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_config_file_token_passed_through() {
    let path = write_temp(r#"{"token": "abc"}"#);
    let config = ConfigFile::from_path(&path).unwrap();
    assert_eq!(config.token, Some("abc".to_string()));
    std::fs::remove_file(path).unwrap();
}

#[test]
fn test_config_file_without_token() {
    let path = write_temp(r#"{"prefix": "!"}"#);
    let config = ConfigFile::from_path(&path).unwrap();
    assert_eq!(config.token, None);
    std::fs::remove_file(path).unwrap();
}

#[test]
fn test_config_file_missing() {
    let path = std::env::temp_dir().join("discord-rs-does-not-exist.json");
    let result = ConfigFile::from_path(&path);
    assert!(matches!(result, Err(AppError::Io(_))));
}

#[test]
fn test_config_file_invalid_json() {
    let path = write_temp("{ token: abc");
    let result = ConfigFile::from_path(&path);
    assert!(matches!(result, Err(AppError::Json(_))));
    std::fs::remove_file(path).unwrap();
}

#[test]
fn test_config_file_wrong_token_type() {
    let path = write_temp(r#"{"token": 42}"#);
    assert!(matches!(ConfigFile::from_path(&path), Err(AppError::Json(_))));
    std::fs::remove_file(path).unwrap();
}

#[test]
fn test_config_builders() {
    let config = Config::new()
        .with_endpoints("http://127.0.0.1:8080/api/", Some("ws://127.0.0.1:8081"))
        .with_intents(Intents::GUILDS | Intents::MESSAGE_CONTENT);
    assert_eq!(config.rest_api.base_url, "http://127.0.0.1:8080/api");
    assert_eq!(config.gateway.url.as_deref(), Some("ws://127.0.0.1:8081"));
    assert_eq!(config.gateway.intents, 1 | (1 << 15));
}

#[test]
fn test_config_defaults() {
    let config = Config::new();
    assert!(config.rest_api.timeout > 0);
    assert_eq!(config.gateway_rate_limiter.period_seconds, 60);
    assert_eq!(config.gateway_rate_limiter.max_requests, 120);
}
