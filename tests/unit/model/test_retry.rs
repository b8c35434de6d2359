use discord_rs::model::retry::RetryConfig;
use std::time::Duration;

#[test]
fn test_retry_config_infinite() {
    let config = RetryConfig::infinite();
    assert!(config.allows(0));
    assert!(config.allows(u32::MAX - 1));
}

#[test]
fn test_retry_config_with_max_retries() {
    let config = RetryConfig::with_max_retries(2);
    assert!(config.allows(0));
    assert!(config.allows(1));
    assert!(!config.allows(2));
}

#[test]
fn test_retry_config_zero_retries() {
    let config = RetryConfig::with_max_retries(0);
    assert!(!config.allows(0));
}

#[test]
fn test_retry_delay_prefers_server_value() {
    let config = RetryConfig::with_max_retries_and_delay(3, 250);
    assert_eq!(
        config.delay(Some(Duration::from_millis(40))),
        Duration::from_millis(40)
    );
    assert_eq!(config.delay(None), Duration::from_millis(250));
}

#[test]
fn test_retry_delay_default() {
    let config = RetryConfig::with_max_retries(1);
    assert_eq!(config.delay(None), Duration::from_secs(1));
}
