use discord_rs::error::AppError;
use reqwest::StatusCode;
use std::error::Error;

#[test]
fn test_error_display() {
    assert_eq!(AppError::MissingToken.to_string(), "missing token");
    assert!(
        AppError::GatewayClosed {
            code: 4014,
            reason: "Disallowed intent(s).".to_string()
        }
        .to_string()
        .contains("4014")
    );
}

#[test]
fn test_error_from_io() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "config.json");
    let error: AppError = io.into();
    assert!(matches!(error, AppError::Io(_)));
    assert!(error.source().is_some());
}

#[test]
fn test_error_from_json() {
    let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error: AppError = json.into();
    assert!(matches!(error, AppError::Json(_)));
}

#[test]
fn test_error_is_retryable() {
    assert!(AppError::Timeout.is_retryable());
    assert!(AppError::Unexpected(StatusCode::BAD_GATEWAY).is_retryable());
    assert!(!AppError::Unauthorized.is_retryable());
    assert!(!AppError::AuthenticationFailed.is_retryable());
    assert!(!AppError::MissingToken.is_retryable());
}
