/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/
use reqwest::StatusCode;
use std::fmt;
use tokio_tungstenite::tungstenite;

/// Errors returned by the Discord client
#[derive(Debug)]
pub enum AppError {
    /// Filesystem error, e.g. a missing configuration file
    Io(std::io::Error),
    /// JSON could not be parsed or produced
    Json(serde_json::Error),
    /// HTTP transport error
    Network(reqwest::Error),
    /// WebSocket transport error
    WebSocketError(String),
    /// A payload had an unexpected shape
    Deserialization(String),
    /// A payload could not be encoded
    SerializationError(String),
    /// Caller supplied an invalid value
    InvalidInput(String),
    /// Rate limited and retries exhausted
    RateLimitExceeded,
    /// The token was rejected by the REST API (HTTP 401)
    Unauthorized,
    /// The token lacks permission for the resource (HTTP 403)
    Forbidden,
    /// The resource does not exist (HTTP 404)
    NotFound,
    /// Non-success status without a parseable Discord error body
    Unexpected(StatusCode),
    /// Discord returned a JSON error object
    Api {
        /// HTTP status of the response
        status: StatusCode,
        /// Discord error code, if present
        code: Option<u64>,
        /// Human readable message from Discord
        message: String,
    },
    /// `login` was called without a token
    MissingToken,
    /// The token is empty or malformed
    InvalidToken(String),
    /// `login` was called on a client that already has a gateway session
    AlreadyLoggedIn,
    /// The operation requires a logged in client
    NotLoggedIn,
    /// The gateway closed the connection with 4004
    AuthenticationFailed,
    /// The gateway closed the connection with a code that cannot be recovered
    GatewayClosed {
        /// WebSocket close code
        code: u16,
        /// Close reason sent by the gateway
        reason: String,
    },
    /// Timed out waiting for the gateway
    Timeout,
    /// A snowflake carried bits that do not map to a valid timestamp
    InvalidSnowflake(u64),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Io(e) => write!(f, "io error: {e}"),
            AppError::Json(e) => write!(f, "json error: {e}"),
            AppError::Network(e) => write!(f, "network error: {e}"),
            AppError::WebSocketError(msg) => write!(f, "websocket error: {msg}"),
            AppError::Deserialization(msg) => write!(f, "deserialization error: {msg}"),
            AppError::SerializationError(msg) => write!(f, "serialization error: {msg}"),
            AppError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            AppError::RateLimitExceeded => write!(f, "rate limit exceeded"),
            AppError::Unauthorized => write!(f, "unauthorized"),
            AppError::Forbidden => write!(f, "forbidden"),
            AppError::NotFound => write!(f, "not found"),
            AppError::Unexpected(status) => write!(f, "unexpected status: {status}"),
            AppError::Api {
                status,
                code,
                message,
            } => match code {
                Some(code) => write!(f, "discord api error {code} ({status}): {message}"),
                None => write!(f, "discord api error ({status}): {message}"),
            },
            AppError::MissingToken => write!(f, "missing token"),
            AppError::InvalidToken(msg) => write!(f, "invalid token: {msg}"),
            AppError::AlreadyLoggedIn => write!(f, "already logged in"),
            AppError::NotLoggedIn => write!(f, "not logged in"),
            AppError::AuthenticationFailed => write!(f, "authentication failed"),
            AppError::GatewayClosed { code, reason } => {
                write!(f, "gateway closed with code {code}: {reason}")
            }
            AppError::Timeout => write!(f, "timed out"),
            AppError::InvalidSnowflake(bits) => write!(f, "invalid snowflake: {bits}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Io(e) => Some(e),
            AppError::Json(e) => Some(e),
            AppError::Network(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Io(e)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Json(e)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Network(e)
    }
}

impl From<tungstenite::Error> for AppError {
    fn from(e: tungstenite::Error) -> Self {
        AppError::WebSocketError(e.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(e: url::ParseError) -> Self {
        AppError::InvalidInput(format!("invalid url: {e}"))
    }
}

impl AppError {
    /// Whether retrying the same operation later may succeed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Network(_) | AppError::WebSocketError(_) | AppError::Timeout => true,
            AppError::RateLimitExceeded => true,
            AppError::Api { status, .. } | AppError::Unexpected(status) => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}
