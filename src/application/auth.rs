/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Authentication module for the Discord API
//!
//! This module provides:
//! - [`Token`]: a validated bot token that renders the `Authorization` header
//! - [`GatewaySession`]: the state needed to resume a gateway session

use crate::error::AppError;
use crate::presentation::user::CurrentUser;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use tracing::warn;

/// Shape of a bot token: three dot-separated base64url segments
static TOKEN_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]{20,}\.[A-Za-z0-9_-]{4,}\.[A-Za-z0-9_-]{20,}$")
        .expect("token pattern is a valid regex")
});

/// A bot token
///
/// Construction trims surrounding whitespace and strips an optional `Bot `
/// prefix. The raw value is never written by `Debug` or `Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    /// Validates and normalizes a raw token
    ///
    /// # Returns
    /// * `Err(AppError::InvalidToken)` - the token is empty or contains
    ///   characters that cannot appear in an HTTP header
    pub fn new(raw: impl Into<String>) -> Result<Self, AppError> {
        let raw = raw.into();
        let trimmed = raw.trim_start();
        let token = trimmed.strip_prefix("Bot ").unwrap_or(trimmed).trim();

        if token.is_empty() {
            return Err(AppError::InvalidToken("token is empty".to_string()));
        }
        if token.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(AppError::InvalidToken(
                "token contains whitespace or control characters".to_string(),
            ));
        }
        if !TOKEN_SHAPE.is_match(token) {
            warn!("Token does not look like a Discord bot token, the gateway may reject it");
        }

        Ok(Self(token.to_string()))
    }

    /// The token as sent in Identify and Resume payloads
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the REST `Authorization` header
    #[must_use]
    pub fn authorization(&self) -> String {
        format!("Bot {}", self.0)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token([REDACTED])")
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Gateway session state, kept across reconnects so the session can be resumed
#[derive(Debug, Clone, Default)]
pub struct GatewaySession {
    /// Session ID from READY
    pub session_id: Option<String>,
    /// URL to use when resuming, from READY
    pub resume_gateway_url: Option<String>,
    /// Sequence number of the last dispatch received
    pub sequence: Option<u64>,
    /// The bot user, from READY
    pub user: Option<CurrentUser>,
}

impl GatewaySession {
    /// Whether a Resume can be attempted instead of a fresh Identify
    #[must_use]
    pub fn can_resume(&self) -> bool {
        self.session_id.is_some() && self.sequence.is_some()
    }

    /// Records the sequence of a dispatch; sequences never move backwards
    pub fn update_sequence(&mut self, sequence: u64) {
        if self.sequence.is_none_or(|current| sequence > current) {
            self.sequence = Some(sequence);
        }
    }

    /// Forgets everything needed for resuming (after a non-resumable invalid session)
    pub fn clear(&mut self) {
        self.session_id = None;
        self.resume_gateway_url = None;
        self.sequence = None;
    }
}
