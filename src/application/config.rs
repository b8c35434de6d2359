use crate::constants::{
    API_BASE_URL, DEFAULT_GATEWAY_SENDS_PER_MINUTE, DEFAULT_LARGE_THRESHOLD,
    DEFAULT_MAX_RECONNECT_ATTEMPTS, DEFAULT_RECONNECT_INTERVAL, DEFAULT_REST_REQUESTS_PER_SECOND,
    DEFAULT_REST_TIMEOUT,
};
use crate::error::AppError;
use crate::model::gateway::Intents;
use crate::utils::config::{get_env_or_default, get_env_or_none, read_json_file};
use dotenv::dotenv;
use pretty_simple_display::{DebugPretty, DisplaySimple};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Default location of the bot configuration file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "./config.json";

/// Contents of the bot configuration file
///
/// The file is a JSON object with an optional `token` string. Unknown keys are
/// ignored and a missing (or `null`) token is not an error: it is handed to
/// [`Client::login`](crate::application::client::Client::login) as `None`.
#[derive(Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    /// Bot token, passed to login unchanged
    #[serde(default)]
    pub token: Option<String>,
}

impl ConfigFile {
    /// Reads the configuration file at `path`
    ///
    /// # Returns
    /// * `Err(AppError::Io)` - the file is missing or unreadable
    /// * `Err(AppError::Json)` - the file is not a JSON object of the expected shape
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let config: ConfigFile = read_json_file(path)?;
        debug!("Loaded config file (token present: {})", config.token.is_some());
        Ok(config)
    }

    /// Reads `./config.json`
    pub fn load_default() -> Result<Self, AppError> {
        Self::from_path(DEFAULT_CONFIG_PATH)
    }
}

impl FromStr for ConfigFile {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}

impl fmt::Debug for ConfigFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigFile")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[derive(DebugPretty, DisplaySimple, Serialize, Deserialize, Clone)]
/// Runtime settings for the client
pub struct Config {
    /// REST API configuration
    pub rest_api: RestApiConfig,
    /// Gateway configuration
    pub gateway: GatewayConfig,
    /// Global limit applied to REST requests
    pub rate_limiter: RateLimiterConfig,
    /// Limit applied to payloads sent on the gateway socket
    pub gateway_rate_limiter: RateLimiterConfig,
}

#[derive(DebugPretty, DisplaySimple, Serialize, Deserialize, Clone)]
/// Configuration for the REST API
pub struct RestApiConfig {
    /// Base URL for the Discord REST API
    pub base_url: String,
    /// Timeout in seconds for REST API requests
    pub timeout: u64,
}

#[derive(DebugPretty, DisplaySimple, Serialize, Deserialize, Clone)]
/// Configuration for the gateway connection
pub struct GatewayConfig {
    /// Gateway URL; when `None` it is fetched from `GET /gateway`
    pub url: Option<String>,
    /// Gateway intents sent in Identify
    pub intents: u64,
    /// Base reconnect delay in seconds
    pub reconnect_interval: u64,
    /// Consecutive failed reconnects tolerated before giving up (0 = unlimited)
    pub max_reconnect_attempts: u32,
    /// Member count above which offline members are omitted from GUILD_CREATE
    pub large_threshold: u8,
}

#[derive(DebugPretty, DisplaySimple, Serialize, Deserialize, Clone)]
/// Configuration for rate limiting API requests
pub struct RateLimiterConfig {
    /// Maximum number of requests allowed per period
    pub max_requests: u32,
    /// Time period in seconds for the rate limit
    pub period_seconds: u64,
    /// Burst size - maximum number of requests that can be made at once
    pub burst_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Creates a configuration from the environment
    ///
    /// Loads `.env` if present and reads `DISCORD_*` overrides. The bot token is
    /// not read here; it only comes from the config file.
    pub fn new() -> Self {
        match dotenv() {
            Ok(_) => debug!("Successfully loaded .env file"),
            Err(e) => debug!("Failed to load .env file: {e}"),
        }

        Config {
            rest_api: RestApiConfig {
                base_url: get_env_or_default("DISCORD_API_BASE_URL", String::from(API_BASE_URL)),
                timeout: get_env_or_default("DISCORD_REST_TIMEOUT", DEFAULT_REST_TIMEOUT),
            },
            gateway: GatewayConfig {
                url: get_env_or_none("DISCORD_GATEWAY_URL"),
                intents: get_env_or_default("DISCORD_INTENTS", Intents::default().bits()),
                reconnect_interval: get_env_or_default(
                    "DISCORD_RECONNECT_INTERVAL",
                    DEFAULT_RECONNECT_INTERVAL,
                ),
                max_reconnect_attempts: get_env_or_default(
                    "DISCORD_MAX_RECONNECT_ATTEMPTS",
                    DEFAULT_MAX_RECONNECT_ATTEMPTS,
                ),
                large_threshold: get_env_or_default(
                    "DISCORD_LARGE_THRESHOLD",
                    DEFAULT_LARGE_THRESHOLD,
                ),
            },
            rate_limiter: RateLimiterConfig {
                max_requests: get_env_or_default(
                    "DISCORD_RATE_LIMIT_MAX_REQUESTS",
                    DEFAULT_REST_REQUESTS_PER_SECOND,
                ),
                period_seconds: get_env_or_default("DISCORD_RATE_LIMIT_PERIOD_SECONDS", 1),
                burst_size: get_env_or_default(
                    "DISCORD_RATE_LIMIT_BURST_SIZE",
                    DEFAULT_REST_REQUESTS_PER_SECOND,
                ),
            },
            gateway_rate_limiter: RateLimiterConfig {
                max_requests: DEFAULT_GATEWAY_SENDS_PER_MINUTE,
                period_seconds: 60,
                burst_size: DEFAULT_GATEWAY_SENDS_PER_MINUTE,
            },
        }
    }

    /// Points both the REST client and the gateway at explicit URLs
    #[must_use]
    pub fn with_endpoints(mut self, rest_base_url: &str, gateway_url: Option<&str>) -> Self {
        self.rest_api.base_url = rest_base_url.trim_end_matches('/').to_string();
        self.gateway.url = gateway_url.map(String::from);
        self
    }

    /// Replaces the gateway intents
    #[must_use]
    pub fn with_intents(mut self, intents: Intents) -> Self {
        self.gateway.intents = intents.bits();
        self
    }
}
