use pretty_simple_display::{DebugPretty, DisplaySimple};
use serde::{Deserialize, Serialize};

/// Response of `GET /gateway`
#[derive(DebugPretty, DisplaySimple, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GatewayInfo {
    /// WSS URL to connect to; absent responses fall back to the default gateway
    #[serde(default)]
    pub url: Option<String>,
}

/// Response of `GET /gateway/bot`
#[derive(DebugPretty, DisplaySimple, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayBot {
    /// WSS URL to connect to
    pub url: String,
    /// Recommended number of shards
    pub shards: u32,
    /// Identify budget for the bot
    pub session_start_limit: SessionStartLimit,
}

/// Identify budget returned by `GET /gateway/bot`
#[derive(DebugPretty, DisplaySimple, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStartLimit {
    /// Total session starts allowed per reset window
    pub total: u32,
    /// Session starts left
    pub remaining: u32,
    /// Milliseconds until the budget resets
    pub reset_after: u64,
    /// Identify requests allowed per 5 seconds
    pub max_concurrency: u32,
}
