/// Discord API version targeted by both the REST client and the gateway
pub const API_VERSION: &str = "10";
/// Base URL of the versioned Discord REST API (no trailing slash)
pub const API_BASE_URL: &str = "https://discord.com/api/v10";
/// Gateway URL used when the `/gateway` endpoint does not return one
pub const GATEWAY_URL: &str = "wss://gateway.discord.gg";
/// Query string appended to every gateway URL
pub const GATEWAY_QUERY: &str = "v=10&encoding=json";
/// User agent string required by Discord for bot HTTP requests
pub const USER_AGENT: &str = concat!(
    "DiscordBot (",
    env!("CARGO_PKG_HOMEPAGE"),
    ", ",
    env!("CARGO_PKG_VERSION"),
    ")"
);
/// Longest wait in seconds honored from a 429 `retry_after`
pub const MAX_RETRY_AFTER_SECS: u64 = 300;
/// Default timeout in seconds for REST requests
pub const DEFAULT_REST_TIMEOUT: u64 = 30;
/// Global REST limit: requests allowed per second across all routes
pub const DEFAULT_REST_REQUESTS_PER_SECOND: u32 = 50;
/// Gateway send limit: payloads allowed per minute on one connection
pub const DEFAULT_GATEWAY_SENDS_PER_MINUTE: u32 = 120;
/// Capacity of the channel carrying gateway events to the client
pub const EVENT_CHANNEL_CAPACITY: usize = 256;
/// Delay in seconds between gateway reconnect attempts (doubled per failure)
pub const DEFAULT_RECONNECT_INTERVAL: u64 = 5;
/// Upper bound in seconds for the reconnect backoff
pub const MAX_RECONNECT_BACKOFF: u64 = 120;
/// Number of consecutive failed reconnects before giving up (0 = never)
pub const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 10;
/// Member count above which a guild's offline members are not sent
pub const DEFAULT_LARGE_THRESHOLD: u8 = 50;
/// Seconds to wait for READY after login before failing
pub const LOGIN_TIMEOUT_SECS: u64 = 30;
/// Discord epoch (2015-01-01T00:00:00Z) in milliseconds
pub const DISCORD_EPOCH_MS: u64 = 1_420_070_400_000;
