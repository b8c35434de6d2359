//! # discord-rs
//!
//! A Discord client library covering the two halves of the Discord API:
//!
//! - the REST API (`https://discord.com/api/v10`), with rate limiting and retry
//!   on `429 Too Many Requests`
//! - the gateway (a JSON WebSocket), with the Hello/Identify handshake,
//!   heartbeating, session resume and reconnection handled by a background task
//!
//! ## Usage
//!
//! ```rust,no_run
//! use discord_rs::prelude::*;
//!
//! # async fn run() -> Result<(), AppError> {
//! setup_logger();
//!
//! let mut client = Client::new();
//! let config = ConfigFile::from_path("./config.json")?;
//! client.login(config.token).await?;
//!
//! while let Some(event) = client.next_event().await {
//!     tracing::info!("{event:?}");
//! }
//! # Ok(())
//! # }
//! ```

/// Client, configuration, authentication and rate limiting
pub mod application;
/// Constants shared by the REST and gateway layers
pub mod constants;
/// Error type for the library
pub mod error;
/// REST transport, retry policy and gateway wire models
pub mod model;
/// Convenience re-exports
pub mod prelude;
/// Discord objects returned by the API
pub mod presentation;
/// Gateway WebSocket worker
pub mod transport;
/// Environment, logging, identifiers and snowflakes
pub mod utils;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the library version
#[must_use]
pub fn version() -> &'static str {
    VERSION
}
