/// Bot token and gateway session state
pub mod auth;
/// Discord client
pub mod client;
/// Application configuration module
pub mod config;
/// Service traits implemented by the client
pub mod interfaces;
/// Rate limiter module for API request throttling
pub mod rate_limiter;
