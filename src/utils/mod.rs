/// Module containing environment variable helpers
pub mod config;
/// Module containing utilities for generating message nonces
pub mod id;
/// Module containing logging utilities
pub mod logger;
/// Module containing the Discord snowflake identifier type
pub mod snowflake;

pub use config::*;
pub use id::*;
pub use logger::*;
pub use snowflake::*;
