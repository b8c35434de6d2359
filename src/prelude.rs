/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! # discord-rs Prelude
//!
//! Re-exports the types needed by most bots, so a single import covers login,
//! events and the REST services.
//!
//! ## Usage
//!
//! ```rust
//! use discord_rs::prelude::*;
//!
//! let config = Config::new().with_intents(Intents::GUILDS | Intents::GUILD_MESSAGES);
//! let client = Client::with_config(config).unwrap();
//! assert!(!client.is_logged_in());
//! ```

// ============================================================================
// CORE CONFIGURATION AND SETUP
// ============================================================================

/// Runtime configuration and the JSON config file
pub use crate::application::config::{Config, ConfigFile, DEFAULT_CONFIG_PATH};

/// Library version information
pub use crate::{VERSION, version};

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Main error type for the library
pub use crate::error::AppError;

// ============================================================================
// CLIENT AND AUTHENTICATION
// ============================================================================

/// Discord client
pub use crate::application::client::Client;

/// Bot token and gateway session state
pub use crate::application::auth::{GatewaySession, Token};

// ============================================================================
// SERVICES (TRAITS)
// ============================================================================

/// REST service traits implemented by the client
pub use crate::application::interfaces::{ChannelService, UserService};

// ============================================================================
// TRANSPORT
// ============================================================================

/// REST client and retry policy
pub use crate::model::http::HttpClient;
pub use crate::model::retry::RetryConfig;

// ============================================================================
// GATEWAY MODELS
// ============================================================================

/// Events and gateway frames
pub use crate::model::events::Event;
pub use crate::model::gateway::{GatewayPayload, Intents, Opcode, Ready};

// ============================================================================
// PRESENTATION LAYER
// ============================================================================

/// Discord objects
pub use crate::presentation::channel::Channel;
pub use crate::presentation::guild::{Guild, UnavailableGuild};
pub use crate::presentation::message::{CreateMessage, DeletedMessage, Message};
pub use crate::presentation::user::{CurrentUser, User};

// ============================================================================
// UTILITIES
// ============================================================================

/// Logging utilities
pub use crate::utils::logger::setup_logger;

/// Snowflake identifiers
pub use crate::utils::snowflake::Snowflake;

// ============================================================================
// RE-EXPORTS FROM EXTERNAL CRATES
// ============================================================================

/// Re-export commonly used external types
pub use async_trait::async_trait;
pub use serde::{Deserialize, Serialize};
pub use std::sync::Arc;
pub use tokio;
pub use tracing::{debug, error, info, warn};

/// Re-export chrono for date/time handling
pub use chrono::{DateTime, Utc};
