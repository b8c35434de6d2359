use crate::presentation::user::User;
use crate::utils::snowflake::Snowflake;
use pretty_simple_display::{DebugPretty, DisplaySimple};
use serde::{Deserialize, Serialize};

/// A message sent in a channel
/// ([Discord docs](https://discord.com/developers/docs/resources/message#message-object))
#[derive(DebugPretty, DisplaySimple, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message ID
    pub id: Snowflake,
    /// Channel the message was sent in
    pub channel_id: Snowflake,
    /// Guild the message was sent in (gateway events only)
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    /// Author of the message
    pub author: User,
    /// Text content; empty without the MESSAGE_CONTENT intent
    #[serde(default)]
    pub content: String,
    /// ISO8601 time the message was sent
    pub timestamp: String,
    /// ISO8601 time of the last edit
    #[serde(default)]
    pub edited_timestamp: Option<String>,
    /// Whether this was a TTS message
    #[serde(default)]
    pub tts: bool,
    /// Whether this message mentions everyone
    #[serde(default)]
    pub mention_everyone: bool,
    /// Users specifically mentioned
    #[serde(default)]
    pub mentions: Vec<User>,
    /// Roles specifically mentioned
    #[serde(default)]
    pub mention_roles: Vec<Snowflake>,
    /// Nonce echoed back from [`CreateMessage::nonce`]
    #[serde(default)]
    pub nonce: Option<serde_json::Value>,
}

/// A deleted message, as sent in MESSAGE_DELETE
#[derive(DebugPretty, DisplaySimple, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletedMessage {
    /// Message ID
    pub id: Snowflake,
    /// Channel ID
    pub channel_id: Snowflake,
    /// Guild ID
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
}

/// Body of `POST /channels/{id}/messages`
#[derive(DebugPretty, DisplaySimple, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateMessage {
    /// Message content (up to 2000 characters)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Nonce used to match the resulting MESSAGE_CREATE
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    /// Whether this is a TTS message
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub tts: bool,
}

impl CreateMessage {
    /// Maximum content length accepted by Discord
    pub const MAX_CONTENT_LENGTH: usize = 2000;

    /// Text message with a fresh nonce
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            nonce: Some(crate::utils::id::nonce()),
            tts: false,
        }
    }
}
