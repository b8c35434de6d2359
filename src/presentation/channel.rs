use crate::utils::snowflake::Snowflake;
use pretty_simple_display::{DebugPretty, DisplaySimple};
use serde::{Deserialize, Serialize};

/// A channel
#[derive(DebugPretty, DisplaySimple, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    /// Channel ID
    pub id: Snowflake,
    /// Channel type (0 = guild text, 1 = DM, 2 = voice, ...)
    #[serde(rename = "type")]
    pub kind: u8,
    /// Guild the channel belongs to
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    /// Channel name
    #[serde(default)]
    pub name: Option<String>,
    /// Channel topic
    #[serde(default)]
    pub topic: Option<String>,
    /// Last message sent in the channel
    #[serde(default)]
    pub last_message_id: Option<Snowflake>,
}

impl Channel {
    /// Whether this is a direct message channel
    #[must_use]
    pub fn is_dm(&self) -> bool {
        self.kind == 1
    }
}
