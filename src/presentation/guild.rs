use crate::utils::snowflake::Snowflake;
use pretty_simple_display::{DebugPretty, DisplaySimple};
use serde::{Deserialize, Serialize};

/// A guild listed in READY before its GUILD_CREATE arrives
#[derive(DebugPretty, DisplaySimple, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnavailableGuild {
    /// Guild ID
    pub id: Snowflake,
    /// Set while the guild is in an outage
    #[serde(default)]
    pub unavailable: bool,
}

/// A guild as sent in GUILD_CREATE, keeping the fields this client uses
#[derive(DebugPretty, DisplaySimple, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guild {
    /// Guild ID
    pub id: Snowflake,
    /// Guild name
    pub name: String,
    /// Icon hash
    #[serde(default)]
    pub icon: Option<String>,
    /// Owner user ID
    #[serde(default)]
    pub owner_id: Option<Snowflake>,
    /// Approximate member count (GUILD_CREATE only)
    #[serde(default)]
    pub member_count: Option<u64>,
}
