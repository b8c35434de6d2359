use crate::utils::snowflake::Snowflake;
use pretty_simple_display::{DebugPretty, DisplaySimple};
use serde::{Deserialize, Serialize};

/// A Discord user
#[derive(DebugPretty, DisplaySimple, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// User ID
    pub id: Snowflake,
    /// Username, not unique across the platform before the username migration
    pub username: String,
    /// Legacy 4-digit tag, `"0"` for migrated users
    #[serde(default)]
    pub discriminator: Option<String>,
    /// Display name
    #[serde(default)]
    pub global_name: Option<String>,
    /// Avatar hash
    #[serde(default)]
    pub avatar: Option<String>,
    /// Whether the user is a bot
    #[serde(default)]
    pub bot: bool,
}

impl User {
    /// `username#discriminator` for legacy users, otherwise the username
    #[must_use]
    pub fn tag(&self) -> String {
        match self.discriminator.as_deref() {
            Some(d) if d != "0" => format!("{}#{}", self.username, d),
            _ => self.username.clone(),
        }
    }
}

/// The user the client is logged in as
#[derive(DebugPretty, DisplaySimple, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User ID
    pub id: Snowflake,
    /// Username
    pub username: String,
    /// Legacy 4-digit tag
    #[serde(default)]
    pub discriminator: Option<String>,
    /// Display name
    #[serde(default)]
    pub global_name: Option<String>,
    /// Avatar hash
    #[serde(default)]
    pub avatar: Option<String>,
    /// Whether the account is a bot
    #[serde(default)]
    pub bot: bool,
    /// Whether the account has MFA enabled
    #[serde(default)]
    pub mfa_enabled: bool,
    /// Whether the email address on this account has been verified
    #[serde(default)]
    pub verified: Option<bool>,
}

impl From<CurrentUser> for User {
    fn from(user: CurrentUser) -> Self {
        User {
            id: user.id,
            username: user.username,
            discriminator: user.discriminator,
            global_name: user.global_name,
            avatar: user.avatar,
            bot: user.bot,
        }
    }
}
