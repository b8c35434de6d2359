//! Gateway wire models
//!
//! Every gateway frame is a JSON object `{ "op": .., "d": .., "s": .., "t": .. }`.
//! Reference: <https://discord.com/developers/docs/topics/gateway>

use crate::presentation::guild::UnavailableGuild;
use crate::presentation::user::CurrentUser;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::BitOr;

/// Gateway opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    /// Receive: an event was dispatched
    Dispatch = 0,
    /// Send/Receive: keep the connection alive
    Heartbeat = 1,
    /// Send: start a new session
    Identify = 2,
    /// Send: update the client's presence
    PresenceUpdate = 3,
    /// Send: join/leave or move between voice channels
    VoiceStateUpdate = 4,
    /// Send: resume a previous session
    Resume = 6,
    /// Receive: reconnect and resume immediately
    Reconnect = 7,
    /// Send: request guild members
    RequestGuildMembers = 8,
    /// Receive: the session has been invalidated
    InvalidSession = 9,
    /// Receive: sent right after connecting
    Hello = 10,
    /// Receive: heartbeat acknowledged
    HeartbeatAck = 11,
}

impl TryFrom<u8> for Opcode {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Opcode::Dispatch),
            1 => Ok(Opcode::Heartbeat),
            2 => Ok(Opcode::Identify),
            3 => Ok(Opcode::PresenceUpdate),
            4 => Ok(Opcode::VoiceStateUpdate),
            6 => Ok(Opcode::Resume),
            7 => Ok(Opcode::Reconnect),
            8 => Ok(Opcode::RequestGuildMembers),
            9 => Ok(Opcode::InvalidSession),
            10 => Ok(Opcode::Hello),
            11 => Ok(Opcode::HeartbeatAck),
            other => Err(other),
        }
    }
}

/// Gateway frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayPayload {
    /// Opcode
    pub op: u8,
    /// Event data
    #[serde(default)]
    pub d: Value,
    /// Sequence number, dispatches only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,
    /// Event name, dispatches only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,
}

impl GatewayPayload {
    /// Builds an outbound frame
    pub fn new(op: Opcode, d: impl Serialize) -> Result<Self, serde_json::Error> {
        Ok(Self {
            op: op as u8,
            d: serde_json::to_value(d)?,
            s: None,
            t: None,
        })
    }

    /// Heartbeat frame carrying the last sequence received (null before any dispatch)
    #[must_use]
    pub fn heartbeat(sequence: Option<u64>) -> Self {
        Self {
            op: Opcode::Heartbeat as u8,
            d: sequence.map_or(Value::Null, Value::from),
            s: None,
            t: None,
        }
    }

    /// Decoded opcode, or the raw value if unknown
    pub fn opcode(&self) -> Result<Opcode, u8> {
        Opcode::try_from(self.op)
    }
}

/// Data of the Hello frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hello {
    /// Heartbeat interval in milliseconds
    pub heartbeat_interval: u64,
}

/// Data of the Identify frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identify {
    /// Bot token
    pub token: String,
    /// Connection properties
    pub properties: ConnectionProperties,
    /// Payload compression (always false, this client speaks plain JSON)
    pub compress: bool,
    /// Member count above which offline members are not sent
    pub large_threshold: u8,
    /// Gateway intents
    pub intents: u64,
    /// Shard as `[shard_id, num_shards]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shard: Option<[u32; 2]>,
}

/// Connection properties sent in Identify
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionProperties {
    /// Operating system
    pub os: String,
    /// Library name
    pub browser: String,
    /// Library name
    pub device: String,
}

impl Default for ConnectionProperties {
    fn default() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            browser: "discord-rs".to_string(),
            device: "discord-rs".to_string(),
        }
    }
}

/// Data of the Resume frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resume {
    /// Bot token
    pub token: String,
    /// Session ID from READY
    pub session_id: String,
    /// Last sequence number received
    pub seq: u64,
}

/// Data of the READY dispatch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ready {
    /// Gateway API version
    pub v: u8,
    /// The bot user
    pub user: CurrentUser,
    /// Guilds the bot is in; they arrive later as GUILD_CREATE
    #[serde(default)]
    pub guilds: Vec<UnavailableGuild>,
    /// Session ID, used for resuming
    pub session_id: String,
    /// URL to reconnect to when resuming
    pub resume_gateway_url: String,
    /// Shard as `[shard_id, num_shards]`
    #[serde(default)]
    pub shard: Option<[u32; 2]>,
}

/// Data of a PresenceUpdate frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceUpdate {
    /// Unix time in milliseconds since the client went idle
    pub since: Option<u64>,
    /// Activities, passed through as raw JSON
    pub activities: Vec<Value>,
    /// `online`, `dnd`, `idle`, `invisible` or `offline`
    pub status: String,
    /// Whether the client is AFK
    pub afk: bool,
}

impl PresenceUpdate {
    /// Presence with the given status and no activities
    #[must_use]
    pub fn status(status: impl Into<String>) -> Self {
        Self {
            since: None,
            activities: Vec::new(),
            status: status.into(),
            afk: false,
        }
    }
}

/// Gateway intents bitfield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Intents(u64);

impl Intents {
    /// Guild create/update/delete, roles, channels
    pub const GUILDS: Intents = Intents(1 << 0);
    /// Member add/update/remove (privileged)
    pub const GUILD_MEMBERS: Intents = Intents(1 << 1);
    /// Ban add/remove
    pub const GUILD_MODERATION: Intents = Intents(1 << 2);
    /// Messages in guild channels
    pub const GUILD_MESSAGES: Intents = Intents(1 << 9);
    /// Reactions in guild channels
    pub const GUILD_MESSAGE_REACTIONS: Intents = Intents(1 << 10);
    /// Direct messages
    pub const DIRECT_MESSAGES: Intents = Intents(1 << 12);
    /// Message content (privileged)
    pub const MESSAGE_CONTENT: Intents = Intents(1 << 15);

    /// No intents
    #[must_use]
    pub const fn empty() -> Self {
        Intents(0)
    }

    /// Raw bits
    #[must_use]
    pub const fn bits(&self) -> u64 {
        self.0
    }

    /// Intents from raw bits
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Intents(bits)
    }

    /// Whether every bit of `other` is set
    #[must_use]
    pub const fn contains(&self, other: Intents) -> bool {
        self.0 & other.0 == other.0
    }
}

impl Default for Intents {
    /// Non-privileged guild and direct message intents
    fn default() -> Self {
        Intents::GUILDS | Intents::GUILD_MESSAGES | Intents::DIRECT_MESSAGES
    }
}

impl BitOr for Intents {
    type Output = Intents;

    fn bitor(self, rhs: Self) -> Self::Output {
        Intents(self.0 | rhs.0)
    }
}

/// Classification of gateway close codes
pub mod close_code {
    /// Authentication failed: the token is invalid
    pub const AUTHENTICATION_FAILED: u16 = 4004;
    /// Invalid shard
    pub const INVALID_SHARD: u16 = 4010;
    /// Sharding required
    pub const SHARDING_REQUIRED: u16 = 4011;
    /// Invalid API version
    pub const INVALID_API_VERSION: u16 = 4012;
    /// Invalid intents
    pub const INVALID_INTENTS: u16 = 4013;
    /// Disallowed (privileged, not enabled) intents
    pub const DISALLOWED_INTENTS: u16 = 4014;
    /// Session timed out; a fresh Identify is needed
    pub const SESSION_TIMED_OUT: u16 = 4009;
    /// Invalid sequence sent when resuming
    pub const INVALID_SEQ: u16 = 4007;

    /// The connection must not be reopened
    #[must_use]
    pub fn is_fatal(code: u16) -> bool {
        matches!(code, AUTHENTICATION_FAILED | 4010..=4014)
    }

    /// The session cannot be resumed; reconnect with a fresh Identify
    #[must_use]
    pub fn requires_identify(code: u16) -> bool {
        matches!(code, 1000 | 1001 | INVALID_SEQ | SESSION_TIMED_OUT)
    }
}
