use crate::constants::DISCORD_EPOCH_MS;
use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A Discord snowflake ID
///
/// Every Discord object (user, channel, message, guild) is identified by a
/// 64-bit snowflake that embeds its creation time.
/// Reference: <https://discord.com/developers/docs/reference#snowflakes>
///
/// ```
/// use discord_rs::utils::snowflake::Snowflake;
/// let snowflake = Snowflake::from_bits(782164174821523467).unwrap();
/// assert_eq!(snowflake.timestamp().timestamp_millis(), 1606552871185);
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Snowflake(u64);

impl Snowflake {
    /// Decodes a raw snowflake, checking that its timestamp is representable
    pub fn from_bits(bits: u64) -> Result<Self, AppError> {
        let timestamp_ms = (bits >> 22) + DISCORD_EPOCH_MS;
        let timestamp_ms = i64::try_from(timestamp_ms).map_err(|_| AppError::InvalidSnowflake(bits))?;
        if DateTime::<Utc>::from_timestamp_millis(timestamp_ms).is_none() {
            return Err(AppError::InvalidSnowflake(bits));
        }
        Ok(Self(bits))
    }

    /// Raw 64-bit value
    #[must_use]
    pub fn bits(&self) -> u64 {
        self.0
    }

    /// Creation time (42 high bits, milliseconds since the Discord epoch)
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        let millis = (self.0 >> 22) + DISCORD_EPOCH_MS;
        // from_bits already validated the range
        DateTime::<Utc>::from_timestamp_millis(millis as i64).unwrap_or_default()
    }

    /// Internal worker ID (5 bits)
    #[must_use]
    pub fn worker_id(&self) -> u8 {
        ((self.0 & 0x3E_0000) >> 17) as u8
    }

    /// Internal process ID (5 bits)
    #[must_use]
    pub fn process_id(&self) -> u8 {
        ((self.0 & 0x1_F000) >> 12) as u8
    }

    /// Per-process increment (12 bits)
    #[must_use]
    pub fn increment(&self) -> u16 {
        (self.0 & 0xFFF) as u16
    }
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Snowflake {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bits = s
            .parse::<u64>()
            .map_err(|e| AppError::InvalidInput(format!("snowflake {s:?}: {e}")))?;
        Self::from_bits(bits)
    }
}

impl From<Snowflake> for u64 {
    fn from(value: Snowflake) -> Self {
        value.0
    }
}

impl Serialize for Snowflake {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SnowflakeVisitor;

        impl Visitor<'_> for SnowflakeVisitor {
            type Value = Snowflake;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a snowflake as a string or integer")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Snowflake, E> {
                Snowflake::from_bits(v).map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Snowflake, E> {
                let v = u64::try_from(v).map_err(E::custom)?;
                self.visit_u64(v)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Snowflake, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(SnowflakeVisitor)
    }
}
