use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::errors::RollcallError;

/// Milliseconds between the Unix epoch and Discord's epoch (2015-01-01T00:00:00Z).
pub const DISCORD_EPOCH_MS: i64 = 1_420_070_400_000;

/// The creation timestamp occupies the bits above the worker/process/sequence fields.
const TIMESTAMP_SHIFT: u32 = 22;

/// A Discord snowflake: a 64-bit, time-ordered identifier.
///
/// The high 42 bits hold milliseconds since [`DISCORD_EPOCH_MS`], so
/// snowflakes compare in creation order as plain integers. That property
/// is what the whole audit rests on: the largest message ID per author
/// is that author's most recent activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Snowflake(u64);

impl Snowflake {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Build a synthetic snowflake whose timestamp field encodes `at`.
    ///
    /// Used as the initial pagination marker: every real message ID is
    /// strictly below the snowflake for "now". Instants before the
    /// Discord epoch clamp to zero, and instants past the 42-bit
    /// horizon clamp to the maximum encodable value.
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        let offset_ms = at.timestamp_millis() - DISCORD_EPOCH_MS;
        if offset_ms < 0 {
            return Self(0);
        }
        let clamped = (offset_ms as u64).min(u64::MAX >> TIMESTAMP_SHIFT);
        Self(clamped << TIMESTAMP_SHIFT)
    }

    /// Milliseconds since the Unix epoch at which this ID was minted.
    pub fn timestamp_millis(self) -> i64 {
        ((self.0 >> TIMESTAMP_SHIFT) as i64) + DISCORD_EPOCH_MS
    }

    /// The UTC instant at which this ID was minted.
    pub fn timestamp(self) -> DateTime<Utc> {
        // The 42-bit timestamp field tops out in the year 2154, well
        // inside chrono's representable range.
        DateTime::from_timestamp_millis(self.timestamp_millis())
            .expect("snowflake timestamps always fit a chrono DateTime")
    }
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Snowflake {
    type Err = RollcallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>()
            .map(Self)
            .map_err(|_| RollcallError::InvalidSnowflake { input: s.into() })
    }
}

impl Serialize for Snowflake {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Discord serializes IDs as strings to survive JSON number precision.
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SnowflakeVisitor;

        impl Visitor<'_> for SnowflakeVisitor {
            type Value = Snowflake;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a decimal string or unsigned 64-bit integer")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse::<u64>().map(Snowflake).map_err(de::Error::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(Snowflake(v))
            }
        }

        deserializer.deserialize_any(SnowflakeVisitor)
    }
}
