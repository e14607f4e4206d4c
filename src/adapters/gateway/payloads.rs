use serde::{Deserialize, Deserializer};

use crate::core::models::snowflake::Snowflake;

/// Partial structures for deserializing Discord REST responses.
///
/// Only the fields the crawl actually reads are modeled; everything
/// else in the payloads is ignored.

/// A user object as it appears on `/users/{id}` and inside messages
/// and member entries.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiUser {
    pub id: Snowflake,
    pub username: String,
    /// `"0"` for accounts migrated off the legacy `name#1234` scheme.
    #[serde(default)]
    pub discriminator: Option<String>,
    /// The server-agnostic display name, when the user set one.
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub bot: bool,
}

impl ApiUser {
    /// The name a reader of the report would recognize.
    ///
    /// Prefers the global display name, falls back to the legacy
    /// `name#discriminator` tag for accounts that still carry one.
    pub fn display_name(&self) -> String {
        if let Some(global) = &self.global_name {
            return global.clone();
        }
        match self.discriminator.as_deref() {
            Some("0") | Some("0000") | None => self.username.clone(),
            Some(tag) => format!("{}#{tag}", self.username),
        }
    }
}

/// One entry of `/users/@me/guilds`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiGuild {
    pub id: Snowflake,
    pub name: String,
}

/// The fuller guild object from `/guilds/{id}`, carrying what the
/// permission math needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiGuildDetail {
    pub id: Snowflake,
    pub owner_id: Snowflake,
    pub roles: Vec<ApiRole>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiRole {
    pub id: Snowflake,
    #[serde(deserialize_with = "permission_bits")]
    pub permissions: u64,
}

/// One entry of `/guilds/{id}/channels`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiChannel {
    pub id: Snowflake,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub permission_overwrites: Vec<ApiOverwrite>,
}

/// Guild text channel, the only kind with walkable history here.
pub const CHANNEL_KIND_TEXT: u8 = 0;

impl ApiChannel {
    pub fn is_text(&self) -> bool {
        self.kind == CHANNEL_KIND_TEXT
    }
}

/// A permission overwrite on a channel.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiOverwrite {
    pub id: Snowflake,
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(deserialize_with = "permission_bits")]
    pub allow: u64,
    #[serde(deserialize_with = "permission_bits")]
    pub deny: u64,
}

pub const OVERWRITE_KIND_ROLE: u8 = 0;
pub const OVERWRITE_KIND_MEMBER: u8 = 1;

/// One entry of `/guilds/{id}/members` (or `/members/@me`).
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMember {
    pub user: ApiUser,
    #[serde(default)]
    pub roles: Vec<Snowflake>,
}

/// One entry of `/channels/{id}/messages`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMessage {
    pub id: Snowflake,
    pub author: ApiUser,
}

/// The body Discord sends with HTTP 429.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiRateLimit {
    pub retry_after: f64,
}

/// Permission fields arrive as decimal strings (they outgrew the safe
/// JSON integer range years ago); old payloads may still use numbers.
fn permission_bits<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    struct BitsVisitor;

    impl serde::de::Visitor<'_> for BitsVisitor {
        type Value = u64;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            f.write_str("a permission bit set as a decimal string or integer")
        }

        fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<u64, E> {
            v.parse().map_err(serde::de::Error::custom)
        }

        fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<u64, E> {
            Ok(v)
        }
    }

    deserializer.deserialize_any(BitsVisitor)
}
