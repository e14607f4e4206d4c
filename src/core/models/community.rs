use crate::core::models::ids::{ChannelId, GuildId};

/// A community (Discord guild) the bot can see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Community {
    pub id: GuildId,
    pub name: String,
}

/// A text channel inside a community.
///
/// Only message-bearing channels reach the core layer; the gateway
/// adapter filters out voice, category, and other channel kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: ChannelId,
    pub guild_id: GuildId,
    pub name: String,
}
