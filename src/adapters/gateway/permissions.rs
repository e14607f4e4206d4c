use std::collections::HashMap;

use crate::core::models::ids::UserId;
use crate::core::models::snowflake::Snowflake;

use super::payloads::{ApiOverwrite, OVERWRITE_KIND_MEMBER, OVERWRITE_KIND_ROLE};

pub const ADMINISTRATOR: u64 = 1 << 3;
pub const VIEW_CHANNEL: u64 = 1 << 10;
pub const READ_MESSAGE_HISTORY: u64 = 1 << 16;

/// Everything needed to answer "can the bot read this guild's channels"
/// without further round-trips: fetched once per guild, then applied to
/// each channel's overwrites locally.
#[derive(Debug, Clone)]
pub struct GuildAccess {
    pub guild: Snowflake,
    pub owner_id: Snowflake,
    /// Role ID to permission bits, including the @everyone role (whose
    /// ID equals the guild ID).
    pub role_permissions: HashMap<Snowflake, u64>,
    /// Roles held by the bot itself in this guild.
    pub own_roles: Vec<Snowflake>,
}

impl GuildAccess {
    /// Guild-level permissions before channel overwrites.
    ///
    /// The owner and anyone holding ADMINISTRATOR hold every permission
    /// and are immune to overwrites, which `u64::MAX` encodes compactly.
    pub fn base_permissions(&self, who: UserId) -> u64 {
        if who.0 == self.owner_id {
            return u64::MAX;
        }

        let everyone = self
            .role_permissions
            .get(&self.guild)
            .copied()
            .unwrap_or(0);
        let mut permissions = everyone;
        for role in &self.own_roles {
            permissions |= self.role_permissions.get(role).copied().unwrap_or(0);
        }

        if permissions & ADMINISTRATOR != 0 {
            return u64::MAX;
        }
        permissions
    }

    /// Apply one channel's overwrites in platform order: the @everyone
    /// overwrite first, then all matching role overwrites aggregated
    /// (denies before allows), then the member-specific overwrite.
    pub fn channel_permissions(
        &self,
        who: UserId,
        base: u64,
        overwrites: &[ApiOverwrite],
    ) -> u64 {
        if base == u64::MAX {
            return base; // owner/administrator: overwrites don't apply
        }

        let mut permissions = base;

        if let Some(everyone) = overwrites
            .iter()
            .find(|ow| ow.kind == OVERWRITE_KIND_ROLE && ow.id == self.guild)
        {
            permissions &= !everyone.deny;
            permissions |= everyone.allow;
        }

        let mut allow = 0;
        let mut deny = 0;
        for ow in overwrites {
            if ow.kind == OVERWRITE_KIND_ROLE
                && ow.id != self.guild
                && self.own_roles.contains(&ow.id)
            {
                allow |= ow.allow;
                deny |= ow.deny;
            }
        }
        permissions &= !deny;
        permissions |= allow;

        if let Some(member) = overwrites
            .iter()
            .find(|ow| ow.kind == OVERWRITE_KIND_MEMBER && ow.id == who.0)
        {
            permissions &= !member.deny;
            permissions |= member.allow;
        }

        permissions
    }
}

/// Both bits the history walk needs.
pub fn can_read_history(permissions: u64) -> bool {
    const NEEDED: u64 = VIEW_CHANNEL | READ_MESSAGE_HISTORY;
    permissions & NEEDED == NEEDED
}
