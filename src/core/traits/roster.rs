use crate::core::errors::Result;
use crate::core::models::ids::{GuildId, UserId};

/// Port for listing the human members of a community.
///
/// Bot accounts are filtered out behind this boundary; every ID the
/// core layer receives from a roster counts toward the report. Names
/// are not carried here; the resolver port owns those.
pub trait MemberRoster: Send + Sync {
    async fn members(&self, guild: GuildId) -> Result<Vec<UserId>>;
}
