use crate::core::errors::Result;
use crate::core::models::community::{Channel, Community};
use crate::core::models::ids::GuildId;

/// Port for discovering communities and their channels.
///
/// Implementations live in `adapters::gateway`. The core layer only
/// depends on this trait, never on a concrete transport.
pub trait CommunityDirectory: Send + Sync {
    /// Every community the authenticated bot is a member of.
    async fn communities(&self) -> Result<Vec<Community>>;

    /// The text channels of one community. Non-text channels never
    /// appear here.
    async fn channels(&self, guild: GuildId) -> Result<Vec<Channel>>;

    /// Whether the bot may both view this channel and read its history.
    ///
    /// Channels failing this check are skipped by the crawl, not walked
    /// blind into permission errors.
    async fn can_read_history(&self, channel: &Channel) -> Result<bool>;
}
