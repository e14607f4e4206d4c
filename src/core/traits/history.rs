use crate::core::errors::Result;
use crate::core::models::ids::ChannelId;
use crate::core::models::message::MessageStamp;
use crate::core::models::snowflake::Snowflake;

/// Port for reading one channel's message history backward.
pub trait HistorySource: Send + Sync {
    /// Up to `limit` messages with IDs strictly below `before`,
    /// newest first. An empty page means the history is exhausted.
    async fn messages_before(
        &self,
        channel: ChannelId,
        before: Snowflake,
        limit: u8,
    ) -> Result<Vec<MessageStamp>>;
}
