use crate::core::models::ids::UserId;
use crate::core::models::snowflake::Snowflake;

/// The slice of a message the audit cares about: who wrote it and when.
///
/// The ID doubles as the "when". Snowflakes embed their creation time,
/// so no separate timestamp travels with the stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageStamp {
    pub id: Snowflake,
    pub author: UserId,
    pub author_is_bot: bool,
}
