use crate::core::errors::Result;
use crate::core::models::ids::UserId;

/// Port for turning a user ID into something a human recognizes.
///
/// Resolution runs once per report row, after the crawl. A failure
/// here is a cosmetic problem, never a fatal one; callers substitute
/// a placeholder and keep the row.
pub trait NameResolver: Send + Sync {
    async fn display_name(&self, user: UserId) -> Result<String>;
}
