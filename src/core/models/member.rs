use std::collections::HashSet;

use crate::core::models::ids::UserId;

/// The set of member IDs frozen at crawl start.
///
/// Membership decides which message authors count and which rows appear
/// in the final report. Members joining mid-crawl are absent; members
/// leaving mid-crawl are still reported.
#[derive(Debug, Clone, Default)]
pub struct MembershipSnapshot {
    ids: HashSet<UserId>,
}

impl MembershipSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member. Returns false if they were already present, which
    /// is the normal case for members shared between communities.
    pub fn admit(&mut self, id: UserId) -> bool {
        self.ids.insert(id)
    }

    pub fn contains(&self, id: UserId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = UserId> + '_ {
        self.ids.iter().copied()
    }
}
