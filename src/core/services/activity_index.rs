use std::collections::{BTreeMap, HashMap};

use crate::core::models::ids::UserId;
use crate::core::models::member::MembershipSnapshot;
use crate::core::models::message::MessageStamp;
use crate::core::models::report::ActivityReport;
use crate::core::models::snowflake::Snowflake;

/// Accumulates the highest message ID seen per member.
///
/// Because snowflakes are time-ordered, "highest ID" and "most recent
/// activity" are the same thing. Observation order is irrelevant: the
/// index converges to the same maximum whether pages arrive newest
/// first, oldest first, or twice over.
#[derive(Debug)]
pub struct ActivityIndex {
    members: MembershipSnapshot,
    latest: HashMap<UserId, Snowflake>,
}

impl ActivityIndex {
    /// The snapshot decides whose messages count and who gets a row.
    pub fn new(members: MembershipSnapshot) -> Self {
        Self {
            members,
            latest: HashMap::new(),
        }
    }

    /// Record one message. Bot authors and authors outside the
    /// membership snapshot are ignored.
    pub fn observe(&mut self, stamp: &MessageStamp) {
        if stamp.author_is_bot || !self.members.contains(stamp.author) {
            return;
        }

        match self.latest.get_mut(&stamp.author) {
            Some(latest) => {
                if stamp.id > *latest {
                    *latest = stamp.id;
                }
            }
            None => {
                self.latest.insert(stamp.author, stamp.id);
            }
        }
    }

    /// Close the index: every snapshot member gets exactly one entry,
    /// with `None` for those who never posted.
    pub fn finalize(self) -> ActivityReport {
        let mut entries = BTreeMap::new();
        for member in self.members.iter() {
            entries.insert(member, self.latest.get(&member).copied());
        }
        ActivityReport::new(entries)
    }
}
