use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::core::models::ids::UserId;
use crate::core::models::snowflake::Snowflake;

/// The finished activity index: one entry per snapshot member.
///
/// `None` is the sentinel for members with no message anywhere in the
/// walked history. Entries are keyed in ID order so downstream
/// consumers see a deterministic sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityReport {
    entries: BTreeMap<UserId, Option<Snowflake>>,
}

impl ActivityReport {
    pub fn new(entries: BTreeMap<UserId, Option<Snowflake>>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> impl Iterator<Item = (UserId, Option<Snowflake>)> + '_ {
        self.entries.iter().map(|(&id, &last)| (id, last))
    }

    /// Outer `None`: not a snapshot member. Inner `None`: the sentinel.
    #[allow(dead_code)]
    pub fn last_seen(&self, member: UserId) -> Option<Option<Snowflake>> {
        self.entries.get(&member).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One row of the exported report, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub name: String,
    pub last_seen: Option<DateTime<Utc>>,
}
