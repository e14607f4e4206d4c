use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::core::errors::{Result, RollcallError};
use crate::core::models::member::MembershipSnapshot;
use crate::core::models::report::ActivityReport;
use crate::core::services::activity_index::ActivityIndex;
use crate::core::services::history_walker::HistoryWalker;
use crate::core::traits::directory::CommunityDirectory;
use crate::core::traits::history::HistorySource;
use crate::core::traits::roster::MemberRoster;

/// What a finished crawl returns alongside the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlOutcome {
    pub report: ActivityReport,
    pub members: usize,
    pub channels_walked: usize,
    /// `community/#channel` labels of channels skipped for lack of
    /// history access.
    pub skipped: Vec<String>,
    pub messages_seen: u64,
}

/// Exclusive right to crawl, released when dropped.
///
/// The release lives in `Drop`, so the flag is freed on every exit
/// path, including error returns and panic unwinds.
struct CrawlPermit<'a> {
    flag: &'a AtomicBool,
}

impl Drop for CrawlPermit<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Orchestrates a full activity crawl: the membership snapshot comes
/// first, then every readable channel is walked into one merged report.
///
/// A crawler admits one crawl at a time. A `run` that arrives while
/// another is active fails immediately with
/// [`RollcallError::CrawlInProgress`]; requests are rejected, never
/// queued.
pub struct Crawler<'a, G> {
    gateway: &'a G,
    politeness: Duration,
    busy: AtomicBool,
}

impl<'a, G> Crawler<'a, G>
where
    G: CommunityDirectory + MemberRoster + HistorySource,
{
    pub fn new(gateway: &'a G, politeness: Duration) -> Self {
        Self {
            gateway,
            politeness,
            busy: AtomicBool::new(false),
        }
    }

    fn acquire(&self) -> Result<CrawlPermit<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .map_err(|_| RollcallError::CrawlInProgress)?;
        Ok(CrawlPermit { flag: &self.busy })
    }

    /// Walk everything. Any transport failure aborts the whole crawl;
    /// partial results are discarded, never returned.
    pub async fn run(&self) -> Result<CrawlOutcome> {
        let _permit = self.acquire()?;

        let communities = self.gateway.communities().await?;

        // Membership is frozen before any history is read. Whoever is a
        // member right now gets a row; later joins and leaves don't.
        let mut snapshot = MembershipSnapshot::new();
        for community in &communities {
            for member in self.gateway.members(community.id).await? {
                snapshot.admit(member);
            }
        }

        // An empty snapshot can't produce rows; skip the walks.
        if snapshot.is_empty() {
            return Ok(CrawlOutcome {
                report: ActivityReport::default(),
                members: 0,
                channels_walked: 0,
                skipped: Vec::new(),
                messages_seen: 0,
            });
        }

        let members = snapshot.len();
        let mut index = ActivityIndex::new(snapshot);
        let walker = HistoryWalker::new(self.gateway, self.politeness);

        let mut channels_walked = 0;
        let mut skipped = Vec::new();
        let mut messages_seen = 0;

        for community in &communities {
            for channel in self.gateway.channels(community.id).await? {
                if !self.gateway.can_read_history(&channel).await? {
                    skipped.push(format!("{}/#{}", community.name, channel.name));
                    continue;
                }
                let stats = walker
                    .drain(channel.id, |stamp| index.observe(stamp))
                    .await?;
                channels_walked += 1;
                messages_seen += stats.messages;
            }
        }

        Ok(CrawlOutcome {
            report: index.finalize(),
            members,
            channels_walked,
            skipped,
            messages_seen,
        })
    }
}
