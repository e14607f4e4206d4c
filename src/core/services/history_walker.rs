use std::time::Duration;

use chrono::Utc;

use crate::core::errors::Result;
use crate::core::models::ids::ChannelId;
use crate::core::models::message::MessageStamp;
use crate::core::models::snowflake::Snowflake;
use crate::core::traits::history::HistorySource;

/// Messages requested per page, the platform maximum.
pub const PAGE_SIZE: u8 = 100;

/// Counters for one channel walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    pub pages: u32,
    pub messages: u64,
}

/// Walks one channel's history from "now" back to its first message.
///
/// The cursor is a synthetic snowflake for the current instant; each
/// page is fetched strictly below it, then the cursor drops to the
/// oldest ID on the page. Two conditions end the walk: an empty page
/// (history exhausted) and a page whose floor fails to move the cursor
/// (a misbehaving source that would otherwise loop forever).
pub struct HistoryWalker<'a, H> {
    source: &'a H,
    politeness: Duration,
}

impl<'a, H: HistorySource> HistoryWalker<'a, H> {
    /// `politeness` is slept between consecutive page fetches so a long
    /// walk does not hammer the API. The final page pays no delay.
    pub fn new(source: &'a H, politeness: Duration) -> Self {
        Self { source, politeness }
    }

    /// Feed every message in the channel to `sink`, newest first.
    ///
    /// Messages on a page are always delivered before the termination
    /// checks run, so even a non-advancing final page contributes its
    /// observations exactly once.
    pub async fn drain<F>(&self, channel: ChannelId, mut sink: F) -> Result<WalkStats>
    where
        F: FnMut(&MessageStamp),
    {
        let mut marker = Snowflake::from_datetime(Utc::now());
        let mut stats = WalkStats::default();

        loop {
            let page = self.source.messages_before(channel, marker, PAGE_SIZE).await?;
            stats.pages += 1;

            let Some(floor) = page.iter().map(|stamp| stamp.id).min() else {
                break; // empty page: nothing older than the marker
            };

            for stamp in &page {
                sink(stamp);
            }
            stats.messages += page.len() as u64;

            if floor >= marker {
                break; // cursor did not advance
            }
            marker = floor;

            if !self.politeness.is_zero() {
                tokio::time::sleep(self.politeness).await;
            }
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Instant;

    use super::*;
    use crate::core::models::ids::UserId;
    use crate::core::models::member::MembershipSnapshot;
    use crate::core::services::activity_index::ActivityIndex;

    fn stamp(id: u64, author: u64) -> MessageStamp {
        MessageStamp {
            id: Snowflake::new(id),
            author: UserId(Snowflake::new(author)),
            author_is_bot: false,
        }
    }

    /// Serves a fixed history the way the real API does: strictly below
    /// `before`, newest first, at most `limit` per page.
    struct ScriptedSource {
        history: Vec<MessageStamp>,
        fetches: AtomicU32,
    }

    impl ScriptedSource {
        fn new(mut history: Vec<MessageStamp>) -> Self {
            history.sort_by(|a, b| b.id.cmp(&a.id));
            Self {
                history,
                fetches: AtomicU32::new(0),
            }
        }

        fn fetches(&self) -> u32 {
            self.fetches.load(Ordering::Relaxed)
        }
    }

    impl HistorySource for ScriptedSource {
        async fn messages_before(
            &self,
            _channel: ChannelId,
            before: Snowflake,
            limit: u8,
        ) -> Result<Vec<MessageStamp>> {
            self.fetches.fetch_add(1, Ordering::Relaxed);
            Ok(self
                .history
                .iter()
                .filter(|stamp| stamp.id < before)
                .take(limit as usize)
                .copied()
                .collect())
        }
    }

    /// Misbehaving source: always returns the same page, no matter what
    /// `before` says.
    struct EchoSource {
        page: Vec<MessageStamp>,
        fetches: AtomicU32,
    }

    impl HistorySource for EchoSource {
        async fn messages_before(
            &self,
            _channel: ChannelId,
            _before: Snowflake,
            _limit: u8,
        ) -> Result<Vec<MessageStamp>> {
            self.fetches.fetch_add(1, Ordering::Relaxed);
            Ok(self.page.clone())
        }
    }

    fn channel() -> ChannelId {
        ChannelId(Snowflake::new(555))
    }

    #[tokio::test]
    async fn empty_channel_costs_one_fetch_and_yields_nothing() {
        let source = ScriptedSource::new(Vec::new());
        let walker = HistoryWalker::new(&source, Duration::ZERO);

        let mut seen = Vec::new();
        let stats = walker.drain(channel(), |s| seen.push(*s)).await.unwrap();

        assert_eq!(source.fetches(), 1);
        assert_eq!(stats, WalkStats { pages: 1, messages: 0 });
        assert!(seen.is_empty());
    }

    #[tokio::test]
    async fn paginates_150_messages_as_100_plus_50() {
        let history: Vec<MessageStamp> = (1..=150).map(|i| stamp(i * 1000, i)).collect();
        let source = ScriptedSource::new(history);
        let walker = HistoryWalker::new(&source, Duration::ZERO);

        let mut seen = Vec::new();
        let stats = walker.drain(channel(), |s| seen.push(*s)).await.unwrap();

        // 100, then 50, then the empty page that proves exhaustion.
        assert_eq!(source.fetches(), 3);
        assert_eq!(stats, WalkStats { pages: 3, messages: 150 });
        assert_eq!(seen.len(), 150);

        let oldest = Snowflake::new(1000);
        assert_eq!(seen.iter().filter(|s| s.id == oldest).count(), 1);
        assert_eq!(seen.last().map(|s| s.id), Some(oldest));
    }

    #[tokio::test]
    async fn a_polite_walk_pauses_between_pages_and_reports_the_maxima() {
        // Member 7 only ever posted the oldest message; it must reach
        // the report from the final short page.
        let history: Vec<MessageStamp> = (1..=150)
            .map(|i| stamp(i * 1000, if i == 1 { 7 } else { 1 }))
            .collect();
        let source = ScriptedSource::new(history);
        let politeness = Duration::from_millis(50);
        let walker = HistoryWalker::new(&source, politeness);

        let mut snapshot = MembershipSnapshot::new();
        snapshot.admit(UserId(Snowflake::new(1)));
        snapshot.admit(UserId(Snowflake::new(7)));
        let mut index = ActivityIndex::new(snapshot);

        let started = Instant::now();
        let stats = walker.drain(channel(), |s| index.observe(s)).await.unwrap();

        // Three fetches; the two that advance the cursor each pay the
        // delay, the empty final page does not.
        assert_eq!(stats, WalkStats { pages: 3, messages: 150 });
        assert!(started.elapsed() >= politeness * 2);

        let report = index.finalize();
        assert_eq!(
            report.last_seen(UserId(Snowflake::new(1))),
            Some(Some(Snowflake::new(150_000)))
        );
        assert_eq!(
            report.last_seen(UserId(Snowflake::new(7))),
            Some(Some(Snowflake::new(1000)))
        );
    }

    #[tokio::test]
    async fn exactly_one_page_costs_two_fetches() {
        let history: Vec<MessageStamp> = (1..=100).map(|i| stamp(i * 1000, i)).collect();
        let source = ScriptedSource::new(history);
        let walker = HistoryWalker::new(&source, Duration::ZERO);

        let stats = walker.drain(channel(), |_| {}).await.unwrap();

        assert_eq!(source.fetches(), 2);
        assert_eq!(stats.messages, 100);
    }

    #[tokio::test]
    async fn non_advancing_floor_terminates_after_processing_the_page() {
        let page = vec![stamp(9000, 1), stamp(8000, 2)];
        let source = EchoSource {
            page,
            fetches: AtomicU32::new(0),
        };
        let walker = HistoryWalker::new(&source, Duration::ZERO);

        let mut seen = Vec::new();
        walker.drain(channel(), |s| seen.push(*s)).await.unwrap();

        // First fetch advances the cursor to 8000; the second returns
        // the same floor and trips the guard instead of looping.
        assert_eq!(source.fetches.load(Ordering::Relaxed), 2);
        assert_eq!(seen.len(), 4);
    }

    #[tokio::test]
    async fn page_echoing_the_marker_itself_stops_immediately() {
        struct MarkerEcho;

        impl HistorySource for MarkerEcho {
            async fn messages_before(
                &self,
                _channel: ChannelId,
                before: Snowflake,
                _limit: u8,
            ) -> Result<Vec<MessageStamp>> {
                Ok(vec![MessageStamp {
                    id: before,
                    author: UserId(Snowflake::new(1)),
                    author_is_bot: false,
                }])
            }
        }

        let walker = HistoryWalker::new(&MarkerEcho, Duration::ZERO);
        let mut seen = 0u32;
        let stats = walker.drain(channel(), |_| seen += 1).await.unwrap();

        assert_eq!(stats.pages, 1);
        assert_eq!(seen, 1);
    }

    #[tokio::test]
    async fn source_errors_abort_the_walk() {
        struct FailingSource;

        impl HistorySource for FailingSource {
            async fn messages_before(
                &self,
                _channel: ChannelId,
                _before: Snowflake,
                _limit: u8,
            ) -> Result<Vec<MessageStamp>> {
                Err(crate::core::errors::RollcallError::ApiRequest {
                    context: "fetching messages".into(),
                    reason: "connection reset".into(),
                })
            }
        }

        let walker = HistoryWalker::new(&FailingSource, Duration::ZERO);
        let result = walker.drain(channel(), |_| {}).await;

        assert!(result.is_err());
    }
}
