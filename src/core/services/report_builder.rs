use crate::core::models::report::{ActivityReport, ReportRow};
use crate::core::traits::resolver::NameResolver;

/// Rows plus a count of names that fell back to a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltReport {
    pub rows: Vec<ReportRow>,
    pub unresolved: usize,
}

/// Turns a finished [`ActivityReport`] into printable rows.
///
/// Every snapshot member gets exactly one row no matter what the
/// resolver does: a failed lookup substitutes `unknown-<id>` instead of
/// dropping the row or aborting the export.
pub struct ReportBuilder<'a, R> {
    resolver: &'a R,
}

impl<'a, R: NameResolver> ReportBuilder<'a, R> {
    pub fn new(resolver: &'a R) -> Self {
        Self { resolver }
    }

    /// Resolve every member's display name and sort rows by it.
    ///
    /// The sort is stable over the report's ID order, so members
    /// sharing a display name still come out in a deterministic order.
    pub async fn build(&self, report: &ActivityReport) -> BuiltReport {
        let mut rows = Vec::with_capacity(report.len());
        let mut unresolved = 0;

        for (member, last) in report.entries() {
            let name = match self.resolver.display_name(member).await {
                Ok(name) => name,
                Err(_) => {
                    unresolved += 1;
                    format!("unknown-{member}")
                }
            };
            rows.push(ReportRow {
                name,
                last_seen: last.map(|id| id.timestamp()),
            });
        }

        rows.sort_by(|a, b| a.name.cmp(&b.name));
        BuiltReport { rows, unresolved }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::collections::HashMap;

    use super::*;
    use crate::core::errors::{Result, RollcallError};
    use crate::core::models::ids::UserId;
    use crate::core::models::snowflake::Snowflake;

    struct FakeResolver {
        names: HashMap<UserId, String>,
    }

    impl FakeResolver {
        fn new(pairs: &[(u64, &str)]) -> Self {
            Self {
                names: pairs
                    .iter()
                    .map(|&(id, name)| (user(id), name.to_string()))
                    .collect(),
            }
        }
    }

    impl NameResolver for FakeResolver {
        async fn display_name(&self, id: UserId) -> Result<String> {
            self.names
                .get(&id)
                .cloned()
                .ok_or_else(|| RollcallError::ApiStatus {
                    context: format!("resolving user {id}"),
                    status: 404,
                    detail: "Unknown User".into(),
                })
        }
    }

    fn user(raw: u64) -> UserId {
        UserId(Snowflake::new(raw))
    }

    fn report(entries: &[(u64, Option<u64>)]) -> ActivityReport {
        let entries: BTreeMap<UserId, Option<Snowflake>> = entries
            .iter()
            .map(|&(id, last)| (user(id), last.map(Snowflake::new)))
            .collect();
        ActivityReport::new(entries)
    }

    #[tokio::test]
    async fn rows_come_out_sorted_by_name() {
        let resolver = FakeResolver::new(&[(1, "zoe"), (2, "amir"), (3, "mina")]);
        let builder = ReportBuilder::new(&resolver);

        let built = builder
            .build(&report(&[(1, Some(100)), (2, Some(200)), (3, None)]))
            .await;

        let names: Vec<&str> = built.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["amir", "mina", "zoe"]);
        assert_eq!(built.unresolved, 0);
    }

    #[tokio::test]
    async fn failed_lookups_become_placeholder_rows() {
        let resolver = FakeResolver::new(&[(1, "zoe")]);
        let builder = ReportBuilder::new(&resolver);

        let built = builder
            .build(&report(&[(1, Some(100)), (42, Some(200))]))
            .await;

        assert_eq!(built.rows.len(), 2);
        assert_eq!(built.unresolved, 1);
        assert!(built.rows.iter().any(|r| r.name == "unknown-42"));
    }

    #[tokio::test]
    async fn sentinel_entries_carry_no_timestamp() {
        let resolver = FakeResolver::new(&[(1, "zoe")]);
        let builder = ReportBuilder::new(&resolver);

        let built = builder.build(&report(&[(1, None)])).await;

        assert_eq!(built.rows[0].last_seen, None);
    }

    #[tokio::test]
    async fn recorded_ids_decode_to_their_message_timestamps() {
        let resolver = FakeResolver::new(&[(1, "zoe")]);
        let builder = ReportBuilder::new(&resolver);

        let id = 175_928_847_299_117_063;
        let built = builder.build(&report(&[(1, Some(id))])).await;

        assert_eq!(
            built.rows[0].last_seen,
            Some(Snowflake::new(id).timestamp())
        );
    }
}
