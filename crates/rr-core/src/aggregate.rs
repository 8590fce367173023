//! Cross-participant aggregation for one category.
//!
//! Each participant's results come from a [`ResultSource`]. Lookups are
//! independent and run on a rayon pool; once they have all finished, the
//! collected best rows are ranked by elapsed time.

use std::time::Duration;

use rayon::prelude::*;
use thiserror::Error;

use crate::category::{Category, CategoryNormalizer};
use crate::result::{ParticipantIdentity, ResultColumns, normalize_results};
use crate::selection::{BestResult, SelectionRules, best_in_category};
use crate::table::{Table, TableError};

/// Default per-lookup timeout.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Why a single participant lookup produced nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The source has no results for this participant.
    #[error("no results found")]
    NoData,
    /// The lookup did not finish within its timeout.
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    /// Network or protocol failure.
    #[error("transport error: {0}")]
    Transport(String),
    /// The source returned a table the engine cannot read.
    #[error("malformed table: {0}")]
    Malformed(#[from] TableError),
}

/// A provider of per-participant result tables.
///
/// Implementations must be safe to call from several threads at once and
/// must give up after `timeout`.
pub trait ResultSource: Sync {
    fn fetch_results(
        &self,
        identity: &ParticipantIdentity,
        timeout: Duration,
    ) -> Result<Table, LookupError>;
}

/// Aggregation errors. Per-participant failures are not errors.
#[derive(Debug, Error)]
pub enum AggregateError {
    /// A participant's results table is structurally broken.
    #[error("results for {participant} are malformed: {source}")]
    Malformed {
        participant: ParticipantIdentity,
        #[source]
        source: TableError,
    },
    /// The worker pool could not be created.
    #[error("failed to build lookup pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Aggregation settings.
#[derive(Debug, Clone)]
pub struct AggregateOptions {
    pub lookup_timeout: Duration,
    /// Concurrent lookups; `None` uses the global rayon pool.
    pub parallelism: Option<usize>,
    pub columns: ResultColumns,
    pub rules: SelectionRules,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            parallelism: None,
            columns: ResultColumns::default(),
            rules: SelectionRules::default(),
        }
    }
}

/// A participant left out of the aggregate, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skip {
    pub participant: ParticipantIdentity,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Lookup(LookupError),
    /// Results were found but none in the target category had a time.
    NoResultInCategory,
}

/// Ranked best results for one category.
#[derive(Debug, Clone)]
pub struct AggregateReport {
    pub category: Category,
    /// Fastest first; rows without a recorded time last.
    pub rows: Vec<BestResult>,
    pub skipped: Vec<Skip>,
}

impl AggregateReport {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

enum Outcome {
    Found(BestResult),
    Skipped(Skip),
}

/// Collects the best `category` result of each participant and ranks them.
pub fn aggregate(
    participants: &[ParticipantIdentity],
    category: Category,
    source: &dyn ResultSource,
    normalizer: &CategoryNormalizer,
    options: &AggregateOptions,
) -> Result<AggregateReport, AggregateError> {
    let lookup = |identity: &ParticipantIdentity| {
        lookup_participant(identity, category, source, normalizer, options)
    };

    let outcomes: Vec<Result<Outcome, AggregateError>> = match options.parallelism {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()?
            .install(|| participants.par_iter().map(lookup).collect()),
        None => participants.par_iter().map(lookup).collect(),
    };

    let mut rows = Vec::new();
    let mut skipped = Vec::new();
    for outcome in outcomes {
        match outcome? {
            Outcome::Found(best) => rows.push(best),
            Outcome::Skipped(skip) => {
                tracing::warn!(
                    participant = %skip.participant,
                    reason = ?skip.reason,
                    "skipping participant"
                );
                skipped.push(skip);
            }
        }
    }

    rank(&mut rows);
    tracing::info!(
        %category,
        participants = participants.len(),
        found = rows.len(),
        skipped = skipped.len(),
        "aggregated best results"
    );

    Ok(AggregateReport {
        category,
        rows,
        skipped,
    })
}

fn lookup_participant(
    identity: &ParticipantIdentity,
    category: Category,
    source: &dyn ResultSource,
    normalizer: &CategoryNormalizer,
    options: &AggregateOptions,
) -> Result<Outcome, AggregateError> {
    let skip = |reason| {
        Ok(Outcome::Skipped(Skip {
            participant: identity.clone(),
            reason,
        }))
    };

    let table = match source.fetch_results(identity, options.lookup_timeout) {
        Ok(table) => table,
        Err(LookupError::Malformed(source)) => {
            return Err(AggregateError::Malformed {
                participant: identity.clone(),
                source,
            });
        }
        Err(err) => return skip(SkipReason::Lookup(err)),
    };
    if table.is_empty() {
        return skip(SkipReason::Lookup(LookupError::NoData));
    }

    let rows = normalize_results(&table, &options.columns, normalizer).map_err(|source| {
        AggregateError::Malformed {
            participant: identity.clone(),
            source,
        }
    })?;

    match best_in_category(&rows, category, &options.rules) {
        Some(mut best) => {
            best.row.set_participant(identity, &options.columns);
            tracing::debug!(participant = %identity, time = best.row.time_text(), "found best result");
            Ok(Outcome::Found(best))
        }
        None => skip(SkipReason::NoResultInCategory),
    }
}

/// Stable sort by elapsed time with unrecorded times last.
fn rank(rows: &mut [BestResult]) {
    rows.sort_by_key(|best| (best.duration().is_none(), best.duration()));
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    use crate::result::tests::result_table;

    /// In-memory source keyed by given name.
    struct FakeSource {
        tables: HashMap<String, Result<Table, LookupError>>,
    }

    impl FakeSource {
        fn new(entries: Vec<(&str, Result<Table, LookupError>)>) -> Self {
            Self {
                tables: entries
                    .into_iter()
                    .map(|(name, table)| (name.to_string(), table))
                    .collect(),
            }
        }
    }

    impl ResultSource for FakeSource {
        fn fetch_results(
            &self,
            identity: &ParticipantIdentity,
            _timeout: Duration,
        ) -> Result<Table, LookupError> {
            self.tables
                .get(&identity.given_name)
                .cloned()
                .unwrap_or(Err(LookupError::NoData))
        }
    }

    fn people(names: &[&str]) -> Vec<ParticipantIdentity> {
        names
            .iter()
            .map(|n| ParticipantIdentity::new(*n, "runner"))
            .collect()
    }

    fn run(source: &FakeSource, names: &[&str], options: &AggregateOptions) -> AggregateReport {
        aggregate(
            &people(names),
            Category::TenK,
            source,
            &CategoryNormalizer::default(),
            options,
        )
        .unwrap()
    }

    #[test]
    fn failed_lookups_are_skipped_and_rest_ranked() {
        let source = FakeSource::new(vec![
            ("A", Ok(result_table(&[("10000", "01:30:00", "")]))),
            ("B", Err(LookupError::Timeout(DEFAULT_LOOKUP_TIMEOUT))),
            ("C", Ok(result_table(&[("10000", "01:25:00", "")]))),
        ]);
        let report = run(&source, &["A", "B", "C"], &AggregateOptions::default());

        let order: Vec<&str> = report
            .rows
            .iter()
            .map(|b| b.row.given_name.as_str())
            .collect();
        assert_eq!(order, vec!["C", "A"]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].participant.given_name, "B");
        assert_eq!(
            report.skipped[0].reason,
            SkipReason::Lookup(LookupError::Timeout(DEFAULT_LOOKUP_TIMEOUT))
        );
    }

    #[test]
    fn each_participant_contributes_only_their_best() {
        let source = FakeSource::new(vec![(
            "A",
            Ok(result_table(&[
                ("10000", "00:52:00", ""),
                ("10 קמ", "00:49:00", ""),
                ("5000", "00:20:00", ""),
            ])),
        )]);
        let report = run(&source, &["A"], &AggregateOptions::default());
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].row.time_text(), "00:49:00");
        // Name comes from the queried identity, not the results page.
        assert_eq!(report.rows[0].row.family_name, "runner");
    }

    #[test]
    fn no_rows_in_category_is_a_skip() {
        let source = FakeSource::new(vec![("A", Ok(result_table(&[("5000", "00:20:00", "")])))]);
        let report = run(&source, &["A"], &AggregateOptions::default());
        assert!(report.is_empty());
        assert_eq!(report.skipped[0].reason, SkipReason::NoResultInCategory);
    }

    #[test]
    fn all_failures_yield_empty_report() {
        let source = FakeSource::new(vec![(
            "A",
            Err(LookupError::Transport("connection reset".to_string())),
        )]);
        let report = run(&source, &["A", "Z"], &AggregateOptions::default());
        assert!(report.is_empty());
        assert_eq!(report.skipped.len(), 2);
    }

    #[test]
    fn empty_participant_list_is_empty_report() {
        let source = FakeSource::new(vec![]);
        let report = run(&source, &[], &AggregateOptions::default());
        assert!(report.is_empty());
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn malformed_table_is_fatal() {
        let broken = Table::new(vec!["שם".to_string()], vec![vec!["x".to_string()]]).unwrap();
        let source = FakeSource::new(vec![("A", Ok(broken))]);
        let err = aggregate(
            &people(&["A"]),
            Category::TenK,
            &source,
            &CategoryNormalizer::default(),
            &AggregateOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AggregateError::Malformed { .. }));
    }

    #[test]
    fn dedicated_pool_gives_same_ranking() {
        let source = FakeSource::new(vec![
            ("A", Ok(result_table(&[("10000", "00:50:00", "")]))),
            ("B", Ok(result_table(&[("10000", "00:40:00", "")]))),
            ("C", Ok(result_table(&[("10000", "00:45:00", "")]))),
        ]);
        let options = AggregateOptions {
            parallelism: Some(2),
            ..AggregateOptions::default()
        };
        let report = run(&source, &["A", "B", "C"], &options);
        let order: Vec<&str> = report
            .rows
            .iter()
            .map(|b| b.row.given_name.as_str())
            .collect();
        assert_eq!(order, vec!["B", "C", "A"]);
    }
}
