// Collection pass: run every scheduler query, parse, build one snapshot.
// Any query failure abandons the whole pass; sinks only ever see complete snapshots.

use std::sync::Arc;

use tracing::instrument;

use crate::models::ClusterSnapshot;
use crate::parsers::{
    LineIssue, Parsed, parse_job_count, parse_job_states, parse_node_states, parse_resources,
    parse_user_usage,
};
use crate::pbs_repo::{CommandError, CommandSource, QueryKind};

/// Receives each complete snapshot. Implementations swap their state whole.
pub trait SnapshotSink: Send + Sync {
    fn publish(&self, snapshot: &Arc<ClusterSnapshot>);

    /// Called when a pass is abandoned; published state must stay as it was.
    fn record_failure(&self, _stage: QueryKind) {}
}

#[derive(Debug, thiserror::Error)]
#[error("{stage} query failed: {source}")]
pub struct CollectError {
    pub stage: QueryKind,
    #[source]
    pub source: CommandError,
}

/// Result of one scheduler tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Published { decode_issues: usize },
    Failed { stage: QueryKind },
}

pub struct Collector<S> {
    source: S,
    job_header_lines: u64,
}

impl<S: CommandSource> Collector<S> {
    pub fn new(source: S, job_header_lines: u64) -> Self {
        Self {
            source,
            job_header_lines,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Runs one pass and publishes to every sink on success.
    pub async fn refresh(&self, sinks: &[Arc<dyn SnapshotSink>]) -> TickOutcome {
        match self.collect_once().await {
            Ok((snapshot, decode_issues)) => {
                let snapshot = Arc::new(snapshot);
                for sink in sinks {
                    sink.publish(&snapshot);
                }
                tracing::debug!(
                    operation = "refresh",
                    jobs = snapshot.job_total,
                    nodes = snapshot.node_total,
                    users = snapshot.usage_by_user.len(),
                    decode_issues,
                    "snapshot published"
                );
                TickOutcome::Published { decode_issues }
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    operation = "refresh",
                    stage = %e.stage,
                    "collection pass abandoned; keeping previous snapshot"
                );
                for sink in sinks {
                    sink.record_failure(e.stage);
                }
                TickOutcome::Failed { stage: e.stage }
            }
        }
    }

    /// Builds a snapshot stamped with the current time. Also returns how many
    /// decoding issues were logged along the way.
    pub async fn collect_once(&self) -> Result<(ClusterSnapshot, usize), CollectError> {
        self.collect_at(now_millis()).await
    }

    #[instrument(skip(self), fields(operation = "collect"))]
    pub async fn collect_at(
        &self,
        collected_at: u64,
    ) -> Result<(ClusterSnapshot, usize), CollectError> {
        let mut snapshot = ClusterSnapshot::new(collected_at);
        let mut issues = 0;

        let text = self.query(QueryKind::JobCount).await?;
        snapshot.job_total =
            take(QueryKind::JobCount, parse_job_count(&text, self.job_header_lines), &mut issues);

        let text = self.query(QueryKind::NodeDescription).await?;
        let totals = take(QueryKind::NodeDescription, parse_resources(&text), &mut issues);
        snapshot.memory_used_gb = totals.memory_assigned_gb;
        snapshot.memory_available_gb = totals.memory_available_gb;
        snapshot.cpu_assigned = totals.cpu_assigned;
        snapshot.cpu_available = totals.cpu_available;
        snapshot.cpu_total = totals.cpu_available;
        let tally = take(QueryKind::NodeDescription, parse_node_states(&text), &mut issues);
        snapshot.node_total = tally.node_total;
        snapshot.nodes_by_state = tally.by_state;

        let text = self.query(QueryKind::JobStateCounts).await?;
        snapshot.jobs_by_state =
            take(QueryKind::JobStateCounts, parse_job_states(&text), &mut issues);

        let text = self.query(QueryKind::JobDetail).await?;
        snapshot.usage_by_user = take(QueryKind::JobDetail, parse_user_usage(&text), &mut issues);

        Ok((snapshot, issues))
    }

    async fn query(&self, stage: QueryKind) -> Result<String, CollectError> {
        self.source
            .run(stage)
            .await
            .map_err(|source| CollectError { stage, source })
    }
}

/// Logs each decoding issue and hands back the parsed value.
fn take<T>(query: QueryKind, parsed: Parsed<T>, count: &mut usize) -> T {
    for LineIssue { line, issue } in &parsed.issues {
        tracing::warn!(
            query = %query,
            line,
            error = %issue,
            "could not decode value; counting it as zero"
        );
    }
    *count += parsed.issues.len();
    parsed.value
}

fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, operation = "get_timestamp", "system time error");
            0
        })
}
