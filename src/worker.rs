// Refresh scheduler: drives one collection pass per interval until shutdown.
// A failed pass is logged and retried on the next tick; the loop never exits on its own.

use crate::collector::{Collector, SnapshotSink, TickOutcome};
use crate::pbs_repo::CommandSource;
use std::sync::Arc;
use tokio::time::{Duration, interval};
use tracing::Instrument;

/// Collector, sinks, and shutdown for the worker.
pub struct WorkerDeps<S> {
    pub collector: Arc<Collector<S>>,
    pub sinks: Vec<Arc<dyn SnapshotSink>>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

/// Worker timing and logging config.
pub struct WorkerConfig {
    pub refresh_interval_ms: u64,
    /// How often to log collection stats (real seconds).
    pub stats_log_interval_secs: u64,
}

/// Running totals logged by the stats tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickStats {
    pub succeeded: u64,
    pub failed: u64,
    pub decode_issues: u64,
}

impl TickStats {
    fn record(&mut self, outcome: &TickOutcome) {
        match outcome {
            TickOutcome::Published { decode_issues } => {
                self.succeeded += 1;
                self.decode_issues += *decode_issues as u64;
            }
            TickOutcome::Failed { .. } => self.failed += 1,
        }
    }
}

/// Spawns the refresh loop. The first pass runs immediately. Resolves with
/// the accumulated tick stats once `shutdown_rx` fires (or its sender drops).
pub fn spawn<S>(deps: WorkerDeps<S>, config: WorkerConfig) -> tokio::task::JoinHandle<TickStats>
where
    S: CommandSource + 'static,
{
    let WorkerDeps {
        collector,
        sinks,
        mut shutdown_rx,
    } = deps;
    let WorkerConfig {
        refresh_interval_ms,
        stats_log_interval_secs,
    } = config;

    tokio::spawn(async move {
        let mut tick = interval(Duration::from_millis(refresh_interval_ms));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut stats_log_tick = interval(Duration::from_secs(stats_log_interval_secs));
        stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // interval() fires immediately; skip the empty stats line at startup.
        stats_log_tick.tick().await;

        let mut stats = TickStats::default();

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    let outcome = collector.refresh(&sinks).await;
                    stats.record(&outcome);
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Worker shutting down");
                    break;
                }
                _ = stats_log_tick.tick() => {
                    tracing::info!(
                        passes_succeeded = stats.succeeded,
                        passes_failed = stats.failed,
                        decode_issues = stats.decode_issues,
                        "collection stats"
                    );
                }
            }
        }
        stats
    }
    .instrument(tracing::debug_span!("worker", refresh_interval_ms)))
}
