// Prometheus exposition of the published snapshot; publish and encode share one lock

use std::sync::{Arc, Mutex};

use prometheus::{Encoder, Gauge, GaugeVec, Opts, Registry, TextEncoder};

use crate::collector::SnapshotSink;
use crate::models::{ClusterSnapshot, JobState, NodeState};
use crate::pbs_repo::QueryKind;

struct Gauges {
    job_count: Gauge,
    node_count: Gauge,
    node_available: Gauge,
    node_down: Gauge,
    node_busy: Gauge,
    node_reserved: Gauge,
    node_offline: Gauge,
    node_drained: Gauge,
    node_unknown: Gauge,
    job_running: Gauge,
    job_queued: Gauge,
    job_held: Gauge,
    job_exiting: Gauge,
    memory_usage_gb: Gauge,
    memory_available_gb: Gauge,
    cpu_assigned: Gauge,
    cpu_available: Gauge,
    cpu_total: Gauge,
    user_memory_usage_gb: GaugeVec,
    user_cpu_usage: GaugeVec,
    job_states: GaugeVec,
    node_states: GaugeVec,
    scrape_success: Gauge,
    last_success_timestamp: Gauge,
}

pub struct MetricsRegistry {
    registry: Registry,
    gauges: Mutex<Gauges>,
}

fn gauge(registry: &Registry, name: &str, help: &str) -> prometheus::Result<Gauge> {
    let g = Gauge::new(name, help)?;
    registry.register(Box::new(g.clone()))?;
    Ok(g)
}

fn gauge_vec(
    registry: &Registry,
    name: &str,
    help: &str,
    label: &str,
) -> prometheus::Result<GaugeVec> {
    let g = GaugeVec::new(Opts::new(name, help), &[label])?;
    registry.register(Box::new(g.clone()))?;
    Ok(g)
}

impl MetricsRegistry {
    /// Creates and registers every exporter gauge on a fresh registry.
    pub fn new() -> prometheus::Result<Self> {
        let r = Registry::new();
        let gauges = Gauges {
            job_count: gauge(&r, "openpbs_job_count", "Number of jobs in the queue")?,
            node_count: gauge(&r, "openpbs_node_count", "Number of nodes")?,
            node_available: gauge(&r, "openpbs_node_available", "Number of available nodes")?,
            node_down: gauge(&r, "openpbs_node_down", "Number of down nodes")?,
            node_busy: gauge(&r, "openpbs_node_busy", "Number of busy nodes")?,
            node_reserved: gauge(&r, "openpbs_node_reserved", "Number of reserved nodes")?,
            node_offline: gauge(&r, "openpbs_node_offline", "Number of offline nodes")?,
            node_drained: gauge(&r, "openpbs_node_drained", "Number of drained nodes")?,
            node_unknown: gauge(&r, "openpbs_node_unknown", "Number of unknown nodes")?,
            job_running: gauge(
                &r,
                "openpbs_job_running",
                "Number of jobs in the 'Running' state",
            )?,
            job_queued: gauge(
                &r,
                "openpbs_job_queued",
                "Number of jobs in the 'Queued' state",
            )?,
            job_held: gauge(&r, "openpbs_job_held", "Number of jobs in the 'Held' state")?,
            job_exiting: gauge(
                &r,
                "openpbs_job_exiting",
                "Number of jobs in the 'Exiting' state",
            )?,
            memory_usage_gb: gauge(
                &r,
                "openpbs_memory_usage_gb",
                "Total memory usage in the OpenPBS cluster in GB.",
            )?,
            memory_available_gb: gauge(
                &r,
                "openpbs_memory_available_gb",
                "Total memory available in the OpenPBS cluster in GB.",
            )?,
            cpu_assigned: gauge(
                &r,
                "openpbs_cpu_assigned_unit",
                "Total CPU usage in the OpenPBS cluster.",
            )?,
            cpu_available: gauge(
                &r,
                "openpbs_cpu_available_unit",
                "Total CPU available in the OpenPBS cluster.",
            )?,
            cpu_total: gauge(&r, "openpbs_cpu_total", "Total CPU in the OpenPBS cluster.")?,
            user_memory_usage_gb: gauge_vec(
                &r,
                "openpbs_user_memory_usage_gb",
                "Memory usage per user in the OpenPBS cluster in GB.",
                "user",
            )?,
            user_cpu_usage: gauge_vec(
                &r,
                "openpbs_user_cpu_usage",
                "CPU usage per user in the OpenPBS cluster.",
                "user",
            )?,
            job_states: gauge_vec(&r, "openpbs_job_states", "Number of jobs by state", "state")?,
            node_states: gauge_vec(
                &r,
                "openpbs_node_states",
                "Number of nodes by state",
                "state",
            )?,
            scrape_success: gauge(
                &r,
                "openpbs_scrape_success",
                "1 if the last collection pass succeeded, 0 otherwise.",
            )?,
            last_success_timestamp: gauge(
                &r,
                "openpbs_last_success_timestamp_seconds",
                "Unix time of the last successful collection pass.",
            )?,
        };
        Ok(Self {
            registry: r,
            gauges: Mutex::new(gauges),
        })
    }

    /// Renders every registered metric in the Prometheus text format.
    pub fn encode(&self) -> anyhow::Result<String> {
        let _guard = self.gauges.lock().unwrap_or_else(|e| e.into_inner());
        let families = self.registry.gather();
        let mut buf = Vec::new();
        TextEncoder::new().encode(&families, &mut buf)?;
        Ok(String::from_utf8(buf)?)
    }

    /// Content type for [`encode`](Self::encode) output.
    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }
}

impl SnapshotSink for MetricsRegistry {
    fn publish(&self, snapshot: &Arc<ClusterSnapshot>) {
        let g = self.gauges.lock().unwrap_or_else(|e| e.into_inner());
        let s = snapshot.as_ref();

        g.job_count.set(s.job_total as f64);
        g.node_count.set(s.node_total as f64);
        g.node_available.set(s.nodes_in(NodeState::Free.label()) as f64);
        g.node_down.set(s.nodes_in(NodeState::Down.label()) as f64);
        let busy = s.nodes_in(NodeState::JobBusy.label()) as f64
            + s.nodes_in(NodeState::Busy.label()) as f64;
        g.node_busy.set(busy);
        g.node_reserved.set(s.nodes_in(NodeState::Reserved.label()) as f64);
        g.node_offline.set(s.nodes_in(NodeState::Offline.label()) as f64);
        g.node_drained.set(s.nodes_in(NodeState::Draining.label()) as f64);
        g.node_unknown.set(s.nodes_in(NodeState::UnknownDown.label()) as f64);

        g.job_running.set(s.jobs_in(JobState::Running.label()) as f64);
        g.job_queued.set(s.jobs_in(JobState::Queued.label()) as f64);
        g.job_held.set(s.jobs_in(JobState::Held.label()) as f64);
        g.job_exiting.set(s.jobs_in(JobState::Exiting.label()) as f64);

        g.memory_usage_gb.set(s.memory_used_gb);
        g.memory_available_gb.set(s.memory_available_gb);
        g.cpu_assigned.set(s.cpu_assigned as f64);
        g.cpu_available.set(s.cpu_available as f64);
        g.cpu_total.set(s.cpu_total as f64);

        // Label sets are replaced, never merged: absent users/states must vanish.
        g.user_memory_usage_gb.reset();
        g.user_cpu_usage.reset();
        for (user, usage) in &s.usage_by_user {
            g.user_memory_usage_gb
                .with_label_values(&[user.as_str()])
                .set(usage.memory_gb);
            g.user_cpu_usage
                .with_label_values(&[user.as_str()])
                .set(usage.cpu_units as f64);
        }
        g.job_states.reset();
        for (state, count) in &s.jobs_by_state {
            g.job_states
                .with_label_values(&[state.as_str()])
                .set(*count as f64);
        }
        g.node_states.reset();
        for (state, count) in &s.nodes_by_state {
            g.node_states
                .with_label_values(&[state.as_str()])
                .set(*count as f64);
        }

        g.scrape_success.set(1.0);
        g.last_success_timestamp.set(s.collected_at as f64 / 1000.0);
    }

    fn record_failure(&self, _stage: QueryKind) {
        let g = self.gauges.lock().unwrap_or_else(|e| e.into_inner());
        g.scrape_success.set(0.0);
    }
}
