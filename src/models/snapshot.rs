// Cluster snapshot: everything one successful collection pass knows

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Resource usage attributed to one job owner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUsage {
    pub memory_gb: f64,
    pub cpu_units: u64,
}

/// Point-in-time view of the cluster, built from scratch each tick.
///
/// Maps are ordered so identical input always yields an identical snapshot
/// (and identical JSON).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSnapshot {
    /// Unix millis at the start of the pass that produced this snapshot.
    pub collected_at: u64,
    pub job_total: u64,
    pub jobs_by_state: BTreeMap<String, u64>,
    pub node_total: u64,
    pub nodes_by_state: BTreeMap<String, u64>,
    pub memory_used_gb: f64,
    pub memory_available_gb: f64,
    pub cpu_assigned: u64,
    pub cpu_available: u64,
    pub cpu_total: u64,
    pub usage_by_user: BTreeMap<String, UserUsage>,
}

impl ClusterSnapshot {
    pub fn new(collected_at: u64) -> Self {
        Self {
            collected_at,
            ..Default::default()
        }
    }

    /// Count for a job state label, 0 when absent.
    pub fn jobs_in(&self, label: &str) -> u64 {
        self.jobs_by_state.get(label).copied().unwrap_or(0)
    }

    /// Count for a node state label, 0 when absent.
    pub fn nodes_in(&self, label: &str) -> u64 {
        self.nodes_by_state.get(label).copied().unwrap_or(0)
    }
}
