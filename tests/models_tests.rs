// Model serialization tests (JSON camelCase)

use openpbs_exporter::models::*;

#[test]
fn test_snapshot_serialization_camel_case() {
    let mut snapshot = ClusterSnapshot::new(1_700_000_000_000);
    snapshot.memory_used_gb = 3.0;
    snapshot.cpu_total = 96;
    snapshot.usage_by_user.insert(
        "alice".into(),
        UserUsage {
            memory_gb: 2.0,
            cpu_units: 4,
        },
    );
    let json = serde_json::to_string(&snapshot).unwrap();
    assert!(json.contains("\"memoryUsedGb\""));
    assert!(json.contains("\"cpuTotal\""));
    assert!(json.contains("\"usageByUser\""));
    assert!(json.contains("\"collectedAt\""));
    let back: ClusterSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, snapshot);
}

#[test]
fn test_snapshot_user_map_is_ordered() {
    let mut snapshot = ClusterSnapshot::default();
    for user in ["zoe", "alice", "mallory"] {
        snapshot
            .usage_by_user
            .insert(user.into(), UserUsage::default());
    }
    let users: Vec<_> = snapshot.usage_by_user.keys().cloned().collect();
    assert_eq!(users, vec!["alice", "mallory", "zoe"]);
}

#[test]
fn test_missing_state_counts_read_as_zero() {
    let snapshot = ClusterSnapshot::default();
    assert_eq!(snapshot.jobs_in(JobState::Running.label()), 0);
    assert_eq!(snapshot.nodes_in(NodeState::Offline.label()), 0);
}

#[test]
fn test_node_state_labels_match_pbsnodes_phrases() {
    assert_eq!(NodeState::Free.phrase(), "state = free");
    assert_eq!(NodeState::UnknownDown.label(), "state-unknown,down");
    assert_eq!(NodeState::JobBusy.label(), "job-busy");
}

#[test]
fn test_job_state_codes() {
    assert_eq!(JobState::from_code("R"), Some(JobState::Running));
    assert_eq!(JobState::from_code("Q"), Some(JobState::Queued));
    assert_eq!(JobState::from_code("H"), Some(JobState::Held));
    assert_eq!(JobState::from_code("E"), Some(JobState::Exiting));
    assert_eq!(JobState::from_code("?"), None);
}
