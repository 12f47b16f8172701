// Well-known job and node state codes

use serde::{Deserialize, Serialize};

/// Job state as reported in the `S` column of `qstat -a`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JobState {
    Begun,
    Exiting,
    Finished,
    Held,
    Moved,
    Queued,
    Running,
    Suspended,
    Transit,
    UserSuspended,
    Waiting,
    Expired,
}

impl JobState {
    pub const ALL: [JobState; 12] = [
        JobState::Begun,
        JobState::Exiting,
        JobState::Finished,
        JobState::Held,
        JobState::Moved,
        JobState::Queued,
        JobState::Running,
        JobState::Suspended,
        JobState::Transit,
        JobState::UserSuspended,
        JobState::Waiting,
        JobState::Expired,
    ];

    /// Maps a single-letter qstat state code. Codes are case-sensitive.
    pub fn from_code(code: &str) -> Option<Self> {
        let state = match code {
            "B" => JobState::Begun,
            "E" => JobState::Exiting,
            "F" => JobState::Finished,
            "H" => JobState::Held,
            "M" => JobState::Moved,
            "Q" => JobState::Queued,
            "R" => JobState::Running,
            "S" => JobState::Suspended,
            "T" => JobState::Transit,
            "U" => JobState::UserSuspended,
            "W" => JobState::Waiting,
            "X" => JobState::Expired,
            _ => return None,
        };
        Some(state)
    }

    pub fn code(self) -> &'static str {
        match self {
            JobState::Begun => "B",
            JobState::Exiting => "E",
            JobState::Finished => "F",
            JobState::Held => "H",
            JobState::Moved => "M",
            JobState::Queued => "Q",
            JobState::Running => "R",
            JobState::Suspended => "S",
            JobState::Transit => "T",
            JobState::UserSuspended => "U",
            JobState::Waiting => "W",
            JobState::Expired => "X",
        }
    }

    /// Key used in `ClusterSnapshot::jobs_by_state` and the `state` metric label.
    pub fn label(self) -> &'static str {
        match self {
            JobState::Begun => "begun",
            JobState::Exiting => "exiting",
            JobState::Finished => "finished",
            JobState::Held => "held",
            JobState::Moved => "moved",
            JobState::Queued => "queued",
            JobState::Running => "running",
            JobState::Suspended => "suspended",
            JobState::Transit => "transit",
            JobState::UserSuspended => "user_suspended",
            JobState::Waiting => "waiting",
            JobState::Expired => "expired",
        }
    }
}

/// Node state phrase as printed by `pbsnodes -a` after `state = `.
///
/// The label is the literal phrase, so unrecognized phrases can share the
/// same key space in `ClusterSnapshot::nodes_by_state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeState {
    Free,
    Down,
    JobBusy,
    Busy,
    Reserved,
    Offline,
    Draining,
    UnknownDown,
}

impl NodeState {
    pub const ALL: [NodeState; 8] = [
        NodeState::Free,
        NodeState::Down,
        NodeState::JobBusy,
        NodeState::Busy,
        NodeState::Reserved,
        NodeState::Offline,
        NodeState::Draining,
        NodeState::UnknownDown,
    ];

    pub fn label(self) -> &'static str {
        match self {
            NodeState::Free => "free",
            NodeState::Down => "down",
            NodeState::JobBusy => "job-busy",
            NodeState::Busy => "busy",
            NodeState::Reserved => "reserved",
            NodeState::Offline => "offline",
            NodeState::Draining => "draining",
            NodeState::UnknownDown => "state-unknown,down",
        }
    }

    /// Full text searched for in node descriptions, e.g. `state = free`.
    pub fn phrase(self) -> &'static str {
        match self {
            NodeState::Free => "state = free",
            NodeState::Down => "state = down",
            NodeState::JobBusy => "state = job-busy",
            NodeState::Busy => "state = busy",
            NodeState::Reserved => "state = reserved",
            NodeState::Offline => "state = offline",
            NodeState::Draining => "state = draining",
            NodeState::UnknownDown => "state = state-unknown,down",
        }
    }
}
