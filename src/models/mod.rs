// Domain models: cluster snapshot and scheduler state codes

mod snapshot;
mod state;

pub use snapshot::{ClusterSnapshot, UserUsage};
pub use state::{JobState, NodeState};
