// Latest published snapshot, swapped whole on each successful pass.

use std::sync::{Arc, RwLock};

use crate::collector::SnapshotSink;
use crate::models::ClusterSnapshot;

#[derive(Default)]
pub struct SnapshotStore {
    current: RwLock<Option<Arc<ClusterSnapshot>>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` until the first successful pass.
    pub fn current(&self) -> Option<Arc<ClusterSnapshot>> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl SnapshotSink for SnapshotStore {
    fn publish(&self, snapshot: &Arc<ClusterSnapshot>) {
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = Some(snapshot.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty_and_swaps_whole() {
        let store = SnapshotStore::new();
        assert!(store.current().is_none());

        let first = Arc::new(ClusterSnapshot {
            job_total: 3,
            ..ClusterSnapshot::new(1)
        });
        store.publish(&first);
        let held = store.current().unwrap();

        store.publish(&Arc::new(ClusterSnapshot::new(2)));
        assert_eq!(held.job_total, 3);
        assert_eq!(store.current().unwrap().collected_at, 2);
    }
}
