// Shared test helpers: canned scheduler output and a scriptable command source

#![allow(dead_code)]

use openpbs_exporter::pbs_repo::{CommandError, CommandSource, QueryKind};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const JOB_COUNT: &str = "      7\n";

pub const NODES: &str = "\
node01
     Mom = node01.cluster
     ntype = PBS
     state = free
     resources_available.mem = 192gb
     resources_available.ncpus = 48
     resources_assigned.mem = 2048mb
     resources_assigned.ncpus = 4

node02
     Mom = node02.cluster
     ntype = PBS
     state = job-busy
     resources_available.mem = 192gb
     resources_available.ncpus = 48
     resources_assigned.mem = 1gb
     resources_assigned.ncpus = 48

node03
     Mom = node03.cluster
     ntype = PBS
     state = maintenance
     resources_available.mem = 1tb
     resources_available.ncpus = 64
     resources_assigned.mem = 0kb
     resources_assigned.ncpus = 0
";

pub const JOB_STATES: &str = "      3 R\n      2 Q\n";

pub const JOB_DETAIL: &str = "\
Job Id: 101.pbs01
    Job_Name = sim
    Job_Owner = alice/101
    resources_used.cpupercent = 390
    resources_used.mem = 2048mb
    resources_used.ncpus = 4
    job_state = R

Job Id: 102.pbs01
    Job_Name = post
    Job_Owner = bob/102
    resources_used.mem = 512mb
    resources_used.ncpus = 2
    job_state = R
";

/// Command source returning canned text per query; queries can be made to fail.
pub struct FakeSource {
    outputs: Mutex<HashMap<QueryKind, Result<String, String>>>,
    calls: AtomicUsize,
}

impl FakeSource {
    pub fn new() -> Self {
        let source = Self {
            outputs: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
        };
        source.set(QueryKind::JobCount, JOB_COUNT);
        source.set(QueryKind::NodeDescription, NODES);
        source.set(QueryKind::JobStateCounts, JOB_STATES);
        source.set(QueryKind::JobDetail, JOB_DETAIL);
        source
    }

    pub fn set(&self, query: QueryKind, text: &str) {
        self.outputs
            .lock()
            .unwrap()
            .insert(query, Ok(text.to_string()));
    }

    pub fn fail(&self, query: QueryKind) {
        self.outputs
            .lock()
            .unwrap()
            .insert(query, Err(query.to_string()));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CommandSource for FakeSource {
    async fn run(&self, query: QueryKind) -> Result<String, CommandError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let result = self
            .outputs
            .lock()
            .unwrap()
            .get(&query)
            .cloned()
            .unwrap_or_else(|| Ok(String::new()));
        result.map_err(|command| CommandError::Timeout {
            command,
            timeout: Duration::ZERO,
        })
    }
}
