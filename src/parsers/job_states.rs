// Job state tally from pre-grouped `<count> <code>` rows (`... | sort | uniq -c`)

use std::collections::BTreeMap;

use super::{LineIssue, Parsed, add_count, numbered_lines, parse_count};
use crate::models::JobState;

/// Maps each row's state code to its label. Every well-known label is
/// present in the result; unrecognized codes are ignored.
pub fn parse_job_states(text: &str) -> Parsed<BTreeMap<String, u64>> {
    let mut by_state: BTreeMap<String, u64> = JobState::ALL
        .iter()
        .map(|s| (s.label().to_string(), 0))
        .collect();
    let mut issues = Vec::new();

    for (line_no, line) in numbered_lines(text) {
        let mut fields = line.split_whitespace();
        let (Some(count), Some(code)) = (fields.next(), fields.next()) else {
            continue;
        };
        let Some(state) = JobState::from_code(code) else {
            tracing::debug!(code, "ignoring unrecognized job state code");
            continue;
        };
        let total = by_state.entry(state.label().to_string()).or_insert(0);
        if let Err(issue) = parse_count(count).and_then(|n| add_count(total, n, count)) {
            issues.push(LineIssue {
                line: line_no,
                issue,
            });
        }
    }

    Parsed::new(by_state, issues)
}
