// Node state tally from `pbsnodes -a`

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use super::{Parsed, numbered_lines};
use crate::models::NodeState;

/// Marks the start of every node record.
const NODE_MARKER: &str = "Mom =";

static STATE_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*state = (.+?)\s*$").expect("static regex"));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeTally {
    pub node_total: u64,
    pub by_state: BTreeMap<String, u64>,
}

/// Counts nodes and node states.
///
/// Well-known phrases are counted by substring occurrence over the whole
/// blob, not per record: a phrase quoted inside another attribute (a comment,
/// say) is counted too. `state = ...` lines matching no well-known phrase are
/// tallied under their literal text.
pub fn parse_node_states(text: &str) -> Parsed<NodeTally> {
    let mut by_state = BTreeMap::new();
    for state in NodeState::ALL {
        by_state.insert(
            state.label().to_string(),
            text.matches(state.phrase()).count() as u64,
        );
    }

    for (_, line) in numbered_lines(text) {
        let Some(caps) = STATE_LINE_RE.captures(line) else {
            continue;
        };
        let known = NodeState::ALL.iter().any(|s| line.contains(s.phrase()));
        if !known {
            *by_state.entry(caps[1].to_string()).or_insert(0) += 1;
        }
    }

    let tally = NodeTally {
        node_total: text.matches(NODE_MARKER).count() as u64,
        by_state,
    };
    Parsed::new(tally, Vec::new())
}
