// Per-user resource usage from `qstat -f`

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use super::{LineIssue, Parsed, add_count, numbered_lines, parse_count, parse_size_gb};
use crate::models::UserUsage;

static OWNER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Job_Owner =\s*([^/]*)").expect("static regex"));
static USED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"resources_used\.(mem|ncpus) = (\S+)").expect("static regex")
});

/// Which job owner subsequent `resources_used.*` lines belong to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OwnerCursor {
    /// No `Job_Owner` line seen yet; usage is dropped.
    #[default]
    NoOwner,
    Owner(String),
}

impl OwnerCursor {
    /// Moves to `user`, replacing any previous owner. A blank user resets
    /// the cursor so that job's usage is dropped.
    pub fn observe_owner(&mut self, user: &str) {
        let user = user.trim();
        *self = if user.is_empty() {
            OwnerCursor::NoOwner
        } else {
            OwnerCursor::Owner(user.to_string())
        };
    }

    pub fn current(&self) -> Option<&str> {
        match self {
            OwnerCursor::NoOwner => None,
            OwnerCursor::Owner(user) => Some(user),
        }
    }
}

/// Sums memory (GB) and cpu usage per job owner across the whole blob.
pub fn parse_user_usage(text: &str) -> Parsed<BTreeMap<String, UserUsage>> {
    let mut usage: BTreeMap<String, UserUsage> = BTreeMap::new();
    let mut issues = Vec::new();
    let mut cursor = OwnerCursor::NoOwner;

    for (line_no, line) in numbered_lines(text) {
        if let Some(caps) = OWNER_RE.captures(line) {
            cursor.observe_owner(&caps[1]);
            continue;
        }
        let Some(caps) = USED_RE.captures(line) else {
            continue;
        };
        let Some(user) = cursor.current() else {
            continue;
        };
        let token = &caps[2];
        let result = if &caps[1] == "mem" {
            parse_size_gb(token)
                .map(|gb| usage.entry(user.to_string()).or_default().memory_gb += gb)
        } else {
            parse_count(token).and_then(|n| {
                add_count(&mut usage.entry(user.to_string()).or_default().cpu_units, n, token)
            })
        };
        if let Err(issue) = result {
            issues.push(LineIssue {
                line: line_no,
                issue,
            });
        }
    }

    Parsed::new(usage, issues)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_usage_to_preceding_owner() {
        let text = "\
Job Id: 1.server
    Job_Owner = alice/1
    resources_used.ncpus = 4
    resources_used.mem = 2048mb

Job Id: 2.server
    Job_Owner = bob/2
    resources_used.ncpus = 2
";
        let usage = parse_user_usage(text).value;
        assert_eq!(usage.len(), 2);
        assert_eq!(usage["alice"].cpu_units, 4);
        assert_eq!(usage["alice"].memory_gb, 2.0);
        assert_eq!(usage["bob"].cpu_units, 2);
        assert_eq!(usage["bob"].memory_gb, 0.0);
    }

    #[test]
    fn usage_before_any_owner_is_dropped() {
        let text = "\
    resources_used.ncpus = 16
    resources_used.mem = 1tb
    Job_Owner = alice/1
    resources_used.ncpus = 1
";
        let usage = parse_user_usage(text).value;
        assert_eq!(usage.len(), 1);
        assert_eq!(usage["alice"].cpu_units, 1);
        assert_eq!(usage["alice"].memory_gb, 0.0);
    }

    #[test]
    fn same_owner_across_jobs_sums() {
        let text = "\
    Job_Owner = carol/a
    resources_used.ncpus = 3
    resources_used.mem = 512mb
    Job_Owner = carol/b
    resources_used.ncpus = 5
    resources_used.mem = 1536mb
";
        let usage = parse_user_usage(text).value;
        assert_eq!(usage["carol"].cpu_units, 8);
        assert_eq!(usage["carol"].memory_gb, 2.0);
    }

    #[test]
    fn owner_without_usage_is_absent() {
        assert!(parse_user_usage("    Job_Owner = dave/1\n").value.is_empty());
    }

    #[test]
    fn cursor_transitions() {
        let mut cursor = OwnerCursor::default();
        assert_eq!(cursor.current(), None);
        cursor.observe_owner("alice");
        assert_eq!(cursor.current(), Some("alice"));
        cursor.observe_owner("bob");
        assert_eq!(cursor.current(), Some("bob"));
        cursor.observe_owner("  ");
        assert_eq!(cursor, OwnerCursor::NoOwner);
    }

    #[test]
    fn blank_owner_drops_usage_instead_of_reusing_previous() {
        let text = "\
    Job_Owner = alice/1
    resources_used.ncpus = 1
    Job_Owner = /2
    resources_used.ncpus = 7
    resources_used.mem = 1gb
    Job_Owner = bob/3
    resources_used.ncpus = 2
";
        let usage = parse_user_usage(text).value;
        assert_eq!(usage.len(), 2);
        assert_eq!(usage["alice"].cpu_units, 1);
        assert_eq!(usage["alice"].memory_gb, 0.0);
        assert_eq!(usage["bob"].cpu_units, 2);
    }

    #[test]
    fn overflowing_cpu_sum_is_reported() {
        let text = "\
    Job_Owner = frank/1
    resources_used.ncpus = 18446744073709551615
    Job_Owner = frank/2
    resources_used.ncpus = 5
";
        let parsed = parse_user_usage(text);
        assert_eq!(parsed.value["frank"].cpu_units, u64::MAX);
        assert_eq!(parsed.issues.len(), 1);
        assert_eq!(parsed.issues[0].line, 4);
    }

    #[test]
    fn bad_usage_value_is_reported() {
        let parsed = parse_user_usage("    Job_Owner = erin/1\n    resources_used.mem = 10zb\n");
        assert!(parsed.value.is_empty());
        assert_eq!(parsed.issues.len(), 1);
        assert_eq!(parsed.issues[0].line, 2);
    }
}
