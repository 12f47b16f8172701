// Aggregate memory/cpu totals from `pbsnodes -a`

use regex::Regex;
use std::sync::LazyLock;

use super::{LineIssue, Parsed, add_count, numbered_lines, parse_count, parse_size_gb};

static RESOURCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"resources_(assigned|available)\.(mem|ncpus) = (\S+)")
        .expect("static regex")
});

/// Cluster-wide sums over every node record in the blob.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceTotals {
    pub memory_assigned_gb: f64,
    pub memory_available_gb: f64,
    pub cpu_assigned: u64,
    pub cpu_available: u64,
}

pub fn parse_resources(text: &str) -> Parsed<ResourceTotals> {
    let mut totals = ResourceTotals::default();
    let mut issues = Vec::new();

    for (line_no, line) in numbered_lines(text) {
        let Some(caps) = RESOURCE_RE.captures(line) else {
            continue;
        };
        let token = &caps[3];
        let result = match (&caps[1], &caps[2]) {
            ("assigned", "mem") => {
                parse_size_gb(token).map(|gb| totals.memory_assigned_gb += gb)
            }
            ("available", "mem") => {
                parse_size_gb(token).map(|gb| totals.memory_available_gb += gb)
            }
            ("assigned", _) => {
                parse_count(token).and_then(|n| add_count(&mut totals.cpu_assigned, n, token))
            }
            _ => parse_count(token).and_then(|n| add_count(&mut totals.cpu_available, n, token)),
        };
        if let Err(issue) = result {
            issues.push(LineIssue {
                line: line_no,
                issue,
            });
        }
    }

    Parsed::new(totals, issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::DecodeIssue;

    const TWO_NODES: &str = "\
node01
     Mom = node01.cluster
     state = free
     resources_available.mem = 192gb
     resources_available.ncpus = 48
     resources_assigned.mem = 2048mb
     resources_assigned.ncpus = 4

node02
     Mom = node02.cluster
     state = job-busy
     resources_available.mem = 1tb
     resources_available.ncpus = 64
     resources_assigned.mem = 1gb
     resources_assigned.ncpus = 64
";

    #[test]
    fn sums_across_records() {
        let parsed = parse_resources(TWO_NODES);
        assert!(parsed.issues.is_empty());
        let t = parsed.value;
        assert_eq!(t.memory_assigned_gb, 3.0);
        assert_eq!(t.memory_available_gb, 192.0 + 1024.0);
        assert_eq!(t.cpu_assigned, 68);
        assert_eq!(t.cpu_available, 112);
    }

    #[test]
    fn no_matches_yields_zero() {
        let parsed = parse_resources("node01\n     Mom = node01\n     state = free\n");
        assert_eq!(parsed.value, ResourceTotals::default());
        assert!(parsed.issues.is_empty());
        assert_eq!(parse_resources("").value, ResourceTotals::default());
    }

    #[test]
    fn bad_values_contribute_zero_and_scan_continues() {
        let text = "\
     resources_assigned.mem = 12XB
     resources_assigned.ncpus = lots
     resources_assigned.mem = 4gb
     resources_assigned.ncpus = 2
";
        let parsed = parse_resources(text);
        assert_eq!(parsed.value.memory_assigned_gb, 4.0);
        assert_eq!(parsed.value.cpu_assigned, 2);
        assert_eq!(
            parsed.issues,
            vec![
                LineIssue {
                    line: 1,
                    issue: DecodeIssue::UnknownUnit("XB".into()),
                },
                LineIssue {
                    line: 2,
                    issue: DecodeIssue::InvalidNumber("lots".into()),
                },
            ]
        );
    }

    #[test]
    fn overflowing_cpu_sum_is_reported_and_skipped() {
        let text = "\
     resources_assigned.ncpus = 18446744073709551615
     resources_assigned.ncpus = 18446744073709551615
     resources_assigned.ncpus = 1
";
        let parsed = parse_resources(text);
        assert_eq!(parsed.value.cpu_assigned, u64::MAX);
        assert_eq!(
            parsed.issues,
            vec![
                LineIssue {
                    line: 2,
                    issue: DecodeIssue::InvalidNumber("18446744073709551615".into()),
                },
                LineIssue {
                    line: 3,
                    issue: DecodeIssue::InvalidNumber("1".into()),
                },
            ]
        );
    }
}
