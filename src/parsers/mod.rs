// Line-oriented extractors for qstat/pbsnodes output.
// Each parser takes one raw text blob and returns its partial result plus the
// per-line decoding issues it met. Non-matching lines are skipped silently.

mod job_count;
mod job_states;
mod node_states;
mod resources;
mod user_usage;

pub use job_count::parse_job_count;
pub use job_states::parse_job_states;
pub use node_states::{NodeTally, parse_node_states};
pub use resources::{ResourceTotals, parse_resources};
pub use user_usage::{OwnerCursor, parse_user_usage};

use crate::units::normalize_to_gb;

/// A matched value that could not be turned into a number.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeIssue {
    #[error("invalid number {0:?}")]
    InvalidNumber(String),
    #[error("unknown memory unit {0:?}")]
    UnknownUnit(String),
}

/// Decoding issue located on a 1-based line of the scanned text.
#[derive(Debug, Clone, PartialEq)]
pub struct LineIssue {
    pub line: usize,
    pub issue: DecodeIssue,
}

/// Parser output: the extracted value and every issue met while scanning.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    pub value: T,
    pub issues: Vec<LineIssue>,
}

impl<T> Parsed<T> {
    fn new(value: T, issues: Vec<LineIssue>) -> Self {
        Self { value, issues }
    }
}

/// Numbered lines, 1-based.
pub(crate) fn numbered_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines().enumerate().map(|(i, line)| (i + 1, line))
}

pub(crate) fn parse_count(token: &str) -> Result<u64, DecodeIssue> {
    token
        .parse::<u64>()
        .map_err(|_| DecodeIssue::InvalidNumber(token.to_string()))
}

/// Adds `n` to `total`. An overflowing sum leaves `total` unchanged and is
/// reported against the token that caused it.
pub(crate) fn add_count(total: &mut u64, n: u64, token: &str) -> Result<(), DecodeIssue> {
    *total = total
        .checked_add(n)
        .ok_or_else(|| DecodeIssue::InvalidNumber(token.to_string()))?;
    Ok(())
}

/// Parses a PBS size token such as `2048mb` into gigabytes.
pub(crate) fn parse_size_gb(token: &str) -> Result<f64, DecodeIssue> {
    let split = token
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(token.len());
    let (digits, unit) = token.split_at(split);
    if digits.is_empty() {
        return Err(DecodeIssue::InvalidNumber(token.to_string()));
    }
    let magnitude = digits
        .parse::<u64>()
        .map_err(|_| DecodeIssue::InvalidNumber(token.to_string()))?;
    normalize_to_gb(magnitude as f64, unit)
}
