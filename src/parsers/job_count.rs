// Job total from the line count of the job listing (`qstat | wc -l`)

use super::{LineIssue, Parsed, parse_count};

/// Subtracts the fixed number of header lines the listing carries.
///
/// An empty blob counts as zero jobs. The result saturates at zero, since
/// an idle scheduler prints no header at all.
pub fn parse_job_count(text: &str, header_lines: u64) -> Parsed<u64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Parsed::new(0, Vec::new());
    }
    match parse_count(trimmed) {
        Ok(lines) => Parsed::new(lines.saturating_sub(header_lines), Vec::new()),
        Err(issue) => Parsed::new(0, vec![LineIssue { line: 1, issue }]),
    }
}
