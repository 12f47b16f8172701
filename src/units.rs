// Memory unit normalization (PBS size suffixes to gigabytes)

use std::str::FromStr;

use crate::parsers::DecodeIssue;

/// Size suffix as emitted by qstat/pbsnodes (`512mb`, `16gb`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryUnit {
    Kb,
    Mb,
    Gb,
    Tb,
}

impl MemoryUnit {
    /// Multiplier taking one of this unit to gigabytes (binary scale).
    pub fn gb_factor(self) -> f64 {
        match self {
            MemoryUnit::Kb => 1.0 / (1024.0 * 1024.0),
            MemoryUnit::Mb => 1.0 / 1024.0,
            MemoryUnit::Gb => 1.0,
            MemoryUnit::Tb => 1024.0,
        }
    }
}

impl FromStr for MemoryUnit {
    type Err = DecodeIssue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kb" => Ok(MemoryUnit::Kb),
            "mb" => Ok(MemoryUnit::Mb),
            "gb" => Ok(MemoryUnit::Gb),
            "tb" => Ok(MemoryUnit::Tb),
            other => Err(DecodeIssue::UnknownUnit(other.to_string())),
        }
    }
}

/// Converts `magnitude` expressed in `unit` to gigabytes.
///
/// Unit tokens are matched case-sensitively; anything else is reported as
/// [`DecodeIssue::UnknownUnit`] and the caller contributes nothing.
pub fn normalize_to_gb(magnitude: f64, unit: &str) -> Result<f64, DecodeIssue> {
    let unit: MemoryUnit = unit.parse()?;
    Ok(magnitude * unit.gb_factor())
}
