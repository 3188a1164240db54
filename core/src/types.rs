//! Shared primitive types and numeric helpers used across the entire core.

use serde::{Deserialize, Serialize};

/// Stable identifier for a region, e.g. "R1".
pub type RegionId = String;

/// Stable identifier for an area, e.g. "R1-A3".
pub type AreaId = String;

/// Stable identifier for a branch, e.g. "R1-A3-B7".
pub type BranchId = String;

/// Geographic point. x = longitude, y = latitude (projection order).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub x: f64,
    pub y: f64,
}

/// Directional label for a rolled-up metric.
/// Describes where the metric VALUE sits, not whether that is good;
/// "down" on queue time is an improvement, "down" on SLA is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Up,
    Stable,
    Down,
}

/// Round to 1 decimal place (dashboard display precision).
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Round to 2 decimal places (survey-score precision).
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Mean of an iterator of values. Empty input yields 0.0, never NaN.
pub fn mean<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let mut sum = 0.0;
    let mut n = 0u64;
    for v in values {
        sum += v;
        n += 1;
    }
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_is_zero() {
        assert_eq!(mean(std::iter::empty()), 0.0);
    }

    #[test]
    fn mean_of_values() {
        assert_eq!(mean([2.0, 4.0, 6.0]), 4.0);
    }

    #[test]
    fn rounding_helpers() {
        assert_eq!(round1(12.34), 12.3);
        assert_eq!(round2(3.14159), 3.14);
    }
}
