//! Generator configuration: every tunable the synthesizer and the
//! roll-ups consume, with the dashboard's shipped constants as defaults.
//!
//! Trend thresholds live here as one table rather than as magic numbers
//! scattered through the aggregator; rollup.rs consumes them through a
//! single generic labeling function.

use crate::types::TrendDirection;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Threshold band for one rolled-up metric.
///
/// For a higher-is-better metric (SLA, SES) the label is Up above
/// `good_threshold` and Down below `bad_threshold`. For a lower-is-better
/// metric (queue time) it is Down below `good_threshold` and Up above
/// `bad_threshold`; the label always tracks the raw direction of the
/// value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrendBands {
    pub good_threshold: f64,
    pub bad_threshold: f64,
    pub higher_is_better: bool,
}

impl TrendBands {
    pub fn label(&self, value: f64) -> TrendDirection {
        if self.higher_is_better {
            if value > self.good_threshold {
                TrendDirection::Up
            } else if value < self.bad_threshold {
                TrendDirection::Down
            } else {
                TrendDirection::Stable
            }
        } else if value < self.good_threshold {
            TrendDirection::Down
        } else if value > self.bad_threshold {
            TrendDirection::Up
        } else {
            TrendDirection::Stable
        }
    }
}

/// Trend bands per rolled-up metric.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendBandTable {
    pub queue_time: TrendBands,
    pub sla: TrendBands,
    pub perception: TrendBands,
}

impl Default for TrendBandTable {
    fn default() -> Self {
        Self {
            queue_time: TrendBands {
                good_threshold: 11.0,
                bad_threshold: 14.0,
                higher_is_better: false,
            },
            sla: TrendBands {
                good_threshold: 85.0,
                bad_threshold: 75.0,
                higher_is_better: true,
            },
            perception: TrendBands {
                good_threshold: 4.0,
                bad_threshold: 3.5,
                higher_is_better: true,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Master seed. Must be non-zero modulo 2^31 - 1.
    pub seed: u64,

    /// First day of the daily horizon.
    pub daily_start: NaiveDate,
    /// Number of daily records per branch.
    pub horizon_days: u32,

    /// First month of the monthly horizon ("YYYY-MM" split into parts).
    pub monthly_start_year: i32,
    pub monthly_start_month: u32,
    /// Number of monthly records per branch.
    pub monthly_count: u32,

    /// Branch count per area, drawn uniformly inclusive.
    pub branches_per_area_min: i64,
    pub branches_per_area_max: i64,

    /// Volume class cumulative thresholds on one uniform roll:
    /// roll < high => High, roll < medium => Medium, else Low.
    pub volume_high_threshold: f64,
    pub volume_medium_threshold: f64,

    /// Trend status cumulative thresholds, shifted by the per-region
    /// bias before comparison:
    /// roll < improving + bias => Improving,
    /// roll < stagnant + bias  => Stagnant, else Declining.
    pub status_improving_threshold: f64,
    pub status_stagnant_threshold: f64,
    /// Bias per region index; missing entries read as 0.0.
    pub region_status_bias: Vec<f64>,

    /// Distinct recent dates the area roll-up averages over.
    pub rollup_window_days: usize,
    /// Distinct dates per window in SQI current/previous comparisons.
    pub sqi_window_days: usize,

    pub trend_bands: TrendBandTable,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            daily_start: NaiveDate::from_ymd_opt(2025, 7, 1).expect("valid date"),
            horizon_days: 180,
            monthly_start_year: 2025,
            monthly_start_month: 1,
            monthly_count: 12,
            branches_per_area_min: 8,
            branches_per_area_max: 20,
            volume_high_threshold: 0.2,
            volume_medium_threshold: 0.7,
            status_improving_threshold: 0.35,
            status_stagnant_threshold: 0.7,
            region_status_bias: vec![0.1, 0.0, 0.0, -0.1],
            rollup_window_days: 30,
            sqi_window_days: 7,
            trend_bands: TrendBandTable::default(),
        }
    }
}

impl GeneratorConfig {
    /// Load a config from a JSON file. Absent fields fall back to the
    /// shipped defaults.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let cfg: GeneratorConfig = serde_json::from_str(&raw)?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TrendDirection;

    #[test]
    fn default_round_trips_through_json() {
        let cfg = GeneratorConfig::default();
        let json = serde_json::to_string(&cfg).expect("serialize");
        let back: GeneratorConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.seed, cfg.seed);
        assert_eq!(back.horizon_days, cfg.horizon_days);
        assert_eq!(back.daily_start, cfg.daily_start);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let cfg: GeneratorConfig = serde_json::from_str(r#"{"seed": 777}"#).expect("parse");
        assert_eq!(cfg.seed, 777);
        assert_eq!(cfg.horizon_days, 180);
        assert_eq!(cfg.rollup_window_days, 30);
    }

    #[test]
    fn queue_band_labels_raw_direction() {
        let bands = TrendBandTable::default().queue_time;
        assert_eq!(bands.label(10.0), TrendDirection::Down);
        assert_eq!(bands.label(12.5), TrendDirection::Stable);
        assert_eq!(bands.label(15.0), TrendDirection::Up);
    }

    #[test]
    fn sla_band_labels_raw_direction() {
        let bands = TrendBandTable::default().sla;
        assert_eq!(bands.label(90.0), TrendDirection::Up);
        assert_eq!(bands.label(80.0), TrendDirection::Stable);
        assert_eq!(bands.label(70.0), TrendDirection::Down);
    }
}
