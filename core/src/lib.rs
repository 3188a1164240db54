//! branchpulse-core: deterministic branch-network service-quality
//! engine.
//!
//! Generates a synthetic, fully reproducible operational dataset for a
//! fictitious bank's branch hierarchy and exposes pure aggregation,
//! composite scoring (SQI) and time-series utilities over it.
//!
//! RULES:
//!   - All randomness flows through one SeededRng, passed explicitly.
//!   - Generation happens once; everything downstream is a pure
//!     function of the immutable records plus explicit filters.
//!   - Derived summaries are recomputed, never mutated.

pub mod config;
pub mod dataset;
pub mod error;
pub mod hierarchy;
pub mod metrics;
pub mod rng;
pub mod rollup;
pub mod sqi;
pub mod synth;
pub mod timeseries;
pub mod types;

pub use config::{GeneratorConfig, TrendBandTable, TrendBands};
pub use dataset::{BankwideSummary, Dataset};
pub use error::{CoreError, CoreResult};
pub use hierarchy::{Area, Branch, Region, TrendStatus, VolumeClass};
pub use metrics::{DailyField, DailyMetrics, MonthlyMetrics};
pub use rng::SeededRng;
pub use rollup::{AreaSummary, RegionSummary};
pub use sqi::{service_quality_index, sqi_decline, SqiInputs};
pub use timeseries::{Granularity, PeriodComparison, TimeSeriesPoint};
pub use types::TrendDirection;
