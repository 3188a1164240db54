//! The generate-once dataset and its query surface.
//!
//! GENERATION ORDER (fixed, documented, never reordered):
//!   1. Hierarchy (regions → areas → branches), one pass.
//!   2. Daily records: outer loop over branches in hierarchy order,
//!      inner loop over the date horizon.
//!   3. Monthly records: same nesting over the month horizon.
//!   4. Derived summaries.
//! All draws come from one SeededRng threaded through these steps, so
//! reordering any loop changes every downstream record.
//!
//! After generate() returns the dataset is immutable. Every query
//! method is a pure function of the stored records plus its explicit
//! filter arguments; the core never reads ambient UI state.

use crate::{
    config::GeneratorConfig,
    error::CoreResult,
    hierarchy::{build_hierarchy, flatten_branches, Branch, Region, TrendStatus},
    metrics::{DailyField, DailyMetrics, MonthlyMetrics},
    rng::SeededRng,
    rollup::{aggregate_by_area, aggregate_by_region, AreaSummary, RegionSummary},
    sqi::{area_sqi_declines, rank_branches_by_sqi, AreaSqiRow, BranchSqiRow},
    synth::{daily_dates, month_labels, synthesize_daily, synthesize_monthly},
    timeseries::{
        aggregate_daily_trend, compute_period_comparison, generate_time_series,
        monthly_perception_series, Granularity, PerceptionPoint, PeriodComparison,
        TimeSeriesPoint,
    },
    types::{mean, round1, round2, BranchId},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Bank-wide headline figures, averaged across area summaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankwideSummary {
    pub total_branches: usize,
    pub total_areas: usize,
    pub total_regions: usize,
    pub avg_queue_time: f64,
    pub avg_sla_met: f64,
    pub avg_service_failure_rate: f64,
    pub avg_ses: f64,
    pub avg_nps: i32,
    pub branches_improving: usize,
    pub branches_stagnant: usize,
    pub branches_declining: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub config: GeneratorConfig,
    pub regions: Vec<Region>,
    /// Flattened branch list in hierarchy order.
    pub branches: Vec<Branch>,
    pub daily_metrics: Vec<DailyMetrics>,
    pub monthly_metrics: Vec<MonthlyMetrics>,
    pub area_summaries: Vec<AreaSummary>,
    pub region_summaries: Vec<RegionSummary>,
    pub bankwide: BankwideSummary,
}

impl Dataset {
    /// Generate the full dataset for a config. Deterministic: the same
    /// config always yields a byte-identical dataset.
    pub fn generate(config: &GeneratorConfig) -> CoreResult<Dataset> {
        let mut rng = SeededRng::new(config.seed)?;

        let regions = build_hierarchy(config, &mut rng);
        let branches = flatten_branches(&regions);

        let dates = daily_dates(config.daily_start, config.horizon_days);
        let mut daily_metrics =
            Vec::with_capacity(branches.len() * dates.len());
        for branch in &branches {
            for (day_index, date) in dates.iter().enumerate() {
                daily_metrics.push(synthesize_daily(
                    branch,
                    *date,
                    day_index as u32,
                    &mut rng,
                ));
            }
        }

        let months = month_labels(
            config.monthly_start_year,
            config.monthly_start_month,
            config.monthly_count,
        );
        let mut monthly_metrics = Vec::with_capacity(branches.len() * months.len());
        for branch in &branches {
            for (month_index, month) in months.iter().enumerate() {
                monthly_metrics.push(synthesize_monthly(
                    branch,
                    month,
                    month_index as u32,
                    &mut rng,
                ));
            }
        }

        let area_summaries =
            aggregate_by_area(&regions, &daily_metrics, &monthly_metrics, config);
        let region_summaries = aggregate_by_region(&regions, &area_summaries, config);
        let bankwide = bankwide_summary(&branches, &area_summaries, &region_summaries);

        log::info!(
            "dataset generated: seed={} branches={} daily={} monthly={}",
            config.seed,
            branches.len(),
            daily_metrics.len(),
            monthly_metrics.len(),
        );

        Ok(Dataset {
            config: config.clone(),
            regions,
            branches,
            daily_metrics,
            monthly_metrics,
            area_summaries,
            region_summaries,
            bankwide,
        })
    }

    /// All distinct dates present, sorted ascending.
    pub fn all_dates(&self) -> Vec<NaiveDate> {
        self.daily_metrics
            .iter()
            .map(|m| m.date)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// The trailing `n` distinct dates, sorted ascending.
    pub fn recent_dates(&self, n: usize) -> Vec<NaiveDate> {
        let dates = self.all_dates();
        let skip = dates.len().saturating_sub(n);
        dates.into_iter().skip(skip).collect()
    }

    /// Ids of every branch, in hierarchy order.
    pub fn all_branch_ids(&self) -> Vec<BranchId> {
        self.branches.iter().map(|b| b.id.clone()).collect()
    }

    pub fn period_comparison(
        &self,
        field: DailyField,
        branch_ids: &[BranchId],
        window_days: usize,
    ) -> PeriodComparison {
        compute_period_comparison(&self.daily_metrics, branch_ids, field, window_days)
    }

    pub fn daily_trend(&self, field: DailyField, branch_ids: &[BranchId]) -> Vec<TimeSeriesPoint> {
        aggregate_daily_trend(&self.daily_metrics, branch_ids, field)
    }

    pub fn time_series(
        &self,
        field: DailyField,
        branch_ids: &[BranchId],
        granularity: Granularity,
    ) -> Vec<TimeSeriesPoint> {
        generate_time_series(&self.daily_metrics, branch_ids, field, granularity)
    }

    pub fn perception_series(
        &self,
        branch_ids: &[BranchId],
        last_n_months: usize,
    ) -> Vec<PerceptionPoint> {
        monthly_perception_series(&self.monthly_metrics, branch_ids, last_n_months)
    }

    /// Branch ranking over the configured SQI window, best first.
    pub fn branch_sqi_ranking(&self) -> Vec<BranchSqiRow> {
        rank_branches_by_sqi(
            &self.branches,
            &self.daily_metrics,
            &self.monthly_metrics,
            self.config.sqi_window_days,
        )
    }

    /// Area-level week-over-week SQI decline, worst decliners first.
    pub fn area_sqi_declines(&self) -> Vec<AreaSqiRow> {
        area_sqi_declines(
            &self.regions,
            &self.daily_metrics,
            &self.monthly_metrics,
            self.config.sqi_window_days,
        )
    }
}

fn bankwide_summary(
    branches: &[Branch],
    area_summaries: &[AreaSummary],
    region_summaries: &[RegionSummary],
) -> BankwideSummary {
    let status_count = |status: TrendStatus| -> usize {
        branches.iter().filter(|b| b.status == status).count()
    };

    BankwideSummary {
        total_branches: branches.len(),
        total_areas: area_summaries.len(),
        total_regions: region_summaries.len(),
        avg_queue_time: round1(mean(area_summaries.iter().map(|a| a.avg_queue_time))),
        avg_sla_met: round1(mean(area_summaries.iter().map(|a| a.sla_met))),
        avg_service_failure_rate: round1(mean(
            area_summaries.iter().map(|a| a.service_failure_rate),
        )),
        avg_ses: round2(mean(area_summaries.iter().map(|a| a.ses_score))),
        avg_nps: mean(area_summaries.iter().map(|a| f64::from(a.nps_score))).round() as i32,
        branches_improving: status_count(TrendStatus::Improving),
        branches_stagnant: status_count(TrendStatus::Stagnant),
        branches_declining: status_count(TrendStatus::Declining),
    }
}
