//! Roll-up aggregator: branch records reduced to area and region
//! summaries.
//!
//! RULES:
//!   - Summaries are derived views. They are recomputed from the base
//!     records on every call and never independently mutated.
//!   - Window selection always filters by branch membership FIRST, then
//!     picks an explicit recent date range. Positional slicing of the
//!     merged multi-branch list silently mixes branches and dates.
//!   - Trend labels come from the config band table, through one
//!     generic labeling function.

use crate::{
    config::GeneratorConfig,
    hierarchy::{Region, TrendStatus},
    metrics::{DailyMetrics, MonthlyMetrics},
    types::{mean, round1, round2, AreaId, GeoPoint, RegionId, TrendDirection},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaSummary {
    pub area_id: AreaId,
    pub area_name: String,
    pub region_id: RegionId,
    pub region_name: String,
    pub branch_count: usize,
    pub coordinates: GeoPoint,

    // Current-window averages
    pub avg_queue_time: f64,
    pub sla_met: f64,
    pub service_failure_rate: f64,
    pub service_spread: f64,
    pub avg_service_time: f64,
    pub avg_transactions_per_branch: u32,
    pub ses_score: f64,
    pub nps_score: i32,

    pub queue_time_trend: TrendDirection,
    pub sla_trend: TrendDirection,
    pub perception_trend: TrendDirection,

    pub branches_improving: usize,
    pub branches_stagnant: usize,
    pub branches_declining: usize,

    pub performance_rank: usize,
    pub percent_declining: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionSummary {
    pub region_id: RegionId,
    pub region_name: String,
    pub area_count: usize,
    pub branch_count: usize,

    pub avg_queue_time: f64,
    pub sla_met: f64,
    pub service_failure_rate: f64,
    pub avg_transactions_per_branch: u32,
    pub ses_score: f64,
    pub nps_score: i32,

    pub queue_time_trend: TrendDirection,
    pub perception_trend: TrendDirection,

    pub branches_improving: usize,
    pub branches_stagnant: usize,
    pub branches_declining: usize,
}

/// The last `window` distinct dates present in an already
/// membership-filtered record set.
fn recent_date_set(records: &[&DailyMetrics], window: usize) -> HashSet<NaiveDate> {
    let dates: BTreeSet<NaiveDate> = records.iter().map(|m| m.date).collect();
    let skip = dates.len().saturating_sub(window);
    dates.into_iter().skip(skip).collect()
}

/// Reduce branch-level records to one summary per area, ranked by SLA
/// (descending, rank 1 = best).
pub fn aggregate_by_area(
    regions: &[Region],
    daily: &[DailyMetrics],
    monthly: &[MonthlyMetrics],
    cfg: &GeneratorConfig,
) -> Vec<AreaSummary> {
    let mut summaries = Vec::new();

    for region in regions {
        for area in &region.areas {
            let branch_ids: HashSet<&str> =
                area.branches.iter().map(|b| b.id.as_str()).collect();

            // Membership filter first, then the explicit recent window.
            let area_daily: Vec<&DailyMetrics> = daily
                .iter()
                .filter(|m| branch_ids.contains(m.branch_id.as_str()))
                .collect();
            let window = recent_date_set(&area_daily, cfg.rollup_window_days);
            let recent: Vec<&&DailyMetrics> = area_daily
                .iter()
                .filter(|m| window.contains(&m.date))
                .collect();

            // Latest month per branch: every branch shares the same
            // label set, so this is the max label present.
            let area_monthly: Vec<&MonthlyMetrics> = monthly
                .iter()
                .filter(|m| branch_ids.contains(m.branch_id.as_str()))
                .collect();
            let latest_month = area_monthly.iter().map(|m| m.month.as_str()).max();
            let recent_monthly: Vec<&&MonthlyMetrics> = area_monthly
                .iter()
                .filter(|m| Some(m.month.as_str()) == latest_month)
                .collect();

            let avg_queue_time = mean(recent.iter().map(|m| m.avg_queue_time));
            let sla_met = mean(recent.iter().map(|m| m.sla_met));
            let service_failure_rate = mean(recent.iter().map(|m| m.service_failure_rate));
            let service_spread = mean(recent.iter().map(|m| m.service_spread));
            let avg_service_time = mean(recent.iter().map(|m| m.avg_service_time));
            let txn_sum: f64 = recent
                .iter()
                .map(|m| f64::from(m.total_transactions))
                .sum();
            let avg_transactions = if area.branches.is_empty() {
                0.0
            } else {
                txn_sum / area.branches.len() as f64
            };

            let ses_score = mean(recent_monthly.iter().map(|m| m.ses_score));
            let nps_score = mean(recent_monthly.iter().map(|m| f64::from(m.nps_score)));

            let improving = area
                .branches
                .iter()
                .filter(|b| b.status == TrendStatus::Improving)
                .count();
            let stagnant = area
                .branches
                .iter()
                .filter(|b| b.status == TrendStatus::Stagnant)
                .count();
            let declining = area
                .branches
                .iter()
                .filter(|b| b.status == TrendStatus::Declining)
                .count();
            let percent_declining = if area.branches.is_empty() {
                0
            } else {
                ((declining as f64 / area.branches.len() as f64) * 100.0).round() as u32
            };

            summaries.push(AreaSummary {
                area_id: area.id.clone(),
                area_name: area.name.clone(),
                region_id: region.id.clone(),
                region_name: region.name.clone(),
                branch_count: area.branches.len(),
                coordinates: area.coordinates,
                avg_queue_time: round1(avg_queue_time),
                sla_met: round1(sla_met),
                service_failure_rate: round1(service_failure_rate),
                service_spread: round1(service_spread),
                avg_service_time: round1(avg_service_time),
                avg_transactions_per_branch: avg_transactions.round() as u32,
                ses_score: round2(ses_score),
                nps_score: nps_score.round() as i32,
                queue_time_trend: cfg.trend_bands.queue_time.label(avg_queue_time),
                sla_trend: cfg.trend_bands.sla.label(sla_met),
                perception_trend: cfg.trend_bands.perception.label(ses_score),
                branches_improving: improving,
                branches_stagnant: stagnant,
                branches_declining: declining,
                performance_rank: 0, // assigned below
                percent_declining,
            });
        }
    }

    // Stable descending sort by SLA, then dense rank 1..N.
    summaries.sort_by(|a, b| {
        b.sla_met
            .partial_cmp(&a.sla_met)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for (i, summary) in summaries.iter_mut().enumerate() {
        summary.performance_rank = i + 1;
    }

    summaries
}

/// Reduce area summaries to one summary per region. Each area's metric
/// is weighted by its branch count, so the result is the mean across
/// all branches in the region.
pub fn aggregate_by_region(
    regions: &[Region],
    area_summaries: &[AreaSummary],
    cfg: &GeneratorConfig,
) -> Vec<RegionSummary> {
    regions
        .iter()
        .map(|region| {
            let region_areas: Vec<&AreaSummary> = area_summaries
                .iter()
                .filter(|a| a.region_id == region.id)
                .collect();
            let branch_count: usize = region
                .areas
                .iter()
                .map(|a| a.branches.len())
                .sum();
            let n = branch_count as f64;

            let weighted = |f: fn(&AreaSummary) -> f64| -> f64 {
                if branch_count == 0 {
                    return 0.0;
                }
                region_areas
                    .iter()
                    .map(|a| f(a) * a.branch_count as f64)
                    .sum::<f64>()
                    / n
            };

            let avg_queue_time = weighted(|a| a.avg_queue_time);
            let ses_score = weighted(|a| a.ses_score);

            RegionSummary {
                region_id: region.id.clone(),
                region_name: region.name.clone(),
                area_count: region.areas.len(),
                branch_count,
                avg_queue_time: round1(avg_queue_time),
                sla_met: round1(weighted(|a| a.sla_met)),
                service_failure_rate: round1(weighted(|a| a.service_failure_rate)),
                avg_transactions_per_branch: mean(
                    region_areas
                        .iter()
                        .map(|a| f64::from(a.avg_transactions_per_branch)),
                )
                .round() as u32,
                ses_score: round2(ses_score),
                nps_score: weighted(|a| f64::from(a.nps_score)).round() as i32,
                queue_time_trend: cfg.trend_bands.queue_time.label(avg_queue_time),
                perception_trend: cfg.trend_bands.perception.label(ses_score),
                branches_improving: region_areas.iter().map(|a| a.branches_improving).sum(),
                branches_stagnant: region_areas.iter().map(|a| a.branches_stagnant).sum(),
                branches_declining: region_areas.iter().map(|a| a.branches_declining).sum(),
            }
        })
        .collect()
}
