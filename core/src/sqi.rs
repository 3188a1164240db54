//! Service Quality Index: the composite 0-100 score.
//!
//! RULE: service_quality_index() is the ONLY definition of the formula.
//! Branch ranking, area intervention lists and any future consumer all
//! call it; a second copy anywhere risks silent divergence.

use crate::{
    hierarchy::{Branch, Region},
    metrics::{DailyMetrics, MonthlyMetrics},
    types::{mean, round1, AreaId, BranchId, RegionId},
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The six raw sub-metrics the index is computed from. Daily fields are
/// averaged over a window; NPS comes from the nearest monthly record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SqiInputs {
    pub queue_time: f64,
    pub sla_met: f64,
    pub service_spread: f64,
    pub failure_rate: f64,
    pub service_time: f64,
    pub nps: f64,
}

fn clamp100(v: f64) -> f64 {
    v.clamp(0.0, 100.0)
}

/// Map the six raw metrics to a single 0-100 score: each sub-metric is
/// normalized to 0-100 (higher = better), then the six are averaged and
/// rounded.
pub fn service_quality_index(m: &SqiInputs) -> u32 {
    let queue_score = clamp100(100.0 - (m.queue_time - 5.0) * 5.0);
    let sla_score = m.sla_met; // already a 0-100 percentage
    let spread_score = clamp100(100.0 - (m.service_spread - 2.0) * 12.5);
    let failure_score = clamp100(100.0 - m.failure_rate * 6.67);
    let service_time_score = clamp100(100.0 - (m.service_time - 4.0) * 16.67);
    let nps_score = clamp100((m.nps + 100.0) / 2.0);

    let total =
        queue_score + sla_score + spread_score + failure_score + service_time_score + nps_score;
    (total / 6.0).round() as u32
}

/// Percentage decline from the previous window's score. Positive means
/// the score dropped. A zero previous score yields 0, never a division
/// error.
pub fn sqi_decline(previous: u32, current: u32) -> i32 {
    if previous == 0 {
        return 0;
    }
    (((f64::from(previous) - f64::from(current)) / f64::from(previous)) * 100.0).round() as i32
}

/// Average the five daily sub-metrics over an already-filtered record
/// window. Empty windows yield zeros.
pub fn window_inputs(window: &[&DailyMetrics], nps: f64) -> SqiInputs {
    SqiInputs {
        queue_time: mean(window.iter().map(|m| m.avg_queue_time)),
        sla_met: mean(window.iter().map(|m| m.sla_met)),
        service_spread: mean(window.iter().map(|m| m.service_spread)),
        failure_rate: mean(window.iter().map(|m| m.service_failure_rate)),
        service_time: mean(window.iter().map(|m| m.avg_service_time)),
        nps,
    }
}

/// One row of the branch SQI ranking table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchSqiRow {
    pub branch_id: BranchId,
    pub name: String,
    pub code: String,

    pub sqi: u32,
    pub sqi_decline: i32,

    // Current-window averages backing the score
    pub queue_time: f64,
    pub sla_met: f64,
    pub service_spread: f64,
    pub failure_rate: f64,
    pub service_time: f64,
    pub nps: i32,

    // Percent change vs the previous window, per metric
    pub queue_change: i32,
    pub sla_change: i32,
    pub spread_change: i32,
    pub failure_change: i32,
    pub service_time_change: i32,
}

/// One row of the area intervention list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaSqiRow {
    pub area_id: AreaId,
    pub area_name: String,
    pub region_id: RegionId,
    pub sqi: u32,
    pub previous_sqi: u32,
    pub sqi_decline: i32,
}

fn percent_change(current: f64, previous: f64) -> i32 {
    if previous == 0.0 {
        return 0;
    }
    (((current - previous) / previous) * 100.0).round() as i32
}

/// Split membership-filtered records into the last `window` distinct
/// dates and the `window` dates immediately preceding them.
fn split_windows<'a>(
    records: &[&'a DailyMetrics],
    window: usize,
) -> (Vec<&'a DailyMetrics>, Vec<&'a DailyMetrics>) {
    let mut dates: Vec<_> = records
        .iter()
        .map(|m| m.date)
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .collect();
    let split = dates.len().saturating_sub(window);
    let current_dates: HashSet<_> = dates.split_off(split).into_iter().collect();
    let prev_start = dates.len().saturating_sub(window);
    let previous_dates: HashSet<_> = dates.split_off(prev_start).into_iter().collect();

    let current = records
        .iter()
        .copied()
        .filter(|m| current_dates.contains(&m.date))
        .collect();
    let previous = records
        .iter()
        .copied()
        .filter(|m| previous_dates.contains(&m.date))
        .collect();
    (current, previous)
}

/// Latest and second-latest monthly NPS for a filtered record set.
/// The previous value falls back to the current one when only a single
/// month exists.
fn nps_pair(monthly: &[&MonthlyMetrics]) -> (f64, f64) {
    let mut months: Vec<&str> = monthly
        .iter()
        .map(|m| m.month.as_str())
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .collect();
    let latest = match months.pop() {
        Some(label) => label,
        None => return (0.0, 0.0),
    };
    let current = mean(
        monthly
            .iter()
            .filter(|m| m.month == latest)
            .map(|m| f64::from(m.nps_score)),
    );
    let previous = match months.pop() {
        Some(label) => mean(
            monthly
                .iter()
                .filter(|m| m.month == label)
                .map(|m| f64::from(m.nps_score)),
        ),
        None => current,
    };
    (current, previous)
}

/// Score every branch over the current and previous windows and return
/// a stable descending ranking (highest SQI first).
pub fn rank_branches_by_sqi(
    branches: &[Branch],
    daily: &[DailyMetrics],
    monthly: &[MonthlyMetrics],
    window_days: usize,
) -> Vec<BranchSqiRow> {
    let mut rows: Vec<BranchSqiRow> = branches
        .iter()
        .map(|branch| {
            let branch_daily: Vec<&DailyMetrics> = daily
                .iter()
                .filter(|m| m.branch_id == branch.id)
                .collect();
            let branch_monthly: Vec<&MonthlyMetrics> = monthly
                .iter()
                .filter(|m| m.branch_id == branch.id)
                .collect();

            let (current, previous) = split_windows(&branch_daily, window_days);
            let (nps, prev_nps) = nps_pair(&branch_monthly);

            let inputs = window_inputs(&current, nps);
            let prev_inputs = window_inputs(&previous, prev_nps);

            let sqi = service_quality_index(&inputs);
            let prev_sqi = service_quality_index(&prev_inputs);

            BranchSqiRow {
                branch_id: branch.id.clone(),
                name: branch.name.clone(),
                code: branch.code.clone(),
                sqi,
                sqi_decline: sqi_decline(prev_sqi, sqi),
                queue_time: round1(inputs.queue_time),
                sla_met: round1(inputs.sla_met),
                service_spread: round1(inputs.service_spread),
                failure_rate: round1(inputs.failure_rate),
                service_time: round1(inputs.service_time),
                nps: nps.round() as i32,
                queue_change: percent_change(inputs.queue_time, prev_inputs.queue_time),
                sla_change: percent_change(inputs.sla_met, prev_inputs.sla_met),
                spread_change: percent_change(inputs.service_spread, prev_inputs.service_spread),
                failure_change: percent_change(inputs.failure_rate, prev_inputs.failure_rate),
                service_time_change: percent_change(inputs.service_time, prev_inputs.service_time),
            }
        })
        .collect();

    rows.sort_by(|a, b| b.sqi.cmp(&a.sqi));
    rows
}

/// Score every area over the current and previous windows with the same
/// shared formula, sorted by decline with the worst decliner first.
pub fn area_sqi_declines(
    regions: &[Region],
    daily: &[DailyMetrics],
    monthly: &[MonthlyMetrics],
    window_days: usize,
) -> Vec<AreaSqiRow> {
    let mut rows = Vec::new();

    for region in regions {
        for area in &region.areas {
            let branch_ids: HashSet<&str> =
                area.branches.iter().map(|b| b.id.as_str()).collect();
            let area_daily: Vec<&DailyMetrics> = daily
                .iter()
                .filter(|m| branch_ids.contains(m.branch_id.as_str()))
                .collect();
            let area_monthly: Vec<&MonthlyMetrics> = monthly
                .iter()
                .filter(|m| branch_ids.contains(m.branch_id.as_str()))
                .collect();

            let (current, previous) = split_windows(&area_daily, window_days);
            let (nps, prev_nps) = nps_pair(&area_monthly);

            let sqi = service_quality_index(&window_inputs(&current, nps));
            let previous_sqi = service_quality_index(&window_inputs(&previous, prev_nps));

            rows.push(AreaSqiRow {
                area_id: area.id.clone(),
                area_name: area.name.clone(),
                region_id: region.id.clone(),
                sqi,
                previous_sqi,
                sqi_decline: sqi_decline(previous_sqi, sqi),
            });
        }
    }

    rows.sort_by(|a, b| b.sqi_decline.cmp(&a.sqi_decline));
    rows
}
