//! Metric synthesizer: one daily and one monthly record per branch
//! per period.
//!
//! Both functions are pure given the rng: the same branch, period index
//! and rng state always produce the same record. The caller owns the
//! iteration order (outer loop over branches, inner loop over periods;
//! see dataset.rs); reordering calls breaks reproducibility because all
//! draws come from one shared stream.

use crate::{
    hierarchy::{Branch, TrendStatus, VolumeClass},
    metrics::{ComplaintBreakdown, DailyMetrics, MonthlyMetrics, QueueDistribution},
    rng::SeededRng,
    types::{round1, round2},
};
use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Daily drift per day-index: Improving branches trend down (better),
/// Declining branches trend up, Stagnant branches hold flat.
fn daily_trend_factor(status: TrendStatus, day_index: u32) -> f64 {
    match status {
        TrendStatus::Improving => -0.002 * f64::from(day_index),
        TrendStatus::Declining => 0.003 * f64::from(day_index),
        TrendStatus::Stagnant => 0.0,
    }
}

fn monthly_trend_factor(status: TrendStatus, month_index: u32) -> f64 {
    match status {
        TrendStatus::Improving => -0.05 * f64::from(month_index),
        TrendStatus::Declining => 0.08 * f64::from(month_index),
        TrendStatus::Stagnant => 0.0,
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn synthesize_daily(
    branch: &Branch,
    date: NaiveDate,
    day_index: u32,
    rng: &mut SeededRng,
) -> DailyMetrics {
    let volume_multiplier = match branch.volume_class {
        VolumeClass::High => 1.5,
        VolumeClass::Medium => 1.0,
        VolumeClass::Low => 0.6,
    };
    let trend = daily_trend_factor(branch.status, day_index);
    let weekday_factor = if is_weekend(date) { 0.6 } else { 1.0 };

    // Base queue time in minutes, clamped to the [2, 35] domain.
    let base_queue_time = 12.0 + rng.gaussian(0.0, 3.0) + trend * 100.0;
    let avg_queue_time = (base_queue_time * volume_multiplier * weekday_factor).clamp(2.0, 35.0);

    // Percentile jitters of the mean. The factor ranges are disjoint
    // and the clamped mean is >= 2, so P80 > P50 always holds.
    let queue_p50 = avg_queue_time * rng.range(0.7, 0.9);
    let queue_p80 = avg_queue_time * rng.range(1.2, 1.6);
    debug_assert!(queue_p80 > queue_p50);

    // SLA is inversely related to queue time (15-minute threshold).
    let sla_met = (100.0 - (avg_queue_time - 10.0) * 3.0 + rng.gaussian(0.0, 5.0)).clamp(50.0, 99.0);

    let service_failure_rate = (5.0 + rng.gaussian(0.0, 3.0) + trend * 50.0).clamp(1.0, 15.0);

    let base_transactions = match branch.volume_class {
        VolumeClass::High => 450.0,
        VolumeClass::Medium => 280.0,
        VolumeClass::Low => 150.0,
    };
    let total_transactions =
        (base_transactions * weekday_factor * rng.range(0.8, 1.2)).round() as u32;

    let counter_count = match branch.volume_class {
        VolumeClass::High => 6.0,
        VolumeClass::Medium => 4.0,
        VolumeClass::Low => 2.0,
    };
    let staff_count = counter_count * 1.5;

    DailyMetrics {
        date,
        branch_id: branch.id.clone(),
        avg_queue_time: round1(avg_queue_time),
        sla_met: round1(sla_met),
        queue_p50: round1(queue_p50),
        queue_p80: round1(queue_p80),
        queue_distribution: QueueDistribution {
            under_5: (rng.range(0.1, 0.25) * 100.0).round() as u32,
            from_5_to_15: (rng.range(0.35, 0.5) * 100.0).round() as u32,
            from_15_to_30: (rng.range(0.15, 0.3) * 100.0).round() as u32,
            over_30: (rng.range(0.05, 0.15) * 100.0).round() as u32,
        },
        cs_queue_time: round1(avg_queue_time * rng.range(0.9, 1.1)),
        teller_queue_time: round1(avg_queue_time * rng.range(0.8, 1.0)),
        service_failure_rate: round1(service_failure_rate),
        service_spread: round1(queue_p80 - queue_p50),
        total_transactions,
        transactions_per_counter: (f64::from(total_transactions) / counter_count).round() as u32,
        transactions_per_staff: (f64::from(total_transactions) / staff_count).round() as u32,
        avg_service_time: round1(rng.range(4.0, 8.0)),
        utilisation_rate: rng.range(60.0, 95.0).min(100.0).round(),
        cash_transactions: (f64::from(total_transactions) * rng.range(0.3, 0.5)).round() as u32,
        non_cash_transactions: (f64::from(total_transactions) * rng.range(0.5, 0.7)).round() as u32,
        digital_eligible_offline: (f64::from(total_transactions) * rng.range(0.1, 0.25)).round()
            as u32,
    }
}

pub fn synthesize_monthly(
    branch: &Branch,
    month: &str,
    month_index: u32,
    rng: &mut SeededRng,
) -> MonthlyMetrics {
    let trend = monthly_trend_factor(branch.status, month_index);
    let volume_multiplier = match branch.volume_class {
        VolumeClass::High => 1.3,
        VolumeClass::Medium => 1.0,
        VolumeClass::Low => 0.7,
    };

    // SES tracks the inverse of the drifting queue time.
    let base_queue_time = 12.0 + trend * 10.0;
    let ses_base = 4.2 - (base_queue_time - 10.0) * 0.05;
    let ses_score = (ses_base + rng.gaussian(0.0, 0.2)).clamp(2.5, 5.0);

    // NPS and NSI are both linear transforms of SES plus noise.
    let nps_score = (((ses_score - 3.0) * 50.0 + rng.gaussian(0.0, 15.0)).round() as i32)
        .clamp(-100, 100);
    let nsi_score = ((70.0 + (ses_score - 3.5) * 20.0 + rng.gaussian(0.0, 5.0)).round() as i64)
        .clamp(0, 100) as u32;

    MonthlyMetrics {
        month: month.to_string(),
        branch_id: branch.id.clone(),
        avg_queue_time: round1((12.0 + trend * 10.0) * volume_multiplier),
        sla_met: round1(85.0 - trend * 20.0),
        consistency_rate: round1(5.0 + trend * 8.0),
        avg_transactions_per_day: (250.0 * volume_multiplier).round() as u32,
        ses_score: round2(ses_score),
        nps_score,
        nsi_score,
        complaints: ComplaintBreakdown {
            queue_time: rng.int(2, 15) as u32,
            staff_behavior: rng.int(1, 8) as u32,
            system_issues: rng.int(0, 5) as u32,
            product_info: rng.int(1, 6) as u32,
            other: rng.int(0, 4) as u32,
        },
        google_review_score: round1(ses_score * 0.8 + rng.range(0.5, 1.0)),
    }
}

/// The contiguous daily horizon, starting at `start`.
pub fn daily_dates(start: NaiveDate, days: u32) -> Vec<NaiveDate> {
    (0..days)
        .map(|i| start + Duration::days(i64::from(i)))
        .collect()
}

/// Calendar-month labels "YYYY-MM", starting at (year, month).
pub fn month_labels(start_year: i32, start_month: u32, count: u32) -> Vec<String> {
    (0..count)
        .map(|i| {
            let zero_based = start_month - 1 + i;
            let y = start_year + (zero_based / 12) as i32;
            let m = zero_based % 12 + 1;
            format!("{y}-{m:02}")
        })
        .collect()
}
