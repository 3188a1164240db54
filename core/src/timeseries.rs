//! Time-series bucketing and period-over-period comparison.
//!
//! Every function filters by branch membership before any windowing or
//! bucketing, and guards every mean and ratio against an empty or zero
//! denominator; degenerate selections return zeros, never NaN.

use crate::{
    metrics::{DailyField, DailyMetrics, MonthlyMetrics},
    types::{mean, round1, round2, BranchId},
};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Daily,
    Weekly,
    Monthly,
}

/// One chart point. The key is "YYYY-MM-DD", "YYYY-W##" or "YYYY-MM"
/// depending on granularity; lexicographic order is chronological for
/// all three.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub date: String,
    pub value: f64,
}

/// Current vs immediately preceding window of equal length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodComparison {
    pub current: f64,
    pub previous: f64,
    pub change: f64,
    pub change_percent: f64,
}

/// Week label derived from day-of-year: "YYYY-W##".
pub fn week_key(date: NaiveDate) -> String {
    let days_since_jan1 = i64::from(date.ordinal0());
    // Weekday of Jan 1, Sunday-based, recovered by walking back from
    // the date's own weekday.
    let jan1_dow = (i64::from(date.weekday().num_days_from_sunday()) - days_since_jan1)
        .rem_euclid(7);
    let week = (days_since_jan1 + jan1_dow + 1 + 6) / 7; // ceiling
    format!("{}-W{:02}", date.year(), week)
}

fn bucket_key(date: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Daily => date.format("%Y-%m-%d").to_string(),
        Granularity::Weekly => week_key(date),
        Granularity::Monthly => date.format("%Y-%m").to_string(),
    }
}

/// Bucket the selected branches' records by day, week or month and
/// average the field per bucket. Buckets come back sorted ascending.
pub fn generate_time_series(
    records: &[DailyMetrics],
    branch_ids: &[BranchId],
    field: DailyField,
    granularity: Granularity,
) -> Vec<TimeSeriesPoint> {
    let members: HashSet<&str> = branch_ids.iter().map(String::as_str).collect();

    let mut buckets: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for m in records {
        if !members.contains(m.branch_id.as_str()) {
            continue;
        }
        buckets
            .entry(bucket_key(m.date, granularity))
            .or_default()
            .push(field.value_of(m));
    }

    buckets
        .into_iter()
        .map(|(date, values)| TimeSeriesPoint {
            date,
            value: round1(mean(values)),
        })
        .collect()
}

/// Average the field over the last `window_days` distinct dates and the
/// `window_days` dates immediately preceding them. Selections with too
/// little history simply yield a zero previous average and a zero
/// percent change.
pub fn compute_period_comparison(
    records: &[DailyMetrics],
    branch_ids: &[BranchId],
    field: DailyField,
    window_days: usize,
) -> PeriodComparison {
    let members: HashSet<&str> = branch_ids.iter().map(String::as_str).collect();
    let filtered: Vec<&DailyMetrics> = records
        .iter()
        .filter(|m| members.contains(m.branch_id.as_str()))
        .collect();

    let mut dates: Vec<NaiveDate> = filtered
        .iter()
        .map(|m| m.date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let split = dates.len().saturating_sub(window_days);
    let current_dates: HashSet<NaiveDate> = dates.split_off(split).into_iter().collect();
    let prev_split = dates.len().saturating_sub(window_days);
    let previous_dates: HashSet<NaiveDate> = dates.split_off(prev_split).into_iter().collect();

    let current_avg = mean(
        filtered
            .iter()
            .filter(|m| current_dates.contains(&m.date))
            .map(|m| field.value_of(m)),
    );
    let previous_avg = mean(
        filtered
            .iter()
            .filter(|m| previous_dates.contains(&m.date))
            .map(|m| field.value_of(m)),
    );

    let change = current_avg - previous_avg;
    let change_percent = if previous_avg != 0.0 {
        (change / previous_avg) * 100.0
    } else {
        0.0
    };

    PeriodComparison {
        current: round1(current_avg),
        previous: round1(previous_avg),
        change: round1(change),
        change_percent: round1(change_percent),
    }
}

/// Per-date average of the field across the selected branches, sorted
/// ascending by date.
pub fn aggregate_daily_trend(
    records: &[DailyMetrics],
    branch_ids: &[BranchId],
    field: DailyField,
) -> Vec<TimeSeriesPoint> {
    generate_time_series(records, branch_ids, field, Granularity::Daily)
}

/// One month of averaged perception scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerceptionPoint {
    pub month: String,
    pub ses: f64,
    pub nps: i32,
    pub nsi: i32,
}

/// Monthly SES/NPS trend for the selected branches over the trailing
/// `last_n` months. NSI is recomputed as the blend of the two rounded
/// scores rather than averaged from the records.
pub fn monthly_perception_series(
    records: &[MonthlyMetrics],
    branch_ids: &[BranchId],
    last_n: usize,
) -> Vec<PerceptionPoint> {
    let members: HashSet<&str> = branch_ids.iter().map(String::as_str).collect();
    let filtered: Vec<&MonthlyMetrics> = records
        .iter()
        .filter(|m| members.contains(m.branch_id.as_str()))
        .collect();

    let months: Vec<&str> = filtered
        .iter()
        .map(|m| m.month.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let skip = months.len().saturating_sub(last_n);

    months
        .into_iter()
        .skip(skip)
        .map(|month| {
            let ses = round2(mean(
                filtered
                    .iter()
                    .filter(|m| m.month == month)
                    .map(|m| m.ses_score),
            ));
            let nps = mean(
                filtered
                    .iter()
                    .filter(|m| m.month == month)
                    .map(|m| f64::from(m.nps_score)),
            )
            .round() as i32;
            let nsi = (((ses / 5.0) * 100.0 + (f64::from(nps) + 100.0) / 2.0) / 2.0).round() as i32;
            PerceptionPoint {
                month: month.to_string(),
                ses,
                nps,
                nsi,
            }
        })
        .collect()
}
