//! Bucketing, windowed comparison and the divide-by-zero guards.

use branchpulse_core::{
    metrics::{DailyField, DailyMetrics, QueueDistribution},
    timeseries::{
        aggregate_daily_trend, compute_period_comparison, generate_time_series, Granularity,
    },
};
use chrono::NaiveDate;

fn day(branch: &str, date: &str, queue: f64) -> DailyMetrics {
    DailyMetrics {
        date: date.parse::<NaiveDate>().expect("valid date"),
        branch_id: branch.into(),
        avg_queue_time: queue,
        sla_met: 85.0,
        queue_p50: queue * 0.8,
        queue_p80: queue * 1.4,
        queue_distribution: QueueDistribution {
            under_5: 18,
            from_5_to_15: 42,
            from_15_to_30: 25,
            over_30: 10,
        },
        cs_queue_time: queue,
        teller_queue_time: queue * 0.9,
        service_failure_rate: 5.0,
        service_spread: queue * 0.6,
        total_transactions: 280,
        transactions_per_counter: 70,
        transactions_per_staff: 47,
        avg_service_time: 6.0,
        utilisation_rate: 80.0,
        cash_transactions: 110,
        non_cash_transactions: 170,
        digital_eligible_offline: 50,
    }
}

fn ids(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn daily_series_averages_per_date_across_branches() {
    let records = vec![
        day("B1", "2025-07-01", 10.0),
        day("B2", "2025-07-01", 20.0),
        day("B1", "2025-07-02", 12.0),
    ];

    let series = generate_time_series(
        &records,
        &ids(&["B1", "B2"]),
        DailyField::AvgQueueTime,
        Granularity::Daily,
    );

    assert_eq!(series.len(), 2);
    assert_eq!(series[0].date, "2025-07-01");
    assert_eq!(series[0].value, 15.0);
    assert_eq!(series[1].date, "2025-07-02");
    assert_eq!(series[1].value, 12.0);
}

#[test]
fn series_excludes_non_member_branches() {
    let records = vec![
        day("B1", "2025-07-01", 10.0),
        day("B2", "2025-07-01", 30.0),
    ];

    let series = generate_time_series(
        &records,
        &ids(&["B1"]),
        DailyField::AvgQueueTime,
        Granularity::Daily,
    );

    assert_eq!(series.len(), 1);
    assert_eq!(series[0].value, 10.0);
}

#[test]
fn weekly_buckets_group_adjacent_days() {
    // 2025-06-30 (Mon) and 2025-07-01 (Tue) share a week; 2025-07-07
    // starts the next one.
    let records = vec![
        day("B1", "2025-06-30", 10.0),
        day("B1", "2025-07-01", 14.0),
        day("B1", "2025-07-07", 20.0),
    ];

    let series = generate_time_series(
        &records,
        &ids(&["B1"]),
        DailyField::AvgQueueTime,
        Granularity::Weekly,
    );

    assert_eq!(series.len(), 2);
    assert_eq!(series[0].value, 12.0);
    assert_eq!(series[1].value, 20.0);
}

#[test]
fn monthly_buckets_use_calendar_months() {
    let records = vec![
        day("B1", "2025-07-30", 10.0),
        day("B1", "2025-07-31", 20.0),
        day("B1", "2025-08-01", 30.0),
    ];

    let series = generate_time_series(
        &records,
        &ids(&["B1"]),
        DailyField::AvgQueueTime,
        Granularity::Monthly,
    );

    assert_eq!(series.len(), 2);
    assert_eq!(series[0].date, "2025-07");
    assert_eq!(series[0].value, 15.0);
    assert_eq!(series[1].date, "2025-08");
    assert_eq!(series[1].value, 30.0);
}

#[test]
fn period_comparison_splits_windows_by_distinct_dates() {
    let mut records = Vec::new();
    // 14 days: first 7 at 10.0, last 7 at 20.0.
    for d in 1..=7 {
        records.push(day("B1", &format!("2025-07-{d:02}"), 10.0));
    }
    for d in 8..=14 {
        records.push(day("B1", &format!("2025-07-{d:02}"), 20.0));
    }

    let cmp = compute_period_comparison(&records, &ids(&["B1"]), DailyField::AvgQueueTime, 7);

    assert_eq!(cmp.current, 20.0);
    assert_eq!(cmp.previous, 10.0);
    assert_eq!(cmp.change, 10.0);
    assert_eq!(cmp.change_percent, 100.0);
}

#[test]
fn short_history_never_divides_by_zero() {
    // Fewer dates than the window: the previous window is empty and
    // the percent change must be a plain zero.
    let records = vec![
        day("B1", "2025-07-01", 10.0),
        day("B1", "2025-07-02", 12.0),
        day("B1", "2025-07-03", 14.0),
    ];

    let cmp = compute_period_comparison(&records, &ids(&["B1"]), DailyField::AvgQueueTime, 7);

    assert_eq!(cmp.current, 12.0);
    assert_eq!(cmp.previous, 0.0);
    assert_eq!(cmp.change_percent, 0.0);
    assert!(cmp.change_percent.is_finite());
}

#[test]
fn empty_selection_yields_neutral_comparison() {
    let records = vec![day("B1", "2025-07-01", 10.0)];

    let cmp = compute_period_comparison(&records, &ids(&["B9"]), DailyField::AvgQueueTime, 7);

    assert_eq!(cmp.current, 0.0);
    assert_eq!(cmp.previous, 0.0);
    assert_eq!(cmp.change, 0.0);
    assert_eq!(cmp.change_percent, 0.0);
}

#[test]
fn daily_trend_is_sorted_ascending() {
    let records = vec![
        day("B1", "2025-07-03", 14.0),
        day("B1", "2025-07-01", 10.0),
        day("B1", "2025-07-02", 12.0),
    ];

    let trend = aggregate_daily_trend(&records, &ids(&["B1"]), DailyField::AvgQueueTime);

    let dates: Vec<&str> = trend.iter().map(|p| p.date.as_str()).collect();
    assert_eq!(dates, vec!["2025-07-01", "2025-07-02", "2025-07-03"]);
}
