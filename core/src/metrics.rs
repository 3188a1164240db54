//! Metric record types and typed field selectors.
//!
//! One DailyMetrics per (branch, date) and one MonthlyMetrics per
//! (branch, month). Records are produced once by synth.rs and never
//! mutated; every percentage field lies in [0, 100] and every
//! queue-time field is non-negative.

use crate::types::BranchId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Share of customers per queue-duration bucket, in whole percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueDistribution {
    pub under_5: u32,
    pub from_5_to_15: u32,
    pub from_15_to_30: u32,
    pub over_30: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMetrics {
    pub date: NaiveDate,
    pub branch_id: BranchId,

    // Speed
    pub avg_queue_time: f64, // minutes
    pub sla_met: f64,        // percentage 0-100
    pub queue_p50: f64,
    pub queue_p80: f64,
    pub queue_distribution: QueueDistribution,

    // By service channel
    pub cs_queue_time: f64,
    pub teller_queue_time: f64,

    // Consistency
    pub service_failure_rate: f64, // percentage, lower is better
    pub service_spread: f64,       // P80 - P50 of queue time

    // Efficiency
    pub total_transactions: u32,
    pub transactions_per_counter: u32,
    pub transactions_per_staff: u32,
    pub avg_service_time: f64, // minutes
    pub utilisation_rate: f64, // percentage 0-100

    // Channel mix
    pub cash_transactions: u32,
    pub non_cash_transactions: u32,
    pub digital_eligible_offline: u32,
}

/// Complaint counts for one branch-month, by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplaintBreakdown {
    pub queue_time: u32,
    pub staff_behavior: u32,
    pub system_issues: u32,
    pub product_info: u32,
    pub other: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyMetrics {
    /// Calendar-month label, "YYYY-MM". Lexicographic order is
    /// chronological.
    pub month: String,
    pub branch_id: BranchId,

    // Aggregated operational
    pub avg_queue_time: f64,
    pub sla_met: f64,
    pub consistency_rate: f64,
    pub avg_transactions_per_day: u32,

    // Perception
    pub ses_score: f64, // 1-5 scale
    pub nps_score: i32, // -100..100
    pub nsi_score: u32, // 0-100

    pub complaints: ComplaintBreakdown,
    pub google_review_score: f64, // 1-5 scale
}

/// Closed set of numeric daily fields the query surface can select.
/// Replaces a stringly metric key: an unknown field cannot be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DailyField {
    AvgQueueTime,
    SlaMet,
    QueueP50,
    QueueP80,
    CsQueueTime,
    TellerQueueTime,
    ServiceFailureRate,
    ServiceSpread,
    TotalTransactions,
    TransactionsPerCounter,
    TransactionsPerStaff,
    AvgServiceTime,
    UtilisationRate,
    CashTransactions,
    NonCashTransactions,
    DigitalEligibleOffline,
}

impl DailyField {
    pub fn value_of(&self, m: &DailyMetrics) -> f64 {
        match self {
            Self::AvgQueueTime => m.avg_queue_time,
            Self::SlaMet => m.sla_met,
            Self::QueueP50 => m.queue_p50,
            Self::QueueP80 => m.queue_p80,
            Self::CsQueueTime => m.cs_queue_time,
            Self::TellerQueueTime => m.teller_queue_time,
            Self::ServiceFailureRate => m.service_failure_rate,
            Self::ServiceSpread => m.service_spread,
            Self::TotalTransactions => f64::from(m.total_transactions),
            Self::TransactionsPerCounter => f64::from(m.transactions_per_counter),
            Self::TransactionsPerStaff => f64::from(m.transactions_per_staff),
            Self::AvgServiceTime => m.avg_service_time,
            Self::UtilisationRate => m.utilisation_rate,
            Self::CashTransactions => f64::from(m.cash_transactions),
            Self::NonCashTransactions => f64::from(m.non_cash_transactions),
            Self::DigitalEligibleOffline => f64::from(m.digital_eligible_offline),
        }
    }
}
