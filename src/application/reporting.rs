use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::Cents;

/// The three running totals shown on every summary. All windows derive
/// from the same `today` so they stay mutually consistent within a call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonationSummary {
    pub total_all_time_cents: Cents,
    pub total_this_month_cents: Cents,
    pub total_this_year_cents: Cents,
}

/// One day's combined donation total, zero for days without entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total_cents: Cents,
}
