use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Cents;

pub type DonationId = Uuid;

/// Comment carried by every system-generated daily entry.
pub const AUTOMATIC_COMMENT: &str = "Automatic daily contribution";

/// A donation records one contribution attributed to a calendar day.
/// Donations are immutable - the ledger is append-only and entries are
/// never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Donation {
    pub id: DonationId,
    /// Calendar day the contribution counts toward, distinct from `created_at`
    pub date: NaiveDate,
    /// Amount in cents. Positive for manual entries; automatic entries
    /// carry the pledge snapshot, which may be zero.
    pub amount_cents: Cents,
    /// True for system-generated daily entries, false for user-entered ones
    pub is_automatic: bool,
    /// Free text for manual entries; automatic entries carry a fixed sentinel
    pub comment: Option<String>,
    /// When the record was created, display-only
    pub created_at: DateTime<Utc>,
}

impl Donation {
    /// Create a user-entered donation.
    pub fn new(date: NaiveDate, amount_cents: Cents, is_automatic: bool) -> Self {
        assert!(amount_cents > 0, "Donation amount must be positive");
        Self {
            id: Uuid::new_v4(),
            date,
            amount_cents,
            is_automatic,
            comment: None,
            created_at: Utc::now(),
        }
    }

    /// Create a system-generated daily entry carrying the pledge snapshot.
    /// A zero pledge still produces an entry, so every backfilled day is
    /// visibly accounted for.
    pub fn automatic(date: NaiveDate, amount_cents: Cents) -> Self {
        assert!(
            amount_cents >= 0,
            "Automatic donation amount cannot be negative"
        );
        Self {
            id: Uuid::new_v4(),
            date,
            amount_cents,
            is_automatic: true,
            comment: Some(AUTOMATIC_COMMENT.to_string()),
            created_at: Utc::now(),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Every calendar day an automatic donation is still missing for, in
/// ascending order: the day after the most recent automatic donation
/// through `today` inclusive, or just `today` when none exists yet.
/// Never yields a date after `today`, so a stray future-dated entry
/// produces an empty result rather than a gap-filling loop into the future.
pub fn backfill_dates(latest_automatic: Option<NaiveDate>, today: NaiveDate) -> Vec<NaiveDate> {
    let start = match latest_automatic {
        Some(latest) => latest + Duration::days(1),
        None => today,
    };

    let mut dates = Vec::new();
    let mut current = start;
    while current <= today {
        dates.push(current);
        current = current + Duration::days(1);
    }
    dates
}
