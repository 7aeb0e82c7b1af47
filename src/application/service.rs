use chrono::{Duration, NaiveDate};
use std::collections::HashMap;

use crate::domain::{
    backfill_dates, build_ledger_report, month_start, today_utc, year_start, Cents, Donation,
    LedgerReport, User, DEFAULT_DAILY_AMOUNT_CENTS,
};
use crate::storage::Repository;

use super::{AppError, DailyTotal, DonationSummary};

/// Application service providing high-level operations for the donation
/// ledger. This is the primary interface for any client (CLI, API, TUI, etc.).
pub struct DonationService {
    repo: Repository,
}

impl DonationService {
    /// Create a new donation service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Initialize a new database at the given path and bootstrap the
    /// singleton user with the default pledge.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        repo.ensure_user(&User::new(DEFAULT_DAILY_AMOUNT_CENTS))
            .await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    // ========================
    // User operations
    // ========================

    /// Get the singleton user.
    pub async fn get_user(&self) -> Result<User, AppError> {
        self.repo.get_user().await?.ok_or(AppError::UserNotFound)
    }

    /// Update the daily pledge. Zero is allowed and effectively pauses
    /// accrual without breaking the backfill; negative values are rejected.
    pub async fn set_daily_amount(&self, amount_cents: Cents) -> Result<User, AppError> {
        if amount_cents < 0 {
            return Err(AppError::InvalidDailyAmount(
                "Daily amount cannot be negative".to_string(),
            ));
        }

        let updated = self.repo.set_daily_amount(amount_cents).await?;
        if !updated {
            return Err(AppError::UserNotFound);
        }

        self.get_user().await
    }

    // ========================
    // Donation operations
    // ========================

    /// Record a donation. The date defaults to the current UTC calendar
    /// day when not given. Repeated identical calls create independent
    /// records; there is no deduplication for manual entries.
    pub async fn add_donation(
        &self,
        amount_cents: Cents,
        date: Option<NaiveDate>,
        is_automatic: bool,
        comment: Option<String>,
    ) -> Result<Donation, AppError> {
        if amount_cents <= 0 {
            return Err(AppError::InvalidAmount(
                "Amount must be positive".to_string(),
            ));
        }

        let date = date.unwrap_or_else(today_utc);
        let mut donation = Donation::new(date, amount_cents, is_automatic);
        if let Some(comment) = comment {
            donation = donation.with_comment(comment);
        }

        if donation.is_automatic {
            // Goes through the conditional insert so the one-per-day
            // invariant holds even for hand-entered automatic rows.
            let inserted = self.repo.insert_donation_if_absent(&donation).await?;
            if !inserted {
                return Err(AppError::DuplicateAutomaticDonation(date));
            }
        } else {
            self.repo.insert_donation(&donation).await?;
        }

        Ok(donation)
    }

    /// Ensure every calendar day through today has its automatic donation,
    /// filling any gap since the most recent one in a single run. Safe to
    /// call repeatedly and concurrently: each day is inserted with a
    /// conditional insert, so a day already covered is a no-op and two
    /// overlapping runs cannot double-charge it. Returns the donations
    /// actually inserted by this run.
    pub async fn backfill_daily_donations(&self) -> Result<Vec<Donation>, AppError> {
        // One pledge snapshot for the whole run; a mid-run settings change
        // only affects later runs.
        let user = self.get_user().await?;
        let today = today_utc();

        let latest = self.repo.latest_automatic_donation().await?;

        let mut inserted = Vec::new();
        for date in backfill_dates(latest.map(|donation| donation.date), today) {
            let donation = Donation::automatic(date, user.daily_amount_cents);
            if self.repo.insert_donation_if_absent(&donation).await? {
                inserted.push(donation);
            }
        }

        Ok(inserted)
    }

    /// List donations, optionally bounded by inclusive calendar dates,
    /// newest date first.
    pub async fn list_donations(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Donation>, AppError> {
        Ok(self.repo.list_donations(from, to).await?)
    }

    // ========================
    // Reporting operations
    // ========================

    /// Compute the all-time, month-to-date, and year-to-date totals.
    /// All three windows share one `today` reference.
    pub async fn summary(&self) -> Result<DonationSummary, AppError> {
        let today = today_utc();

        let total_all_time_cents = self.repo.sum_amounts(None).await?;
        let total_this_month_cents = self.repo.sum_amounts(Some(month_start(today))).await?;
        let total_this_year_cents = self.repo.sum_amounts(Some(year_start(today))).await?;

        Ok(DonationSummary {
            total_all_time_cents,
            total_this_month_cents,
            total_this_year_cents,
        })
    }

    /// Per-day combined totals for the last `days` calendar days ending
    /// today, ascending, with zero entries for days without donations.
    pub async fn daily_totals(&self, days: u32) -> Result<Vec<DailyTotal>, AppError> {
        let today = today_utc();
        let from = today
            .checked_sub_signed(Duration::days(days as i64 - 1))
            .ok_or_else(|| {
                AppError::InvalidAmount(format!("Day window {} exceeds the calendar", days))
            })?;

        let sums = self.repo.sum_amounts_by_day(from, today).await?;
        let by_date: HashMap<NaiveDate, Cents> = sums.into_iter().collect();

        let mut totals = Vec::with_capacity(days as usize);
        let mut current = from;
        while current <= today {
            totals.push(DailyTotal {
                date: current,
                total_cents: by_date.get(&current).copied().unwrap_or(0),
            });
            current = current + Duration::days(1);
        }

        Ok(totals)
    }

    // ========================
    // Integrity operations
    // ========================

    /// Check ledger consistency and return a report.
    pub async fn check_integrity(&self) -> Result<LedgerReport, AppError> {
        let stats = self.repo.ledger_stats().await?;

        Ok(build_ledger_report(
            stats.donation_count,
            stats.automatic_count,
            stats.duplicate_automatic_dates,
            stats.nonpositive_manual_count,
            stats.negative_automatic_count,
            stats.user_present,
        ))
    }
}
