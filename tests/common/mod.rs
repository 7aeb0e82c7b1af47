// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::{Duration, NaiveDate};
use donatio::application::DonationService;
use donatio::domain::{Cents, Donation, today_utc};
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(DonationService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = DonationService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// SQLite URL for the database created by `test_service`
pub fn test_db_url(temp_dir: &TempDir) -> String {
    let db_path = temp_dir.path().join("test.db");
    format!("sqlite:{}", db_path.to_str().unwrap())
}

/// Filesystem path of the database created by `test_service`, for
/// commands that take a plain path
pub fn test_db_path(temp_dir: &TempDir) -> String {
    let db_path = temp_dir.path().join("test.db");
    db_path.to_str().unwrap().to_string()
}

/// Helper to parse a date string into NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Test fixture: common donation seeds
pub struct SeedDonations;

impl SeedDonations {
    /// Record a manual donation on the given date
    pub async fn manual(
        service: &DonationService,
        amount_cents: Cents,
        date_str: &str,
    ) -> Result<Donation> {
        let donation = service
            .add_donation(amount_cents, Some(parse_date(date_str)), false, None)
            .await?;
        Ok(donation)
    }

    /// Record an automatic donation on the given date
    pub async fn automatic(
        service: &DonationService,
        amount_cents: Cents,
        date_str: &str,
    ) -> Result<Donation> {
        let donation = service
            .add_donation(amount_cents, Some(parse_date(date_str)), true, None)
            .await?;
        Ok(donation)
    }

    /// Record an automatic donation the given number of days before today,
    /// leaving a gap for backfill tests to fill
    pub async fn automatic_days_ago(
        service: &DonationService,
        amount_cents: Cents,
        days: i64,
    ) -> Result<Donation> {
        let date = today_utc() - Duration::days(days);
        let donation = service
            .add_donation(amount_cents, Some(date), true, None)
            .await?;
        Ok(donation)
    }
}
