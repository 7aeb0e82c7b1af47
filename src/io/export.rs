use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::DonationService;
use crate::domain::{Donation, User};

/// Database snapshot for full export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub user: User,
    pub donations: Vec<Donation>,
}

/// Exporter for converting ledger data to various formats
pub struct Exporter<'a> {
    service: &'a DonationService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a DonationService) -> Self {
        Self { service }
    }

    /// Export all donations to CSV format. Amounts stay in raw cents so
    /// the output re-imports cleanly into spreadsheets without rounding.
    pub async fn export_donations_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let donations = self.service.list_donations(None, None).await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        // Write header
        csv_writer.write_record(&[
            "id",
            "date",
            "amount_cents",
            "is_automatic",
            "comment",
            "created_at",
        ])?;

        let mut count = 0;
        for donation in &donations {
            csv_writer.write_record(&[
                donation.id.to_string(),
                donation.date.to_string(),
                donation.amount_cents.to_string(),
                donation.is_automatic.to_string(),
                donation.comment.clone().unwrap_or_default(),
                donation.created_at.to_rfc3339(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export all donations as a JSON array, newest date first.
    pub async fn export_donations_json<W: Write>(&self, mut writer: W) -> Result<usize> {
        let donations = self.service.list_donations(None, None).await?;

        let json = serde_json::to_string_pretty(&donations)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(donations.len())
    }

    /// Export full database as JSON snapshot
    pub async fn export_full_json<W: Write>(&self, mut writer: W) -> Result<DatabaseSnapshot> {
        let user = self.service.get_user().await?;
        let donations = self.service.list_donations(None, None).await?;

        let snapshot = DatabaseSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            user,
            donations,
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}
