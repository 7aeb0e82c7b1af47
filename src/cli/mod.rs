use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::application::{AppError, DonationService};
use crate::domain::{format_cents, parse_cents, parse_date};

/// Donatio - Daily Donation Tracker
#[derive(Parser)]
#[command(name = "donatio")]
#[command(about = "A local-first tracker for daily charitable donations")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "donatio.db")]
    pub database: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Pledge management commands
    #[command(subcommand)]
    Pledge(PledgeCommands),

    /// Record a donation
    Add {
        /// Amount to donate (e.g., "38.00" or "38")
        amount: String,

        /// Date the donation counts toward (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Note attached to the donation
        #[arg(short, long)]
        comment: Option<String>,

        /// Record as an automatic entry (at most one per date)
        #[arg(long)]
        automatic: bool,
    },

    /// List donations
    History {
        /// Filter from date (YYYY-MM-DD)
        #[arg(long)]
        from_date: Option<String>,

        /// Filter to date (YYYY-MM-DD)
        #[arg(long)]
        to_date: Option<String>,
    },

    /// Show all-time, month-to-date, and year-to-date totals
    Summary,

    /// Record the missing automatic donations for every day through today
    Backfill,

    /// Per-day donation totals for recent days
    Report {
        /// Number of days to include, ending today
        #[arg(short, long, default_value = "30")]
        days: u32,
    },

    /// Verify ledger consistency
    Check,

    /// Export data to CSV or JSON
    Export {
        /// What to export: donations, full
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Format: csv, json (default: csv for donations, json for full)
        #[arg(short, long)]
        format: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum PledgeCommands {
    /// Show the current daily pledge
    Show,

    /// Set the daily pledge amount
    Set {
        /// New daily amount (e.g., "38.00" or "38"; 0 pauses accrual)
        amount: String,
    },
}

impl Cli {
    async fn auto_backfill(&self, service: &DonationService) -> Result<()> {
        let inserted = service.backfill_daily_donations().await?;

        // Log only if verbose flag is set
        if self.verbose && !inserted.is_empty() {
            eprintln!("[Auto-backfill] Added {} daily donation(s)", inserted.len());
            for donation in inserted {
                eprintln!(
                    "  {}: {}",
                    donation.date,
                    format_cents(donation.amount_cents)
                );
            }
        }
        Ok(())
    }

    pub async fn run(self) -> Result<()> {
        // Bring the ledger up to date before command dispatch, mirroring the
        // on-every-open trigger. Init has no database yet and Backfill does
        // this explicitly with its own reporting.
        if !matches!(self.command, Commands::Init | Commands::Backfill) {
            if let Ok(service) = DonationService::connect(&self.database).await {
                let _ = self.auto_backfill(&service).await;
            }
        }

        match self.command {
            Commands::Init => {
                DonationService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Pledge(pledge_cmd) => {
                let service = DonationService::connect(&self.database).await?;
                run_pledge_command(&service, pledge_cmd).await?;
            }

            Commands::Add {
                amount,
                date,
                comment,
                automatic,
            } => {
                let service = DonationService::connect(&self.database).await?;
                let amount_cents =
                    parse_cents(&amount).map_err(|e| AppError::InvalidAmount(e.to_string()))?;

                let date = date
                    .map(|date_str| {
                        parse_date(&date_str)
                            .map_err(|e| AppError::InvalidDate(format!("'{}': {}", date_str, e)))
                    })
                    .transpose()?;

                let donation = service
                    .add_donation(amount_cents, date, automatic, comment)
                    .await?;

                println!(
                    "Recorded donation: {} on {} ({})",
                    format_cents(donation.amount_cents),
                    donation.date,
                    donation.id
                );
            }

            Commands::History { from_date, to_date } => {
                let service = DonationService::connect(&self.database).await?;
                run_history_command(&service, from_date, to_date).await?;
            }

            Commands::Summary => {
                let service = DonationService::connect(&self.database).await?;
                run_summary_command(&service).await?;
            }

            Commands::Backfill => {
                let service = DonationService::connect(&self.database).await?;
                run_backfill_command(&service).await?;
            }

            Commands::Report { days } => {
                let service = DonationService::connect(&self.database).await?;
                run_report_command(&service, days).await?;
            }

            Commands::Check => {
                let service = DonationService::connect(&self.database).await?;
                run_check_command(&service).await?;
            }

            Commands::Export {
                export_type,
                output,
                format,
            } => {
                let service = DonationService::connect(&self.database).await?;
                run_export_command(&service, &export_type, output.as_deref(), format.as_deref())
                    .await?;
            }
        }

        Ok(())
    }
}

async fn run_pledge_command(service: &DonationService, cmd: PledgeCommands) -> Result<()> {
    match cmd {
        PledgeCommands::Show => {
            let user = service.get_user().await?;
            println!("Daily pledge: {}", format_cents(user.daily_amount_cents));
        }

        PledgeCommands::Set { amount } => {
            let amount_cents = parse_cents(&amount)
                .map_err(|e| AppError::InvalidDailyAmount(e.to_string()))?;

            let user = service.set_daily_amount(amount_cents).await?;
            println!(
                "Daily pledge set to {}",
                format_cents(user.daily_amount_cents)
            );
        }
    }
    Ok(())
}

async fn run_history_command(
    service: &DonationService,
    from_date: Option<String>,
    to_date: Option<String>,
) -> Result<()> {
    let from = from_date
        .map(|date_str| parse_date(&date_str))
        .transpose()
        .map_err(|e| AppError::InvalidDate(e.to_string()))?;
    let to = to_date
        .map(|date_str| parse_date(&date_str))
        .transpose()
        .map_err(|e| AppError::InvalidDate(e.to_string()))?;

    let donations = service.list_donations(from, to).await?;

    if donations.is_empty() {
        println!("No donations found.");
    } else {
        println!("{:<12} {:>10} {:<8} COMMENT", "DATE", "AMOUNT", "TYPE");
        println!("{}", "-".repeat(60));
        for donation in &donations {
            let kind = if donation.is_automatic { "auto" } else { "manual" };
            let comment = donation.comment.as_deref().unwrap_or("");

            println!(
                "{:<12} {:>10} {:<8} {}",
                donation.date.to_string(),
                format_cents(donation.amount_cents),
                kind,
                truncate(comment, 30)
            );
        }
    }
    Ok(())
}

async fn run_summary_command(service: &DonationService) -> Result<()> {
    let summary = service.summary().await?;

    println!(
        "{:<12} {:>12}",
        "All time:",
        format_cents(summary.total_all_time_cents)
    );
    println!(
        "{:<12} {:>12}",
        "This month:",
        format_cents(summary.total_this_month_cents)
    );
    println!(
        "{:<12} {:>12}",
        "This year:",
        format_cents(summary.total_this_year_cents)
    );
    Ok(())
}

async fn run_backfill_command(service: &DonationService) -> Result<()> {
    let inserted = service.backfill_daily_donations().await?;

    if inserted.is_empty() {
        println!("Ledger is up to date; no days were missing.");
    } else {
        println!("Added {} automatic donation(s):", inserted.len());
        for donation in &inserted {
            println!(
                "  {} {}",
                donation.date,
                format_cents(donation.amount_cents)
            );
        }
    }
    Ok(())
}

async fn run_report_command(service: &DonationService, days: u32) -> Result<()> {
    let totals = service.daily_totals(days).await?;

    println!("{:<12} {:>10}", "DATE", "TOTAL");
    println!("{}", "-".repeat(23));

    let mut sum = 0;
    for entry in &totals {
        println!(
            "{:<12} {:>10}",
            entry.date.to_string(),
            format_cents(entry.total_cents)
        );
        sum += entry.total_cents;
    }

    println!("{}", "-".repeat(23));
    println!("{:<12} {:>10}", "Total", format_cents(sum));
    Ok(())
}

async fn run_check_command(service: &DonationService) -> Result<()> {
    println!("Checking ledger consistency...\n");

    let report = service.check_integrity().await?;

    println!("Donations: {}", report.donation_count);
    println!("  Automatic: {}", report.automatic_count);
    println!("  Manual:    {}", report.manual_count);
    println!();

    if report.is_healthy() {
        println!("Ledger is consistent.");
    } else {
        println!("Issues found:");
        for issue in &report.issues {
            println!("  - {}", issue);
        }
        anyhow::bail!("Ledger consistency check failed");
    }

    Ok(())
}

async fn run_export_command(
    service: &DonationService,
    export_type: &str,
    output: Option<&str>,
    format: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{stdout, Write};

    let exporter = Exporter::new(service);

    // Each export type has a natural default format
    let format = match format {
        Some(format) => format,
        None => match export_type {
            "full" => "json",
            _ => "csv",
        },
    };

    // Determine output writer
    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match (export_type, format) {
        ("donations", "csv") => {
            let count = exporter.export_donations_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} donations", count);
            }
        }
        ("donations", "json") => {
            let count = exporter.export_donations_json(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} donations", count);
            }
        }
        ("full", "json") => {
            let snapshot = exporter.export_full_json(writer).await?;
            if output.is_some() {
                eprintln!(
                    "Exported full database: {} donations",
                    snapshot.donations.len()
                );
            }
        }
        ("full", other) => {
            anyhow::bail!(
                "Invalid format '{}' for a full export. Valid formats: json",
                other
            );
        }
        ("donations", other) => {
            anyhow::bail!("Invalid format '{}'. Valid formats: csv, json", other);
        }
        _ => {
            anyhow::bail!(
                "Invalid export type '{}'. Valid types: donations, full",
                export_type
            );
        }
    }

    Ok(())
}

// Comments are arbitrary UTF-8, so count and cut whole chars rather
// than slicing at a byte offset.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
