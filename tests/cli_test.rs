mod common;

use anyhow::Result;
use clap::Parser;
use common::{test_db_path, test_service};
use donatio::cli::Cli;
use donatio::domain::Donation;

#[tokio::test]
async fn test_history_renders_long_multibyte_comments() -> Result<()> {
    let (service, temp) = test_service().await?;
    let db = test_db_path(&temp);

    // Accented comments are wider in bytes than in chars; the second one
    // is long enough to get cut for the table column
    service
        .add_donation(2500, None, false, Some("é".repeat(16)))
        .await?;
    service
        .add_donation(1800, None, false, Some("à".repeat(40)))
        .await?;

    let cli = Cli::try_parse_from(["donatio", "--database", db.as_str(), "history"])?;
    cli.run().await?;

    Ok(())
}

#[tokio::test]
async fn test_export_honors_json_format_for_donations() -> Result<()> {
    let (service, temp) = test_service().await?;
    let db = test_db_path(&temp);
    let out_path = temp.path().join("out.json");
    let out = out_path.to_str().unwrap();

    service
        .add_donation(1200, None, false, Some("relief".to_string()))
        .await?;

    let cli = Cli::try_parse_from([
        "donatio",
        "--database",
        db.as_str(),
        "export",
        "donations",
        "--format",
        "json",
        "--output",
        out,
    ])?;
    cli.run().await?;

    let contents = std::fs::read_to_string(&out_path)?;
    let donations: Vec<Donation> = serde_json::from_str(&contents)?;

    // The manual entry plus the automatic one added by the pre-command
    // backfill
    assert_eq!(donations.len(), 2);
    assert!(
        donations
            .iter()
            .any(|d| d.comment.as_deref() == Some("relief"))
    );

    Ok(())
}

#[tokio::test]
async fn test_export_defaults_to_csv_for_donations() -> Result<()> {
    let (service, temp) = test_service().await?;
    let db = test_db_path(&temp);
    let out_path = temp.path().join("out.csv");
    let out = out_path.to_str().unwrap();

    service.add_donation(900, None, false, None).await?;

    let cli = Cli::try_parse_from([
        "donatio",
        "--database",
        db.as_str(),
        "export",
        "donations",
        "--output",
        out,
    ])?;
    cli.run().await?;

    let contents = std::fs::read_to_string(&out_path)?;
    assert!(contents.starts_with("id,date,amount_cents"));

    Ok(())
}

#[tokio::test]
async fn test_full_export_accepts_json_only() -> Result<()> {
    let (_service, temp) = test_service().await?;
    let db = test_db_path(&temp);
    let out_path = temp.path().join("out.csv");
    let out = out_path.to_str().unwrap();

    let cli = Cli::try_parse_from([
        "donatio",
        "--database",
        db.as_str(),
        "export",
        "full",
        "--format",
        "csv",
        "--output",
        out,
    ])?;

    assert!(cli.run().await.is_err());

    Ok(())
}

#[tokio::test]
async fn test_report_rejects_oversized_day_window() -> Result<()> {
    let (_service, temp) = test_service().await?;
    let db = test_db_path(&temp);

    let cli = Cli::try_parse_from([
        "donatio",
        "--database",
        db.as_str(),
        "report",
        "--days",
        "100000000",
    ])?;

    assert!(cli.run().await.is_err());

    Ok(())
}
