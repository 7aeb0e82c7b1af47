mod common;

use anyhow::Result;
use chrono::Duration;
use common::test_service;
use donatio::application::AppError;
use donatio::domain::{month_start, today_utc, year_start};

#[tokio::test]
async fn test_summary_on_empty_ledger_is_all_zero() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let summary = service.summary().await?;

    assert_eq!(summary.total_all_time_cents, 0);
    assert_eq!(summary.total_this_month_cents, 0);
    assert_eq!(summary.total_this_year_cents, 0);

    Ok(())
}

#[tokio::test]
async fn test_summary_counts_today_in_all_windows() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service.add_donation(2000, None, false, None).await?;

    let summary = service.summary().await?;

    assert_eq!(summary.total_all_time_cents, 2000);
    assert_eq!(summary.total_this_month_cents, 2000);
    assert_eq!(summary.total_this_year_cents, 2000);

    Ok(())
}

#[tokio::test]
async fn test_summary_prior_year_counts_only_toward_all_time() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let today = today_utc();
    let last_year = year_start(today) - Duration::days(1);

    service.add_donation(1000, Some(last_year), false, None).await?;
    service.add_donation(2000, Some(today), false, None).await?;

    let summary = service.summary().await?;

    assert_eq!(summary.total_all_time_cents, 3000);
    assert_eq!(summary.total_this_year_cents, 2000);
    assert_eq!(summary.total_this_month_cents, 2000);

    Ok(())
}

#[tokio::test]
async fn test_summary_includes_first_day_of_month() -> Result<()> {
    let (service, _temp) = test_service().await?;

    // The month window starts on the first, inclusive
    let first = month_start(today_utc());
    service.add_donation(500, Some(first), false, None).await?;

    let summary = service.summary().await?;

    assert_eq!(summary.total_this_month_cents, 500);
    assert_eq!(summary.total_this_year_cents, 500);
    assert_eq!(summary.total_all_time_cents, 500);

    Ok(())
}

#[tokio::test]
async fn test_summary_includes_first_day_of_year() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let first = year_start(today_utc());
    service.add_donation(500, Some(first), false, None).await?;

    let summary = service.summary().await?;

    assert_eq!(summary.total_this_year_cents, 500);
    assert_eq!(summary.total_all_time_cents, 500);

    Ok(())
}

#[tokio::test]
async fn test_summary_combines_manual_and_automatic_entries() -> Result<()> {
    let (service, _temp) = test_service().await?;

    // One automatic entry for today plus a manual one
    service.backfill_daily_donations().await?;
    service.add_donation(1200, None, false, None).await?;

    let summary = service.summary().await?;

    assert_eq!(summary.total_all_time_cents, 5000);
    assert_eq!(summary.total_this_month_cents, 5000);
    assert_eq!(summary.total_this_year_cents, 5000);

    Ok(())
}

#[tokio::test]
async fn test_daily_totals_zero_fill_missing_days() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let today = today_utc();
    service.add_donation(1000, Some(today), false, None).await?;
    service
        .add_donation(500, Some(today - Duration::days(2)), false, None)
        .await?;

    let totals = service.daily_totals(7).await?;

    assert_eq!(totals.len(), 7);
    assert_eq!(totals[0].date, today - Duration::days(6));
    assert_eq!(totals[6].date, today);
    assert_eq!(totals[6].total_cents, 1000);
    assert_eq!(totals[4].total_cents, 500);

    let zero_days = totals.iter().filter(|t| t.total_cents == 0).count();
    assert_eq!(zero_days, 5);

    Ok(())
}

#[tokio::test]
async fn test_daily_totals_on_empty_ledger_span_full_window() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let totals = service.daily_totals(30).await?;

    assert_eq!(totals.len(), 30);
    assert!(totals.iter().all(|t| t.total_cents == 0));

    // Days are contiguous and ascending
    for pair in totals.windows(2) {
        assert_eq!(pair[1].date, pair[0].date + Duration::days(1));
    }

    Ok(())
}

#[tokio::test]
async fn test_daily_totals_combine_same_day_entries() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service.backfill_daily_donations().await?;
    service.add_donation(1200, None, false, None).await?;

    let totals = service.daily_totals(1).await?;

    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0].date, today_utc());
    assert_eq!(totals[0].total_cents, 5000);

    Ok(())
}

#[tokio::test]
async fn test_daily_totals_exclude_entries_outside_window() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .add_donation(9000, Some(today_utc() - Duration::days(10)), false, None)
        .await?;

    let totals = service.daily_totals(7).await?;

    assert_eq!(totals.len(), 7);
    assert!(totals.iter().all(|t| t.total_cents == 0));

    Ok(())
}

#[tokio::test]
async fn test_daily_totals_reject_window_beyond_calendar() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let result = service.daily_totals(u32::MAX).await;

    assert!(matches!(result, Err(AppError::InvalidAmount(_))));

    Ok(())
}
