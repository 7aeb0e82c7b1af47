use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::{Cents, Donation, User, DEFAULT_USER_ID};

use super::{MIGRATION_001_INITIAL, MIGRATION_002_AUTOMATIC_GUARD};

/// Statistics for ledger consistency verification.
#[derive(Debug, Clone)]
pub struct LedgerStats {
    pub donation_count: i64,
    pub automatic_count: i64,
    pub duplicate_automatic_dates: i64,
    pub nonpositive_manual_count: i64,
    pub negative_automatic_count: i64,
    pub user_present: bool,
}

/// Repository for persisting and querying the user and donations.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given path.
    /// Creates the database file if it doesn't exist.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;

        sqlx::query(MIGRATION_002_AUTOMATIC_GUARD)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 002")?;

        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // User operations
    // ========================

    /// Insert the singleton user row if it doesn't exist yet.
    pub async fn ensure_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO users (id, daily_amount_cents)
            VALUES (?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(user.daily_amount_cents)
        .execute(&self.pool)
        .await
        .context("Failed to ensure user")?;
        Ok(())
    }

    /// Get the singleton user.
    pub async fn get_user(&self) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, daily_amount_cents
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(DEFAULT_USER_ID)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user")?;

        Ok(row.map(|row| Self::row_to_user(&row)))
    }

    /// Update the daily pledge. Returns false if the user row is missing.
    pub async fn set_daily_amount(&self, amount_cents: Cents) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET daily_amount_cents = ? WHERE id = ?")
            .bind(amount_cents)
            .bind(DEFAULT_USER_ID)
            .execute(&self.pool)
            .await
            .context("Failed to update daily amount")?;
        Ok(result.rows_affected() > 0)
    }

    fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> User {
        User {
            id: row.get("id"),
            daily_amount_cents: row.get("daily_amount_cents"),
        }
    }

    // ========================
    // Donation operations
    // ========================

    /// Insert a donation.
    pub async fn insert_donation(&self, donation: &Donation) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO donations (id, date, amount_cents, is_automatic, comment, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(donation.id.to_string())
        .bind(donation.date.to_string())
        .bind(donation.amount_cents)
        .bind(donation.is_automatic)
        .bind(&donation.comment)
        .bind(donation.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to insert donation")?;
        Ok(())
    }

    /// Insert an automatic donation unless its date is already covered.
    /// The conflict target is the partial unique index on automatic dates,
    /// so the check-and-insert is a single atomic statement. Returns true
    /// if a row was inserted.
    pub async fn insert_donation_if_absent(&self, donation: &Donation) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO donations (id, date, amount_cents, is_automatic, comment, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(date) WHERE is_automatic = 1 DO NOTHING
            "#,
        )
        .bind(donation.id.to_string())
        .bind(donation.date.to_string())
        .bind(donation.amount_cents)
        .bind(donation.is_automatic)
        .bind(&donation.comment)
        .bind(donation.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to insert donation")?;

        Ok(result.rows_affected() > 0)
    }

    /// List donations with optional inclusive date bounds, newest date first.
    pub async fn list_donations(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Donation>> {
        // Build query dynamically based on filters. ISO dates compare
        // lexicographically, so TEXT comparison is chronological.
        let mut query = String::from(
            "SELECT id, date, amount_cents, is_automatic, comment, created_at FROM donations WHERE 1=1",
        );

        let from_str = from.map(|date| date.to_string());
        let to_str = to.map(|date| date.to_string());

        if from.is_some() {
            query.push_str(" AND date >= ?");
        }
        if to.is_some() {
            query.push_str(" AND date <= ?");
        }

        query.push_str(" ORDER BY date DESC");

        let mut sql_query = sqlx::query(&query);

        if let Some(ref from_str) = from_str {
            sql_query = sql_query.bind(from_str);
        }
        if let Some(ref to_str) = to_str {
            sql_query = sql_query.bind(to_str);
        }

        let rows = sql_query
            .fetch_all(&self.pool)
            .await
            .context("Failed to list donations")?;

        rows.iter().map(Self::row_to_donation).collect()
    }

    /// Get the automatic donation with the maximum date. Ties on date
    /// (possible only in databases predating the uniqueness guard) break
    /// by highest creation timestamp.
    pub async fn latest_automatic_donation(&self) -> Result<Option<Donation>> {
        let row = sqlx::query(
            r#"
            SELECT id, date, amount_cents, is_automatic, comment, created_at
            FROM donations
            WHERE is_automatic = 1
            ORDER BY date DESC, created_at DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch latest automatic donation")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_donation(&row)?)),
            None => Ok(None),
        }
    }

    /// Get the automatic donation for an exact date, if any.
    pub async fn automatic_donation_on(&self, date: NaiveDate) -> Result<Option<Donation>> {
        let row = sqlx::query(
            r#"
            SELECT id, date, amount_cents, is_automatic, comment, created_at
            FROM donations
            WHERE is_automatic = 1 AND date = ?
            LIMIT 1
            "#,
        )
        .bind(date.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch automatic donation by date")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_donation(&row)?)),
            None => Ok(None),
        }
    }

    /// Sum donation amounts, optionally restricted to dates on or after
    /// `min_date`. An empty ledger sums to zero.
    pub async fn sum_amounts(&self, min_date: Option<NaiveDate>) -> Result<Cents> {
        let row = match min_date {
            Some(date) => {
                sqlx::query(
                    r#"
                    SELECT COALESCE(SUM(amount_cents), 0) as total
                    FROM donations
                    WHERE date >= ?
                    "#,
                )
                .bind(date.to_string())
                .fetch_one(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT COALESCE(SUM(amount_cents), 0) as total
                    FROM donations
                    "#,
                )
                .fetch_one(&self.pool)
                .await
            }
        }
        .context("Failed to sum donation amounts")?;

        Ok(row.get("total"))
    }

    /// Sum donation amounts per date within an inclusive range, ascending.
    /// Dates without donations are absent from the result.
    pub async fn sum_amounts_by_day(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<(NaiveDate, Cents)>> {
        let rows = sqlx::query(
            r#"
            SELECT date, SUM(amount_cents) as total
            FROM donations
            WHERE date >= ? AND date <= ?
            GROUP BY date
            ORDER BY date
            "#,
        )
        .bind(from.to_string())
        .bind(to.to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to sum donation amounts by day")?;

        rows.iter()
            .map(|row| {
                let date_str: String = row.get("date");
                let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
                    .context("Invalid donation date")?;
                Ok((date, row.get("total")))
            })
            .collect()
    }

    /// Get statistics for consistency checking.
    pub async fn ledger_stats(&self) -> Result<LedgerStats> {
        // Count donations
        let donation_count: i64 = sqlx::query("SELECT COUNT(*) as count FROM donations")
            .fetch_one(&self.pool)
            .await?
            .get("count");

        // Count automatic donations
        let automatic_count: i64 =
            sqlx::query("SELECT COUNT(*) as count FROM donations WHERE is_automatic = 1")
                .fetch_one(&self.pool)
                .await?
                .get("count");

        // Dates carrying more than one automatic donation
        let duplicate_automatic_dates: i64 = sqlx::query(
            r#"
            SELECT COUNT(*) as count FROM (
                SELECT date
                FROM donations
                WHERE is_automatic = 1
                GROUP BY date
                HAVING COUNT(*) > 1
            )
            "#,
        )
        .fetch_one(&self.pool)
        .await?
        .get("count");

        // Manual entries must be strictly positive
        let nonpositive_manual_count: i64 = sqlx::query(
            r#"
            SELECT COUNT(*) as count
            FROM donations
            WHERE is_automatic = 0 AND amount_cents <= 0
            "#,
        )
        .fetch_one(&self.pool)
        .await?
        .get("count");

        // Automatic entries may be zero but never negative
        let negative_automatic_count: i64 = sqlx::query(
            r#"
            SELECT COUNT(*) as count
            FROM donations
            WHERE is_automatic = 1 AND amount_cents < 0
            "#,
        )
        .fetch_one(&self.pool)
        .await?
        .get("count");

        let user_count: i64 = sqlx::query("SELECT COUNT(*) as count FROM users WHERE id = ?")
            .bind(DEFAULT_USER_ID)
            .fetch_one(&self.pool)
            .await?
            .get("count");

        Ok(LedgerStats {
            donation_count,
            automatic_count,
            duplicate_automatic_dates,
            nonpositive_manual_count,
            negative_automatic_count,
            user_present: user_count > 0,
        })
    }

    fn row_to_donation(row: &sqlx::sqlite::SqliteRow) -> Result<Donation> {
        let id_str: String = row.get("id");
        let date_str: String = row.get("date");
        let created_at_str: String = row.get("created_at");

        Ok(Donation {
            id: Uuid::parse_str(&id_str).context("Invalid donation ID")?,
            date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
                .context("Invalid donation date")?,
            amount_cents: row.get("amount_cents"),
            is_automatic: row.get::<i32, _>("is_automatic") != 0,
            comment: row.get("comment"),
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
        })
    }
}
