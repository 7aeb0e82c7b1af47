use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid daily amount: {0}")]
    InvalidDailyAmount(String),

    #[error("User not found; run `init` to bootstrap the database")]
    UserNotFound,

    #[error("An automatic donation already exists for {0}")]
    DuplicateAutomaticDonation(NaiveDate),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}
