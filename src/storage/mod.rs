mod repository;

pub use repository::*;

/// SQL migration for initial schema
pub const MIGRATION_001_INITIAL: &str = include_str!("migrations/001_initial.sql");

/// SQL migration enforcing at most one automatic donation per date
pub const MIGRATION_002_AUTOMATIC_GUARD: &str = include_str!("migrations/002_automatic_guard.sql");
