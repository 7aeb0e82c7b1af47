use serde::{Deserialize, Serialize};

use super::Cents;

/// Well-known key of the singleton user row. Exactly one user exists per
/// database; modeling it as a fixed-key row keeps the pledge durable
/// across restarts and concurrent processes.
pub const DEFAULT_USER_ID: &str = "default";

/// Starting pledge for a freshly initialized database: 38.00 per day.
pub const DEFAULT_DAILY_AMOUNT_CENTS: Cents = 3800;

/// The pledging user. Holds the daily amount applied to each
/// automatically generated donation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub daily_amount_cents: Cents,
}

impl User {
    pub fn new(daily_amount_cents: Cents) -> Self {
        assert!(
            daily_amount_cents >= 0,
            "Daily amount cannot be negative"
        );
        Self {
            id: DEFAULT_USER_ID.to_string(),
            daily_amount_cents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_has_well_known_id() {
        let user = User::new(DEFAULT_DAILY_AMOUNT_CENTS);
        assert_eq!(user.id, DEFAULT_USER_ID);
        assert_eq!(user.daily_amount_cents, 3800);
    }

    #[test]
    fn test_zero_pledge_is_allowed() {
        let user = User::new(0);
        assert_eq!(user.daily_amount_cents, 0);
    }

    #[test]
    #[should_panic(expected = "Daily amount cannot be negative")]
    fn test_negative_pledge_rejected() {
        User::new(-100);
    }
}
