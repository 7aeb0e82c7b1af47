/// Consistency problems detectable from ledger-wide aggregates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerIssue {
    /// Calendar dates carrying more than one automatic donation
    DuplicateAutomaticDates { dates: i64 },
    /// Manual entries whose amount is zero or negative
    NonPositiveManualAmounts { count: i64 },
    /// Automatic entries whose amount is negative
    NegativeAutomaticAmounts { count: i64 },
    /// The singleton user row is missing
    MissingUser,
}

impl std::fmt::Display for LedgerIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerIssue::DuplicateAutomaticDates { dates } => {
                write!(f, "{} date(s) have more than one automatic donation", dates)
            }
            LedgerIssue::NonPositiveManualAmounts { count } => {
                write!(f, "{} manual donation(s) have a non-positive amount", count)
            }
            LedgerIssue::NegativeAutomaticAmounts { count } => {
                write!(f, "{} automatic donation(s) have a negative amount", count)
            }
            LedgerIssue::MissingUser => {
                write!(f, "user record is missing; run `init` to bootstrap it")
            }
        }
    }
}

/// Outcome of a ledger consistency check.
#[derive(Debug, Clone)]
pub struct LedgerReport {
    pub donation_count: i64,
    pub automatic_count: i64,
    pub manual_count: i64,
    pub issues: Vec<LedgerIssue>,
}

impl LedgerReport {
    pub fn is_healthy(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Build a consistency report from ledger-wide aggregates.
/// The counts come from the store; this stays pure so the rules are
/// testable without a database.
pub fn build_ledger_report(
    donation_count: i64,
    automatic_count: i64,
    duplicate_automatic_dates: i64,
    nonpositive_manual_count: i64,
    negative_automatic_count: i64,
    user_present: bool,
) -> LedgerReport {
    let mut issues = Vec::new();

    if duplicate_automatic_dates > 0 {
        issues.push(LedgerIssue::DuplicateAutomaticDates {
            dates: duplicate_automatic_dates,
        });
    }
    if nonpositive_manual_count > 0 {
        issues.push(LedgerIssue::NonPositiveManualAmounts {
            count: nonpositive_manual_count,
        });
    }
    if negative_automatic_count > 0 {
        issues.push(LedgerIssue::NegativeAutomaticAmounts {
            count: negative_automatic_count,
        });
    }
    if !user_present {
        issues.push(LedgerIssue::MissingUser);
    }

    LedgerReport {
        donation_count,
        automatic_count,
        manual_count: donation_count - automatic_count,
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_healthy_ledger() {
        let report = build_ledger_report(10, 7, 0, 0, 0, true);

        assert!(report.is_healthy());
        assert_eq!(report.donation_count, 10);
        assert_eq!(report.automatic_count, 7);
        assert_eq!(report.manual_count, 3);
    }

    #[test]
    fn test_empty_ledger_is_healthy() {
        let report = build_ledger_report(0, 0, 0, 0, 0, true);
        assert!(report.is_healthy());
    }

    #[test]
    fn test_duplicate_automatic_dates_reported() {
        let report = build_ledger_report(10, 7, 2, 0, 0, true);

        assert!(!report.is_healthy());
        assert_eq!(
            report.issues,
            vec![LedgerIssue::DuplicateAutomaticDates { dates: 2 }]
        );
    }

    #[test]
    fn test_bad_amounts_reported() {
        let report = build_ledger_report(10, 7, 0, 1, 3, true);

        assert!(!report.is_healthy());
        assert!(report
            .issues
            .contains(&LedgerIssue::NonPositiveManualAmounts { count: 1 }));
        assert!(report
            .issues
            .contains(&LedgerIssue::NegativeAutomaticAmounts { count: 3 }));
    }

    #[test]
    fn test_missing_user_reported() {
        let report = build_ledger_report(0, 0, 0, 0, 0, false);

        assert!(!report.is_healthy());
        assert_eq!(report.issues, vec![LedgerIssue::MissingUser]);
    }
}
