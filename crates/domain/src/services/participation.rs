//! Participation accounting.
//!
//! A plan's participation shares must add up to exactly 100 before they
//! can be stored. `ParticipationLedger` only exists in a valid state, so
//! holding one is proof the shares were checked.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::DomainError;
use shared::validation::validate_percentage;

/// Required total of all shares of one plan.
pub const REQUIRED_TOTAL: i32 = 100;

/// Validated participation shares keyed by normalized member email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipationLedger {
    shares: BTreeMap<String, i32>,
}

impl ParticipationLedger {
    /// Validates raw shares.
    ///
    /// Emails are trimmed and lowercased. Every share must be within 0..=100,
    /// no two keys may normalize to the same member, and the total must be
    /// exactly 100.
    pub fn new(raw: HashMap<String, i32>) -> Result<Self, DomainError> {
        let mut shares = BTreeMap::new();

        for (email, percentage) in raw {
            let key = normalize_email(&email);
            if key.is_empty() {
                return Err(DomainError::Validation(
                    "Member email must not be blank".to_string(),
                ));
            }

            validate_percentage(percentage).map_err(|_| {
                DomainError::Validation(format!(
                    "Share for {} must be between 0 and 100",
                    key
                ))
            })?;

            if shares.insert(key.clone(), percentage).is_some() {
                return Err(DomainError::Validation(format!(
                    "{} appears more than once",
                    key
                )));
            }
        }

        let total: i32 = shares.values().sum();
        if total != REQUIRED_TOTAL {
            return Err(DomainError::ParticipationTotal(total));
        }

        Ok(Self { shares })
    }

    /// Rejects shares for anyone outside the given team roster.
    pub fn ensure_members_within(&self, roster: &HashSet<String>) -> Result<(), DomainError> {
        let roster: HashSet<String> = roster.iter().map(|e| normalize_email(e)).collect();

        match self.shares.keys().find(|email| !roster.contains(*email)) {
            Some(outsider) => Err(DomainError::NotTeamMember(outsider.clone())),
            None => Ok(()),
        }
    }

    /// Shares in email order.
    pub fn shares(&self) -> impl Iterator<Item = (&str, i32)> {
        self.shares.iter().map(|(email, pct)| (email.as_str(), *pct))
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::SafeEmail;
    use fake::Fake;

    fn shares(pairs: &[(&str, i32)]) -> HashMap<String, i32> {
        pairs.iter().map(|(e, p)| (e.to_string(), *p)).collect()
    }

    #[test]
    fn test_exact_hundred_accepted() {
        let ledger =
            ParticipationLedger::new(shares(&[("a@example.com", 60), ("b@example.com", 40)]))
                .unwrap();
        assert_eq!(ledger.shares().map(|(_, pct)| pct).sum::<i32>(), 100);
        assert_eq!(ledger.shares().count(), 2);
    }

    #[test]
    fn test_short_total_rejected() {
        let result =
            ParticipationLedger::new(shares(&[("a@example.com", 60), ("b@example.com", 30)]));
        assert_eq!(result, Err(DomainError::ParticipationTotal(90)));
    }

    #[test]
    fn test_over_total_rejected() {
        let result =
            ParticipationLedger::new(shares(&[("a@example.com", 70), ("b@example.com", 40)]));
        assert_eq!(result, Err(DomainError::ParticipationTotal(110)));
    }

    #[test]
    fn test_empty_rejected() {
        let result = ParticipationLedger::new(HashMap::new());
        assert_eq!(result, Err(DomainError::ParticipationTotal(0)));
    }

    #[test]
    fn test_single_member_with_everything() {
        let email: String = SafeEmail().fake();
        let ledger = ParticipationLedger::new(shares(&[(&email, 100)])).unwrap();
        assert_eq!(
            ledger.shares().map(|(e, _)| e.to_string()).collect::<Vec<_>>(),
            vec![email.to_lowercase()]
        );
    }

    #[test]
    fn test_out_of_range_share_rejected() {
        let result =
            ParticipationLedger::new(shares(&[("a@example.com", 120), ("b@example.com", -20)]));
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_zero_share_allowed() {
        let ledger =
            ParticipationLedger::new(shares(&[("a@example.com", 100), ("b@example.com", 0)]))
                .unwrap();
        assert_eq!(ledger.shares().count(), 2);
    }

    #[test]
    fn test_emails_normalized_and_duplicates_rejected() {
        let result = ParticipationLedger::new(shares(&[
            ("A@Example.com", 50),
            (" a@example.com ", 50),
        ]));
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_blank_email_rejected() {
        let result = ParticipationLedger::new(shares(&[("  ", 100)]));
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_shares_iterate_in_email_order() {
        let ledger = ParticipationLedger::new(shares(&[
            ("zed@example.com", 10),
            ("amy@example.com", 90),
        ]))
        .unwrap();
        let order: Vec<&str> = ledger.shares().map(|(e, _)| e).collect();
        assert_eq!(order, vec!["amy@example.com", "zed@example.com"]);
    }

    #[test]
    fn test_members_must_belong_to_team() {
        let ledger =
            ParticipationLedger::new(shares(&[("a@example.com", 60), ("b@example.com", 40)]))
                .unwrap();

        let roster: HashSet<String> = ["A@example.com".to_string(), "b@example.com".to_string()]
            .into_iter()
            .collect();
        assert!(ledger.ensure_members_within(&roster).is_ok());

        let roster: HashSet<String> = ["a@example.com".to_string()].into_iter().collect();
        assert_eq!(
            ledger.ensure_members_within(&roster),
            Err(DomainError::NotTeamMember("b@example.com".to_string()))
        );
    }
}
