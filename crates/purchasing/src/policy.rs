//! Approval policy engine.
//!
//! A pure mapping from a document's monetary total to the number of approval
//! levels it requires, plus the single-step `advance` rule. No IO, no clock.

use serde::{Deserialize, Serialize};

use procureflow_core::{DomainError, DomainResult, Money};

/// Default tier boundary: totals above 10,000.00 currency units need a
/// second approval level.
const DEFAULT_THRESHOLD_MINOR_UNITS: u64 = 1_000_000;

/// Amount-tiered approval policy.
///
/// Boundaries are ascending amounts; a total strictly above a boundary needs
/// one more approval level. The step function is monotonic by construction:
/// a higher amount can never require fewer levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalPolicy {
    boundaries: Vec<Money>,
}

impl ApprovalPolicy {
    /// Policy with the given ascending tier boundaries.
    pub fn new(boundaries: Vec<Money>) -> DomainResult<Self> {
        if boundaries.windows(2).any(|w| w[0] >= w[1]) {
            return Err(DomainError::validation(
                "approval tier boundaries must be strictly ascending",
            ));
        }
        Ok(Self { boundaries })
    }

    /// Two-tier policy with a single boundary (the reference shape).
    pub fn single_threshold(boundary: Money) -> Self {
        Self {
            boundaries: vec![boundary],
        }
    }

    /// Number of approval levels a document with this total requires.
    ///
    /// Totals at or below the first boundary need exactly one level.
    pub fn required_levels(&self, total: Money) -> u8 {
        let above = self.boundaries.iter().filter(|b| total > **b).count();
        1 + above as u8
    }
}

impl Default for ApprovalPolicy {
    fn default() -> Self {
        Self::single_threshold(Money::from_minor_units(DEFAULT_THRESHOLD_MINOR_UNITS))
    }
}

/// Result of advancing a document's approval by one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    /// The new approval level.
    pub level: u8,
    /// True iff the new level reached the required count.
    pub approved: bool,
}

/// Advance an approval level by one, capped at `required`.
///
/// Advancing a document already at its required level is not a silent no-op:
/// it fails `AlreadyApproved` so repeated calls never double-count.
pub fn advance(level: u8, required: u8) -> DomainResult<Advance> {
    if level >= required {
        return Err(DomainError::AlreadyApproved);
    }
    let level = level + 1;
    Ok(Advance {
        level,
        approved: level == required,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn one_level_at_or_below_the_threshold() {
        let policy = ApprovalPolicy::default();
        assert_eq!(policy.required_levels(Money::from_minor_units(500_000)), 1);
        assert_eq!(policy.required_levels(Money::from_minor_units(1_000_000)), 1);
    }

    #[test]
    fn two_levels_above_the_threshold() {
        let policy = ApprovalPolicy::default();
        assert_eq!(policy.required_levels(Money::from_minor_units(1_000_001)), 2);
        assert_eq!(policy.required_levels(Money::from_minor_units(1_500_000)), 2);
    }

    #[test]
    fn boundaries_must_be_ascending() {
        let err = ApprovalPolicy::new(vec![
            Money::from_minor_units(200),
            Money::from_minor_units(100),
        ])
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn multi_tier_policies_step_once_per_boundary() {
        let policy = ApprovalPolicy::new(vec![
            Money::from_minor_units(100_000),
            Money::from_minor_units(1_000_000),
            Money::from_minor_units(10_000_000),
        ])
        .unwrap();
        assert_eq!(policy.required_levels(Money::from_minor_units(100_000)), 1);
        assert_eq!(policy.required_levels(Money::from_minor_units(100_001)), 2);
        assert_eq!(policy.required_levels(Money::from_minor_units(2_000_000)), 3);
        assert_eq!(policy.required_levels(Money::from_minor_units(20_000_000)), 4);
    }

    #[test]
    fn advance_steps_and_reports_full_approval() {
        assert_eq!(advance(0, 2).unwrap(), Advance { level: 1, approved: false });
        assert_eq!(advance(1, 2).unwrap(), Advance { level: 2, approved: true });
        assert_eq!(advance(0, 1).unwrap(), Advance { level: 1, approved: true });
    }

    #[test]
    fn advance_at_required_fails_already_approved() {
        assert_eq!(advance(2, 2).unwrap_err(), DomainError::AlreadyApproved);
        assert_eq!(advance(1, 1).unwrap_err(), DomainError::AlreadyApproved);
    }

    proptest! {
        #[test]
        fn required_levels_is_monotonic(a in 0u64..5_000_000, b in 0u64..5_000_000) {
            let policy = ApprovalPolicy::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let lo_levels = policy.required_levels(Money::from_minor_units(lo));
            let hi_levels = policy.required_levels(Money::from_minor_units(hi));
            prop_assert!(lo_levels <= hi_levels);
        }

        #[test]
        fn advance_never_exceeds_required(level in 0u8..10, required in 1u8..10) {
            match advance(level, required) {
                Ok(adv) => {
                    prop_assert!(adv.level <= required);
                    prop_assert_eq!(adv.level, level + 1);
                    prop_assert_eq!(adv.approved, adv.level == required);
                }
                Err(e) => {
                    prop_assert!(level >= required);
                    prop_assert_eq!(e, DomainError::AlreadyApproved);
                }
            }
        }
    }
}
