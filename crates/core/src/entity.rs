//! Entity trait and compare-and-set revision expectations.

use chrono::{DateTime, Utc};

use crate::error::{DomainError, DomainResult};

/// Minimal interface of a durable record.
///
/// This is intentionally small so domain crates can decide how they model
/// state transitions without bringing in any infrastructure concerns.
pub trait Entity {
    /// Strongly-typed record identifier.
    type Id: Copy + Clone + Eq + core::hash::Hash + core::fmt::Debug + Send + Sync + 'static;

    /// Returns the record identifier (opaque, assigned at creation).
    fn id(&self) -> Self::Id;

    /// Creation timestamp, assigned once and never mutated.
    fn created_at(&self) -> DateTime<Utc>;
}

/// Compare-and-set expectation for a record update.
///
/// Per-document serialization of approval levels and receipt quantities
/// rides on this: writers state the revision they read, and the store rejects
/// the update if another writer got there first.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedRevision {
    /// Skip the revision check (safe only for commutative updates).
    Any,
    /// Require the stored record to be at an exact revision.
    Exact(u64),
}

impl ExpectedRevision {
    pub fn matches(self, actual: u64) -> bool {
        match self {
            ExpectedRevision::Any => true,
            ExpectedRevision::Exact(rev) => rev == actual,
        }
    }

    pub fn check(self, actual: u64) -> DomainResult<()> {
        if self.matches(actual) {
            Ok(())
        } else {
            Err(DomainError::validation(format!(
                "revision check failed (expected: {self:?}, actual: {actual})"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_matches_every_revision() {
        assert!(ExpectedRevision::Any.matches(0));
        assert!(ExpectedRevision::Any.matches(42));
    }

    #[test]
    fn exact_matches_only_its_revision() {
        assert!(ExpectedRevision::Exact(3).matches(3));
        assert!(!ExpectedRevision::Exact(3).matches(4));
        assert!(ExpectedRevision::Exact(3).check(4).is_err());
    }
}
