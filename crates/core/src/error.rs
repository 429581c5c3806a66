//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// state-machine violations). Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. empty line items, non-positive quantity).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A referenced record does not resolve (domain-level).
    #[error("not found")]
    NotFound,

    /// The actor lacks the capability required by the operation.
    #[error("permission denied")]
    PermissionDenied,

    /// The operation was attempted from a status that does not permit it.
    #[error("invalid state transition: {0}")]
    InvalidStateTransition(String),

    /// Idempotent re-approval: the document is already fully approved.
    #[error("already approved")]
    AlreadyApproved,

    /// A goods-receipt quantity would exceed the ordered quantity.
    #[error("over-receipt: {0}")]
    OverReceipt(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_transition(msg: impl Into<String>) -> Self {
        Self::InvalidStateTransition(msg.into())
    }

    pub fn over_receipt(msg: impl Into<String>) -> Self {
        Self::OverReceipt(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
