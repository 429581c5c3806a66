use serde::{Deserialize, Serialize};

use procureflow_core::{DomainError, DomainResult, UserId};

use crate::Role;

/// Authenticated identity for a single request.
///
/// Supplied by the identity collaborator per request and passed explicitly
/// into every lifecycle operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Capability gate for ApprovePR/ApprovePO and explicit rejections.
    pub fn require_approver(&self) -> DomainResult<()> {
        if self.role.can_approve() {
            Ok(())
        } else {
            Err(DomainError::PermissionDenied)
        }
    }
}
