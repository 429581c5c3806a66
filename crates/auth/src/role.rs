use core::str::FromStr;

use serde::{Deserialize, Serialize};

use procureflow_core::DomainError;

/// Role held by an authenticated actor.
///
/// Roles are a closed enumeration: capability checks go through explicit
/// predicates on this type, not string comparison at call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Purchaser,
    Approver,
    Warehouse,
    Finance,
}

impl Role {
    /// Whether this role may approve (or reject) requisitions and orders.
    ///
    /// Only approvers carry the approval capability; admin subsumes it.
    pub fn can_approve(self) -> bool {
        matches!(self, Role::Admin | Role::Approver)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Purchaser => "purchaser",
            Role::Approver => "approver",
            Role::Warehouse => "warehouse",
            Role::Finance => "finance",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "purchaser" => Ok(Role::Purchaser),
            "approver" => Ok(Role::Approver),
            "warehouse" => Ok(Role::Warehouse),
            "finance" => Ok(Role::Finance),
            other => Err(DomainError::validation(format!("unknown role: {other}"))),
        }
    }
}
