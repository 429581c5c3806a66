use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use procureflow_core::{DomainError, DomainResult, Entity, EntityId};

/// Supplier identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SupplierId(pub EntityId);

impl SupplierId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for SupplierId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Supplier status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupplierStatus {
    Active,
    Inactive,
}

/// Contact information for a supplier.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Supplier master record.
///
/// The id is immutable once created; contact fields are mutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    id: SupplierId,
    name: String,
    contact: ContactInfo,
    tax_id: Option<String>,
    status: SupplierStatus,
    created_at: DateTime<Utc>,
}

impl Supplier {
    /// Register a new supplier in `active` status.
    pub fn register(
        id: SupplierId,
        name: impl Into<String>,
        contact: ContactInfo,
        tax_id: Option<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("supplier name cannot be empty"));
        }
        Ok(Self {
            id,
            name,
            contact,
            tax_id,
            status: SupplierStatus::Active,
            created_at: now,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    pub fn tax_id(&self) -> Option<&str> {
        self.tax_id.as_deref()
    }

    pub fn status(&self) -> SupplierStatus {
        self.status
    }

    /// Whether this supplier may appear on new purchase documents.
    pub fn is_active(&self) -> bool {
        self.status == SupplierStatus::Active
    }

    /// Update mutable contact details. `None` keeps the existing value.
    pub fn update_details(
        &mut self,
        name: Option<String>,
        contact: Option<ContactInfo>,
        tax_id: Option<String>,
    ) -> DomainResult<()> {
        if let Some(name) = name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("supplier name cannot be empty"));
            }
            self.name = name;
        }
        if let Some(contact) = contact {
            self.contact = contact;
        }
        if let Some(tax_id) = tax_id {
            self.tax_id = Some(tax_id);
        }
        Ok(())
    }

    /// Take the supplier out of service. Existing documents keep their
    /// snapshot of the name; new orders are refused elsewhere.
    pub fn deactivate(&mut self) {
        self.status = SupplierStatus::Inactive;
    }
}

impl Entity for Supplier {
    type Id = SupplierId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
