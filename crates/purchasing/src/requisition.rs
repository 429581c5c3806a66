use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use procureflow_core::{DomainError, DomainResult, Entity, EntityId, Money, UserId};
use procureflow_inventory::ItemId;

/// Purchase requisition identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequisitionId(pub EntityId);

impl RequisitionId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for RequisitionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Requisition status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequisitionStatus {
    Draft,
    Submitted,
    Approved,
    Rejected,
}

/// Requisition line item. Item name is a snapshot taken at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequisitionLine {
    pub item_id: ItemId,
    pub item_name: String,
    pub quantity: u64,
    pub unit_price: Money,
}

impl RequisitionLine {
    pub fn line_total(&self) -> DomainResult<Money> {
        self.unit_price
            .checked_mul(self.quantity)
            .ok_or_else(|| DomainError::validation("line total overflows"))
    }
}

/// Internal request to buy, precursor to a purchase order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRequisition {
    id: RequisitionId,
    pr_number: String,
    requester_id: UserId,
    requester_name: String,
    department: String,
    justification: Option<String>,
    lines: Vec<RequisitionLine>,
    total_amount: Money,
    status: RequisitionStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PurchaseRequisition {
    /// Create a requisition directly in `submitted` status with the total
    /// computed from its lines (never caller-supplied).
    pub fn submit(
        id: RequisitionId,
        pr_number: impl Into<String>,
        requester_id: UserId,
        requester_name: impl Into<String>,
        department: impl Into<String>,
        justification: Option<String>,
        lines: Vec<RequisitionLine>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        validate_lines(&lines)?;
        let total_amount = Money::sum(
            lines
                .iter()
                .map(|l| l.line_total())
                .collect::<DomainResult<Vec<_>>>()?,
        )?;

        Ok(Self {
            id,
            pr_number: pr_number.into(),
            requester_id,
            requester_name: requester_name.into(),
            department: department.into(),
            justification,
            lines,
            total_amount,
            status: RequisitionStatus::Submitted,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn pr_number(&self) -> &str {
        &self.pr_number
    }

    pub fn requester_id(&self) -> UserId {
        self.requester_id
    }

    pub fn requester_name(&self) -> &str {
        &self.requester_name
    }

    pub fn department(&self) -> &str {
        &self.department
    }

    pub fn justification(&self) -> Option<&str> {
        self.justification.as_deref()
    }

    pub fn lines(&self) -> &[RequisitionLine] {
        &self.lines
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    pub fn status(&self) -> RequisitionStatus {
        self.status
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// `submitted` → `approved`. The caller has already checked the actor's
    /// approver capability.
    pub fn approve(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status != RequisitionStatus::Submitted {
            return Err(DomainError::invalid_transition(
                "only submitted requisitions can be approved",
            ));
        }
        self.status = RequisitionStatus::Approved;
        self.updated_at = now;
        Ok(())
    }

    /// `submitted` → `rejected` (terminal).
    pub fn reject(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status != RequisitionStatus::Submitted {
            return Err(DomainError::invalid_transition(
                "only submitted requisitions can be rejected",
            ));
        }
        self.status = RequisitionStatus::Rejected;
        self.updated_at = now;
        Ok(())
    }
}

impl Entity for PurchaseRequisition {
    type Id = RequisitionId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

fn validate_lines(lines: &[RequisitionLine]) -> DomainResult<()> {
    if lines.is_empty() {
        return Err(DomainError::validation("requisition must have line items"));
    }
    for line in lines {
        if line.quantity == 0 {
            return Err(DomainError::validation("line quantity must be positive"));
        }
        if line.unit_price.is_zero() {
            return Err(DomainError::validation("line unit price must be positive"));
        }
    }
    Ok(())
}
