use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use procureflow_core::{DomainError, DomainResult, Entity, EntityId, Money, UserId};
use procureflow_purchasing::OrderId;
use procureflow_suppliers::SupplierId;

/// Invoice identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(pub EntityId);

impl InvoiceId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Invoice status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

/// Supplier invoice.
///
/// `total_payable` is always derived from the stored subtotal and tax; the
/// pre-summed value is never persisted, so the two cannot drift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    id: InvoiceId,
    invoice_number: String,
    supplier_id: SupplierId,
    supplier_name: String,
    order_id: Option<OrderId>,
    total_amount: Money,
    tax_amount: Money,
    recorded_by: UserId,
    status: InvoiceStatus,
    paid_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl Invoice {
    /// Record a new invoice in `pending` status.
    #[allow(clippy::too_many_arguments)]
    pub fn record(
        id: InvoiceId,
        invoice_number: impl Into<String>,
        supplier_id: SupplierId,
        supplier_name: impl Into<String>,
        order_id: Option<OrderId>,
        total_amount: Money,
        tax_amount: Money,
        recorded_by: UserId,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if total_amount.is_zero() {
            return Err(DomainError::validation("invoice amount must be positive"));
        }
        // Range-check the derived sum once, so the read-path accessor cannot
        // silently saturate.
        total_amount
            .checked_add(tax_amount)
            .ok_or_else(|| DomainError::validation("invoice total overflows"))?;

        Ok(Self {
            id,
            invoice_number: invoice_number.into(),
            supplier_id,
            supplier_name: supplier_name.into(),
            order_id,
            total_amount,
            tax_amount,
            recorded_by,
            status: InvoiceStatus::Pending,
            paid_at: None,
            created_at: now,
        })
    }

    pub fn invoice_number(&self) -> &str {
        &self.invoice_number
    }

    pub fn supplier_id(&self) -> SupplierId {
        self.supplier_id
    }

    pub fn supplier_name(&self) -> &str {
        &self.supplier_name
    }

    pub fn order_id(&self) -> Option<OrderId> {
        self.order_id
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    pub fn tax_amount(&self) -> Money {
        self.tax_amount
    }

    /// Derived payable: subtotal plus tax, recomputed on every read.
    pub fn total_payable(&self) -> Money {
        self.total_amount.saturating_add(self.tax_amount)
    }

    pub fn recorded_by(&self) -> UserId {
        self.recorded_by
    }

    pub fn status(&self) -> InvoiceStatus {
        self.status
    }

    pub fn paid_at(&self) -> Option<DateTime<Utc>> {
        self.paid_at
    }

    /// `pending` → `paid`; any other source status is invalid.
    pub fn mark_paid(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status != InvoiceStatus::Pending {
            return Err(DomainError::invalid_transition(
                "only pending invoices can be marked paid",
            ));
        }
        self.status = InvoiceStatus::Paid;
        self.paid_at = Some(now);
        Ok(())
    }
}

impl Entity for Invoice {
    type Id = InvoiceId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
