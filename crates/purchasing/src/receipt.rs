use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use procureflow_core::{DomainError, DomainResult, Entity, EntityId, UserId};
use procureflow_inventory::ItemId;

use crate::order::OrderId;

/// Goods receipt identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReceiptId(pub EntityId);

impl ReceiptId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Receipt status: `complete` iff every order line's cumulative received
/// quantity equals the ordered quantity after this receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptStatus {
    Partial,
    Complete,
}

/// One received line. Item name is a snapshot from the order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptLine {
    pub item_id: ItemId,
    pub item_name: String,
    pub quantity: u64,
}

/// Record of physical goods received against a purchase order.
///
/// `po_number` is denormalized from the order at posting time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoodsReceipt {
    id: ReceiptId,
    gr_number: String,
    order_id: OrderId,
    po_number: String,
    received_by: UserId,
    received_date: DateTime<Utc>,
    lines: Vec<ReceiptLine>,
    notes: Option<String>,
    status: ReceiptStatus,
    created_at: DateTime<Utc>,
}

impl GoodsReceipt {
    /// Record a posted receipt. The lifecycle controller has already applied
    /// the quantities to the order; this only captures the paper trail.
    #[allow(clippy::too_many_arguments)]
    pub fn post(
        id: ReceiptId,
        gr_number: impl Into<String>,
        order_id: OrderId,
        po_number: impl Into<String>,
        received_by: UserId,
        lines: Vec<ReceiptLine>,
        notes: Option<String>,
        status: ReceiptStatus,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if lines.is_empty() {
            return Err(DomainError::validation("goods receipt must have line items"));
        }
        if lines.iter().any(|l| l.quantity == 0) {
            return Err(DomainError::validation("received quantity must be positive"));
        }
        Ok(Self {
            id,
            gr_number: gr_number.into(),
            order_id,
            po_number: po_number.into(),
            received_by,
            received_date: now,
            lines,
            notes,
            status,
            created_at: now,
        })
    }

    pub fn gr_number(&self) -> &str {
        &self.gr_number
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn po_number(&self) -> &str {
        &self.po_number
    }

    pub fn received_by(&self) -> UserId {
        self.received_by
    }

    pub fn received_date(&self) -> DateTime<Utc> {
        self.received_date
    }

    pub fn lines(&self) -> &[ReceiptLine] {
        &self.lines
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn status(&self) -> ReceiptStatus {
        self.status
    }
}

impl Entity for GoodsReceipt {
    type Id = ReceiptId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_requires_non_empty_positive_lines() {
        let err = GoodsReceipt::post(
            ReceiptId::new(EntityId::new()),
            "GR-00001",
            OrderId::new(EntityId::new()),
            "PO-00001",
            UserId::new(),
            vec![],
            None,
            ReceiptStatus::Partial,
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = GoodsReceipt::post(
            ReceiptId::new(EntityId::new()),
            "GR-00001",
            OrderId::new(EntityId::new()),
            "PO-00001",
            UserId::new(),
            vec![ReceiptLine {
                item_id: ItemId::new(EntityId::new()),
                item_name: "M8 hex bolt".to_string(),
                quantity: 0,
            }],
            None,
            ReceiptStatus::Partial,
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
