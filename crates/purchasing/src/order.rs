use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use procureflow_core::{DomainError, DomainResult, Entity, EntityId, Money, UserId};
use procureflow_inventory::ItemId;
use procureflow_suppliers::SupplierId;

use crate::policy::{ApprovalPolicy, advance};

/// Purchase order identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub EntityId);

impl OrderId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for OrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Purchase order status lifecycle.
///
/// `completed` and `rejected` are terminal: no transition leaves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

/// Purchase order line item.
///
/// `received` tracks the cumulative quantity received across all goods
/// receipts posted against this line. Invariant: `received <= quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub item_id: ItemId,
    pub item_name: String,
    pub quantity: u64,
    pub unit_price: Money,
    pub received: u64,
}

impl OrderLine {
    pub fn new(item_id: ItemId, item_name: impl Into<String>, quantity: u64, unit_price: Money) -> Self {
        Self {
            item_id,
            item_name: item_name.into(),
            quantity,
            unit_price,
            received: 0,
        }
    }

    pub fn line_total(&self) -> DomainResult<Money> {
        self.unit_price
            .checked_mul(self.quantity)
            .ok_or_else(|| DomainError::validation("line total overflows"))
    }

    pub fn is_fully_received(&self) -> bool {
        self.received == self.quantity
    }
}

/// One line of an incoming goods receipt, matched against an order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivedLine {
    pub item_id: ItemId,
    pub quantity: u64,
}

/// Result of applying a goods receipt to an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptOutcome {
    /// True iff every order line is now fully received. The receipt record is
    /// `complete` and the order `completed` exactly in this case.
    pub order_completed: bool,
}

/// Binding order sent to a supplier, subject to tiered approval.
///
/// Supplier name is denormalized at creation time and intentionally stale if
/// the supplier is later renamed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    id: OrderId,
    po_number: String,
    supplier_id: SupplierId,
    supplier_name: String,
    lines: Vec<OrderLine>,
    total_amount: Money,
    delivery_date: Option<DateTime<Utc>>,
    notes: Option<String>,
    created_by: UserId,
    status: OrderStatus,
    approval_level: u8,
    required_approval_levels: u8,
    approved_by: Vec<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PurchaseOrder {
    /// Place a new order in `pending` status at approval level 0, with the
    /// total computed from its lines and the required approval levels fixed
    /// by the policy at creation time.
    #[allow(clippy::too_many_arguments)]
    pub fn place(
        id: OrderId,
        po_number: impl Into<String>,
        supplier_id: SupplierId,
        supplier_name: impl Into<String>,
        lines: Vec<OrderLine>,
        delivery_date: Option<DateTime<Utc>>,
        notes: Option<String>,
        created_by: UserId,
        policy: &ApprovalPolicy,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if lines.is_empty() {
            return Err(DomainError::validation("purchase order must have line items"));
        }
        for line in &lines {
            if line.quantity == 0 {
                return Err(DomainError::validation("line quantity must be positive"));
            }
            if line.unit_price.is_zero() {
                return Err(DomainError::validation("line unit price must be positive"));
            }
            if line.received != 0 {
                return Err(DomainError::validation("new order lines cannot carry receipts"));
            }
        }

        let total_amount = Money::sum(
            lines
                .iter()
                .map(|l| l.line_total())
                .collect::<DomainResult<Vec<_>>>()?,
        )?;
        let required_approval_levels = policy.required_levels(total_amount);

        Ok(Self {
            id,
            po_number: po_number.into(),
            supplier_id,
            supplier_name: supplier_name.into(),
            lines,
            total_amount,
            delivery_date,
            notes,
            created_by,
            status: OrderStatus::Pending,
            approval_level: 0,
            required_approval_levels,
            approved_by: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn po_number(&self) -> &str {
        &self.po_number
    }

    pub fn supplier_id(&self) -> SupplierId {
        self.supplier_id
    }

    pub fn supplier_name(&self) -> &str {
        &self.supplier_name
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    pub fn delivery_date(&self) -> Option<DateTime<Utc>> {
        self.delivery_date
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn created_by(&self) -> UserId {
        self.created_by
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn approval_level(&self) -> u8 {
        self.approval_level
    }

    pub fn required_approval_levels(&self) -> u8 {
        self.required_approval_levels
    }

    pub fn approved_by(&self) -> &[UserId] {
        &self.approved_by
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Record one approval step.
    ///
    /// Returns the advance result; `approved` means the order just reached
    /// its required level and transitioned to `approved`. An order already
    /// fully approved fails `AlreadyApproved`; terminal states fail
    /// `InvalidStateTransition`. The level never regresses and never exceeds
    /// the required count.
    pub fn record_approval(
        &mut self,
        approver: UserId,
        now: DateTime<Utc>,
    ) -> DomainResult<crate::policy::Advance> {
        match self.status {
            OrderStatus::Pending | OrderStatus::Approved => {}
            OrderStatus::Rejected | OrderStatus::Completed => {
                return Err(DomainError::invalid_transition(
                    "rejected or completed orders cannot be approved",
                ));
            }
        }

        let adv = advance(self.approval_level, self.required_approval_levels)?;
        self.approval_level = adv.level;
        self.approved_by.push(approver);
        if adv.approved {
            self.status = OrderStatus::Approved;
        }
        self.updated_at = now;
        Ok(adv)
    }

    /// `pending` → `rejected` (terminal sink).
    pub fn reject(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status != OrderStatus::Pending {
            return Err(DomainError::invalid_transition(
                "only pending orders can be rejected",
            ));
        }
        self.status = OrderStatus::Rejected;
        self.updated_at = now;
        Ok(())
    }

    /// Apply a goods receipt to this order.
    ///
    /// All lines are validated before anything is mutated, so a failure
    /// leaves the received totals untouched. Each line's cumulative received
    /// quantity after this receipt must not exceed the ordered quantity;
    /// a violation fails `OverReceipt` for the whole receipt.
    pub fn receive(&mut self, lines: &[ReceivedLine], now: DateTime<Utc>) -> DomainResult<ReceiptOutcome> {
        if self.status != OrderStatus::Approved {
            return Err(DomainError::invalid_transition(
                "goods can only be received against an approved order",
            ));
        }
        if lines.is_empty() {
            return Err(DomainError::validation("goods receipt must have line items"));
        }

        // Aggregate deltas first: a receipt may legitimately repeat an item.
        let mut deltas: HashMap<ItemId, u64> = HashMap::new();
        for line in lines {
            if line.quantity == 0 {
                return Err(DomainError::validation("received quantity must be positive"));
            }
            let delta = deltas.entry(line.item_id).or_insert(0);
            *delta = delta
                .checked_add(line.quantity)
                .ok_or_else(|| DomainError::validation("received quantity overflows"))?;
        }

        for (item_id, delta) in &deltas {
            let line = self
                .lines
                .iter()
                .find(|l| l.item_id == *item_id)
                .ok_or_else(|| {
                    DomainError::validation(format!("item {item_id} is not on this order"))
                })?;
            let outstanding = line.quantity - line.received;
            if *delta > outstanding {
                return Err(DomainError::over_receipt(format!(
                    "item {item_id}: {delta} received, only {outstanding} outstanding of {}",
                    line.quantity
                )));
            }
        }

        for line in &mut self.lines {
            if let Some(delta) = deltas.get(&line.item_id) {
                line.received += delta;
            }
        }

        let order_completed = self.lines.iter().all(OrderLine::is_fully_received);
        if order_completed {
            self.status = OrderStatus::Completed;
        }
        self.updated_at = now;
        Ok(ReceiptOutcome { order_completed })
    }
}

impl Entity for PurchaseOrder {
    type Id = OrderId;

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

    fn line(quantity: u64, unit_price: u64) -> OrderLine {
        OrderLine::new(
            ItemId::new(EntityId::new()),
            "M8 hex bolt",
            quantity,
            Money::from_minor_units(unit_price),
        )
    }

    fn place(lines: Vec<OrderLine>) -> PurchaseOrder {
        PurchaseOrder::place(
            OrderId::new(EntityId::new()),
            "PO-00001",
            SupplierId::new(EntityId::new()),
            "Acme Industrial",
            lines,
            None,
            None,
            UserId::new(),
            &ApprovalPolicy::default(),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn small_order_needs_one_approval() {
        // 10 x 500.00 = 5,000.00, at or below the 10k threshold.
        let mut po = place(vec![line(10, 50_000)]);
        assert_eq!(po.required_approval_levels(), 1);
        assert_eq!(po.status(), OrderStatus::Pending);

        let adv = po.record_approval(UserId::new(), Utc::now()).unwrap();
        assert!(adv.approved);
        assert_eq!(po.status(), OrderStatus::Approved);
        assert_eq!(po.approval_level(), 1);
    }

    #[test]
    fn large_order_needs_two_approvals() {
        // 10 x 1,500.00 = 15,000.00, above the 10k threshold.
        let mut po = place(vec![line(10, 150_000)]);
        assert_eq!(po.required_approval_levels(), 2);

        let adv = po.record_approval(UserId::new(), Utc::now()).unwrap();
        assert!(!adv.approved);
        assert_eq!(po.status(), OrderStatus::Pending);
        assert_eq!(po.approval_level(), 1);

        let adv = po.record_approval(UserId::new(), Utc::now()).unwrap();
        assert!(adv.approved);
        assert_eq!(po.status(), OrderStatus::Approved);
        assert_eq!(po.approval_level(), 2);
    }

    #[test]
    fn re_approving_a_fully_approved_order_fails_and_changes_nothing() {
        let mut po = place(vec![line(10, 50_000)]);
        po.record_approval(UserId::new(), Utc::now()).unwrap();

        let err = po.record_approval(UserId::new(), Utc::now()).unwrap_err();
        assert_eq!(err, DomainError::AlreadyApproved);
        assert_eq!(po.approval_level(), 1);
        assert_eq!(po.status(), OrderStatus::Approved);
        assert_eq!(po.approved_by().len(), 1);
    }

    #[test]
    fn cannot_receive_before_approval() {
        let mut po = place(vec![line(10, 50_000)]);
        let item_id = po.lines()[0].item_id;
        let err = po
            .receive(&[ReceivedLine { item_id, quantity: 5 }], Utc::now())
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidStateTransition(_)));
    }

    #[test]
    fn full_receipt_completes_the_order() {
        let mut po = place(vec![line(10, 50_000)]);
        po.record_approval(UserId::new(), Utc::now()).unwrap();
        let item_id = po.lines()[0].item_id;

        let outcome = po
            .receive(&[ReceivedLine { item_id, quantity: 10 }], Utc::now())
            .unwrap();
        assert!(outcome.order_completed);
        assert_eq!(po.status(), OrderStatus::Completed);
        assert_eq!(po.lines()[0].received, 10);
    }

    #[test]
    fn partial_receipt_keeps_the_order_approved() {
        let mut po = place(vec![line(10, 50_000)]);
        po.record_approval(UserId::new(), Utc::now()).unwrap();
        let item_id = po.lines()[0].item_id;

        let outcome = po
            .receive(&[ReceivedLine { item_id, quantity: 4 }], Utc::now())
            .unwrap();
        assert!(!outcome.order_completed);
        assert_eq!(po.status(), OrderStatus::Approved);
        assert_eq!(po.lines()[0].received, 4);
    }

    #[test]
    fn over_receipt_fails_and_leaves_totals_unchanged() {
        let mut po = place(vec![line(10, 50_000), line(3, 20_000)]);
        po.record_approval(UserId::new(), Utc::now()).unwrap();
        let first = po.lines()[0].item_id;
        let second = po.lines()[1].item_id;

        po.receive(&[ReceivedLine { item_id: first, quantity: 8 }], Utc::now())
            .unwrap();

        // Second receipt would push the first line to 11 of 10; the whole
        // receipt is refused, including the valid second line.
        let err = po
            .receive(
                &[
                    ReceivedLine { item_id: first, quantity: 3 },
                    ReceivedLine { item_id: second, quantity: 1 },
                ],
                Utc::now(),
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::OverReceipt(_)));
        assert_eq!(po.lines()[0].received, 8);
        assert_eq!(po.lines()[1].received, 0);
        assert_eq!(po.status(), OrderStatus::Approved);
    }

    #[test]
    fn duplicate_items_in_one_receipt_accumulate() {
        let mut po = place(vec![line(10, 50_000)]);
        po.record_approval(UserId::new(), Utc::now()).unwrap();
        let item_id = po.lines()[0].item_id;

        let err = po
            .receive(
                &[
                    ReceivedLine { item_id, quantity: 6 },
                    ReceivedLine { item_id, quantity: 6 },
                ],
                Utc::now(),
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::OverReceipt(_)));
        assert_eq!(po.lines()[0].received, 0);
    }

    #[test]
    fn receiving_an_unknown_item_is_a_validation_error() {
        let mut po = place(vec![line(10, 50_000)]);
        po.record_approval(UserId::new(), Utc::now()).unwrap();

        let err = po
            .receive(
                &[ReceivedLine { item_id: ItemId::new(EntityId::new()), quantity: 1 }],
                Utc::now(),
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn rejected_is_terminal() {
        let mut po = place(vec![line(10, 50_000)]);
        po.reject(Utc::now()).unwrap();
        assert_eq!(po.status(), OrderStatus::Rejected);
        assert!(po.record_approval(UserId::new(), Utc::now()).is_err());
        assert!(po.reject(Utc::now()).is_err());
    }

    #[test]
    fn completed_orders_cannot_be_approved_or_rejected() {
        let mut po = place(vec![line(1, 50_000)]);
        po.record_approval(UserId::new(), Utc::now()).unwrap();
        let item_id = po.lines()[0].item_id;
        po.receive(&[ReceivedLine { item_id, quantity: 1 }], Utc::now())
            .unwrap();
        assert_eq!(po.status(), OrderStatus::Completed);

        assert!(matches!(
            po.record_approval(UserId::new(), Utc::now()).unwrap_err(),
            DomainError::InvalidStateTransition(_)
        ));
        assert!(po.reject(Utc::now()).is_err());
    }

    #[test]
    fn empty_or_invalid_lines_are_rejected_at_placement() {
        let policy = ApprovalPolicy::default();
        let err = PurchaseOrder::place(
            OrderId::new(EntityId::new()),
            "PO-00002",
            SupplierId::new(EntityId::new()),
            "Acme Industrial",
            vec![],
            None,
            None,
            UserId::new(),
            &policy,
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = PurchaseOrder::place(
            OrderId::new(EntityId::new()),
            "PO-00003",
            SupplierId::new(EntityId::new()),
            "Acme Industrial",
            vec![line(0, 100)],
            None,
            None,
            UserId::new(),
            &policy,
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
