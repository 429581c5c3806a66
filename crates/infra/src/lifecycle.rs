//! Document lifecycle controller (application-level orchestration).
//!
//! Every procurement operation runs through here: load the target records,
//! apply the pure domain transition, and write back with a compare-and-set
//! revision check. The order document is the serialization point — two
//! concurrent approvals or receipts on the same order cannot both win, so
//! the approval-level and receipt-quantity invariants survive concurrent
//! callers. Operations on different order ids never contend.
//!
//! No IO happens here beyond the injected store and number sequence.

use chrono::{DateTime, Utc};
use thiserror::Error;

use procureflow_auth::Actor;
use procureflow_core::{DomainError, EntityId, ExpectedRevision, Money};
use procureflow_invoicing::{Invoice, InvoiceId};
use procureflow_inventory::ItemId;
use procureflow_purchasing::{
    ApprovalPolicy, GoodsReceipt, OrderId, OrderLine, PurchaseOrder, PurchaseRequisition,
    ReceiptId, ReceiptLine, ReceiptStatus, ReceivedLine, RequisitionId, RequisitionLine,
};
use procureflow_suppliers::SupplierId;

use crate::entity_store::{Collection, CollectionExt, EntityStore, StoreError};
use crate::numbering::{DocumentKind, NumberSequence};

/// Attempts at the commutative stock-increment write before giving up.
const STOCK_UPDATE_ATTEMPTS: u32 = 16;

/// Failure of a lifecycle operation, reported to the caller as typed data.
///
/// Nothing in this taxonomy is retried or swallowed inside the core; each
/// failure is scoped to the single operation invocation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found")]
    NotFound,

    #[error("permission denied")]
    PermissionDenied,

    #[error("invalid state transition: {0}")]
    InvalidStateTransition(String),

    #[error("already approved")]
    AlreadyApproved,

    #[error("over-receipt: {0}")]
    OverReceipt(String),

    /// A concurrent writer updated the document first; the caller may retry.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("store error: {0}")]
    Store(StoreError),
}

impl From<DomainError> for LifecycleError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => LifecycleError::Validation(msg),
            DomainError::NotFound => LifecycleError::NotFound,
            DomainError::PermissionDenied => LifecycleError::PermissionDenied,
            DomainError::InvalidStateTransition(msg) => LifecycleError::InvalidStateTransition(msg),
            DomainError::AlreadyApproved => LifecycleError::AlreadyApproved,
            DomainError::OverReceipt(msg) => LifecycleError::OverReceipt(msg),
            DomainError::InvalidId(msg) => LifecycleError::Validation(msg),
        }
    }
}

impl From<StoreError> for LifecycleError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound => LifecycleError::NotFound,
            StoreError::DuplicateId => LifecycleError::Conflict("duplicate record id".to_string()),
            StoreError::RevisionConflict { expected, actual } => LifecycleError::Conflict(format!(
                "revision conflict (expected {expected:?}, actual {actual})"
            )),
            other => LifecycleError::Store(other),
        }
    }
}

/// One incoming document line: item reference plus quantity and price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewLine {
    pub item_id: ItemId,
    pub quantity: u64,
    pub unit_price: Money,
}

/// Input for `create_requisition`.
#[derive(Debug, Clone)]
pub struct CreateRequisition {
    pub requester_name: String,
    pub department: String,
    pub justification: Option<String>,
    pub lines: Vec<NewLine>,
}

/// Input for `create_order`.
#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub supplier_id: SupplierId,
    pub lines: Vec<NewLine>,
    pub delivery_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Input for `post_goods_receipt`.
#[derive(Debug, Clone)]
pub struct PostReceipt {
    pub order_id: OrderId,
    pub lines: Vec<ReceivedLine>,
    pub notes: Option<String>,
}

/// Input for `record_invoice`.
#[derive(Debug, Clone)]
pub struct RecordInvoice {
    pub supplier_id: SupplierId,
    pub order_id: Option<OrderId>,
    pub total_amount: Money,
    pub tax_amount: Money,
}

/// Orchestrates the PR → PO → GR → Invoice state machines against the store.
///
/// Generic over the store and number sequence so tests can run fully
/// in-memory and a persistent backend can be slotted in without touching
/// domain code.
#[derive(Debug)]
pub struct DocumentLifecycle<S, N> {
    store: S,
    numbering: N,
    policy: ApprovalPolicy,
}

impl<S, N> DocumentLifecycle<S, N> {
    pub fn new(store: S, numbering: N, policy: ApprovalPolicy) -> Self {
        Self {
            store,
            numbering,
            policy,
        }
    }

    pub fn policy(&self) -> &ApprovalPolicy {
        &self.policy
    }
}

impl<S, N> DocumentLifecycle<S, N>
where
    S: EntityStore,
    N: NumberSequence,
{
    /// Create a requisition in `submitted` status.
    pub fn create_requisition(
        &self,
        actor: &Actor,
        input: CreateRequisition,
    ) -> Result<PurchaseRequisition, LifecycleError> {
        let lines = self.resolve_requisition_lines(&input.lines)?;
        let pr_number = self.numbering.next(DocumentKind::Requisition)?;

        let requisition = PurchaseRequisition::submit(
            RequisitionId::new(EntityId::new()),
            &pr_number,
            actor.user_id,
            input.requester_name,
            input.department,
            input.justification,
            lines,
            Utc::now(),
        )?;

        let stored = self.store.requisitions().insert(requisition)?;
        tracing::info!(%pr_number, "requisition submitted");
        Ok(stored.record)
    }

    /// Approve a submitted requisition (approver capability required).
    pub fn approve_requisition(
        &self,
        actor: &Actor,
        id: RequisitionId,
    ) -> Result<PurchaseRequisition, LifecycleError> {
        actor.require_approver()?;

        let mut current = self.store.requisitions().require(&id)?;
        current.record.approve(Utc::now())?;
        let stored = self
            .store
            .requisitions()
            .update(current.record, ExpectedRevision::Exact(current.revision))?;
        tracing::info!(pr_number = stored.record.pr_number(), "requisition approved");
        Ok(stored.record)
    }

    /// Reject a submitted requisition (approver capability required).
    pub fn reject_requisition(
        &self,
        actor: &Actor,
        id: RequisitionId,
    ) -> Result<PurchaseRequisition, LifecycleError> {
        actor.require_approver()?;

        let mut current = self.store.requisitions().require(&id)?;
        current.record.reject(Utc::now())?;
        let stored = self
            .store
            .requisitions()
            .update(current.record, ExpectedRevision::Exact(current.revision))?;
        tracing::info!(pr_number = stored.record.pr_number(), "requisition rejected");
        Ok(stored.record)
    }

    /// Place a purchase order in `pending` status with its required approval
    /// levels fixed from the policy.
    pub fn create_order(
        &self,
        actor: &Actor,
        input: CreateOrder,
    ) -> Result<PurchaseOrder, LifecycleError> {
        let supplier = self.store.suppliers().require(&input.supplier_id)?.record;
        if !supplier.is_active() {
            return Err(LifecycleError::Validation(
                "supplier is not active".to_string(),
            ));
        }

        let lines = self.resolve_order_lines(&input.lines)?;
        let po_number = self.numbering.next(DocumentKind::Order)?;

        let order = PurchaseOrder::place(
            OrderId::new(EntityId::new()),
            &po_number,
            input.supplier_id,
            supplier.name(),
            lines,
            input.delivery_date,
            input.notes,
            actor.user_id,
            &self.policy,
            Utc::now(),
        )?;

        let stored = self.store.orders().insert(order)?;
        tracing::info!(
            %po_number,
            total = %stored.record.total_amount(),
            required_levels = stored.record.required_approval_levels(),
            "purchase order placed"
        );
        Ok(stored.record)
    }

    /// Record one approval step on a pending order.
    ///
    /// The write is a compare-and-set against the revision that was read, so
    /// two concurrent approvals cannot both count; the loser sees `Conflict`
    /// and a retry will observe the advanced level (or `AlreadyApproved`).
    pub fn approve_order(
        &self,
        actor: &Actor,
        id: OrderId,
    ) -> Result<PurchaseOrder, LifecycleError> {
        actor.require_approver()?;

        let mut current = self.store.orders().require(&id)?;
        let adv = current.record.record_approval(actor.user_id, Utc::now())?;
        let stored = self
            .store
            .orders()
            .update(current.record, ExpectedRevision::Exact(current.revision))?;
        tracing::info!(
            po_number = stored.record.po_number(),
            level = adv.level,
            fully_approved = adv.approved,
            "purchase order approval recorded"
        );
        Ok(stored.record)
    }

    /// Reject a pending order (terminal).
    pub fn reject_order(&self, actor: &Actor, id: OrderId) -> Result<PurchaseOrder, LifecycleError> {
        actor.require_approver()?;

        let mut current = self.store.orders().require(&id)?;
        current.record.reject(Utc::now())?;
        let stored = self
            .store
            .orders()
            .update(current.record, ExpectedRevision::Exact(current.revision))?;
        tracing::info!(po_number = stored.record.po_number(), "purchase order rejected");
        Ok(stored.record)
    }

    /// Post a goods receipt against an approved order.
    ///
    /// The receipt is all-or-nothing: any over-receipt refuses the whole
    /// posting and leaves the order's received totals unchanged. On success
    /// the order carries the new cumulative quantities (and `completed`
    /// status when every line is full), the receipt record is stored, and
    /// each received item's on-hand stock is incremented.
    pub fn post_goods_receipt(
        &self,
        actor: &Actor,
        input: PostReceipt,
    ) -> Result<GoodsReceipt, LifecycleError> {
        let mut current = self.store.orders().require(&input.order_id)?;
        let outcome = current.record.receive(&input.lines, Utc::now())?;

        let status = if outcome.order_completed {
            ReceiptStatus::Complete
        } else {
            ReceiptStatus::Partial
        };
        let receipt_lines = receipt_lines_with_names(&current.record, &input.lines);
        let gr_number = self.numbering.next(DocumentKind::Receipt)?;

        let receipt = GoodsReceipt::post(
            ReceiptId::new(EntityId::new()),
            &gr_number,
            input.order_id,
            current.record.po_number(),
            actor.user_id,
            receipt_lines,
            input.notes,
            status,
            Utc::now(),
        )?;

        // The CAS on the order is the commit point: once it succeeds, the
        // cumulative quantities are fixed and the receipt and stock deltas
        // follow from them.
        self.store
            .orders()
            .update(current.record, ExpectedRevision::Exact(current.revision))?;
        let stored = self.store.receipts().insert(receipt)?;

        for line in &input.lines {
            self.increment_stock(line.item_id, line.quantity)?;
        }

        tracing::info!(
            %gr_number,
            status = ?status,
            order_completed = outcome.order_completed,
            "goods receipt posted"
        );
        Ok(stored.record)
    }

    /// Record a supplier invoice in `pending` status.
    pub fn record_invoice(
        &self,
        actor: &Actor,
        input: RecordInvoice,
    ) -> Result<Invoice, LifecycleError> {
        let supplier = self.store.suppliers().require(&input.supplier_id)?.record;
        if let Some(order_id) = input.order_id {
            self.store.orders().require(&order_id)?;
        }

        let invoice_number = self.numbering.next(DocumentKind::Invoice)?;
        let invoice = Invoice::record(
            InvoiceId::new(EntityId::new()),
            &invoice_number,
            input.supplier_id,
            supplier.name(),
            input.order_id,
            input.total_amount,
            input.tax_amount,
            actor.user_id,
            Utc::now(),
        )?;

        let stored = self.store.invoices().insert(invoice)?;
        tracing::info!(%invoice_number, "invoice recorded");
        Ok(stored.record)
    }

    /// Mark a pending invoice as paid.
    pub fn mark_invoice_paid(
        &self,
        _actor: &Actor,
        id: InvoiceId,
    ) -> Result<Invoice, LifecycleError> {
        let mut current = self.store.invoices().require(&id)?;
        current.record.mark_paid(Utc::now())?;
        let stored = self
            .store
            .invoices()
            .update(current.record, ExpectedRevision::Exact(current.revision))?;
        tracing::info!(invoice_number = stored.record.invoice_number(), "invoice paid");
        Ok(stored.record)
    }

    fn resolve_requisition_lines(
        &self,
        lines: &[NewLine],
    ) -> Result<Vec<RequisitionLine>, LifecycleError> {
        lines
            .iter()
            .map(|line| {
                let item = self.store.items().require(&line.item_id)?.record;
                Ok(RequisitionLine {
                    item_id: line.item_id,
                    item_name: item.name().to_string(),
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                })
            })
            .collect()
    }

    fn resolve_order_lines(&self, lines: &[NewLine]) -> Result<Vec<OrderLine>, LifecycleError> {
        lines
            .iter()
            .map(|line| {
                let item = self.store.items().require(&line.item_id)?.record;
                Ok(OrderLine::new(
                    line.item_id,
                    item.name(),
                    line.quantity,
                    line.unit_price,
                ))
            })
            .collect()
    }

    /// Increment an item's on-hand stock.
    ///
    /// Stock increments commute, so contention is resolved with a bounded
    /// reload-and-retry rather than surfacing a conflict to the caller.
    fn increment_stock(&self, item_id: ItemId, quantity: u64) -> Result<(), LifecycleError> {
        for _ in 0..STOCK_UPDATE_ATTEMPTS {
            let mut current = self.store.items().require(&item_id)?;
            current.record.receive(quantity)?;
            match self
                .store
                .items()
                .update(current.record, ExpectedRevision::Exact(current.revision))
            {
                Ok(_) => return Ok(()),
                Err(StoreError::RevisionConflict { .. }) => continue,
                Err(other) => return Err(other.into()),
            }
        }
        Err(LifecycleError::Conflict(format!(
            "stock update for item {item_id} kept conflicting"
        )))
    }
}

/// Carry the order's item-name snapshots onto the receipt lines.
fn receipt_lines_with_names(order: &PurchaseOrder, lines: &[ReceivedLine]) -> Vec<ReceiptLine> {
    lines
        .iter()
        .map(|line| {
            let name = order
                .lines()
                .iter()
                .find(|l| l.item_id == line.item_id)
                .map(|l| l.item_name.clone())
                .unwrap_or_default();
            ReceiptLine {
                item_id: line.item_id,
                item_name: name,
                quantity: line.quantity,
            }
        })
        .collect()
}
