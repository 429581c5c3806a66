//! `procureflow-purchasing` — the procurement document state machines.
//!
//! Purchase requisitions, purchase orders with tiered approval, and goods
//! receipts. All decision logic here is pure: records are mutated through
//! methods that either fully apply a transition or return a typed failure.

pub mod order;
pub mod policy;
pub mod receipt;
pub mod requisition;

pub use order::{OrderId, OrderLine, OrderStatus, PurchaseOrder, ReceiptOutcome, ReceivedLine};
pub use policy::{Advance, ApprovalPolicy, advance};
pub use receipt::{GoodsReceipt, ReceiptId, ReceiptLine, ReceiptStatus};
pub use requisition::{PurchaseRequisition, RequisitionId, RequisitionLine, RequisitionStatus};
