//! `procureflow-invoicing` — supplier invoices.

pub mod invoice;

pub use invoice::{Invoice, InvoiceId, InvoiceStatus};
