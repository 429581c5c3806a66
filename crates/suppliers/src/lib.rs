//! `procureflow-suppliers` — supplier master data.

pub mod supplier;

pub use supplier::{ContactInfo, Supplier, SupplierId, SupplierStatus};
