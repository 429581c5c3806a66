//! `procureflow-inventory` — stock items and on-hand adjustments.

pub mod item;

pub use item::{Item, ItemId, Unit};
