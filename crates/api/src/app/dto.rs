//! Request/response DTOs.
//!
//! Monetary fields are integers in the smallest currency unit, matching the
//! domain `Money` representation on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use procureflow_inventory::Unit;
use procureflow_suppliers::ContactInfo;

#[derive(Debug, Deserialize)]
pub struct RegisterSupplierRequest {
    pub name: String,
    #[serde(default)]
    pub contact: Option<ContactInfo>,
    #[serde(default)]
    pub tax_id: Option<String>,
}

/// Partial update: absent fields keep their current value.
#[derive(Debug, Deserialize)]
pub struct UpdateSupplierRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub contact: Option<ContactInfo>,
    #[serde(default)]
    pub tax_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub sku: String,
    pub name: String,
    pub category: String,
    pub unit: Unit,
    pub unit_price: u64,
    #[serde(default)]
    pub quantity: u64,
    #[serde(default)]
    pub reorder_level: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub unit_price: Option<u64>,
    #[serde(default)]
    pub reorder_level: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct LineRequest {
    pub item_id: String,
    pub quantity: u64,
    pub unit_price: u64,
}

#[derive(Debug, Deserialize)]
pub struct CreateRequisitionRequest {
    pub requester_name: String,
    pub department: String,
    #[serde(default)]
    pub justification: Option<String>,
    pub lines: Vec<LineRequest>,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub supplier_id: String,
    pub lines: Vec<LineRequest>,
    #[serde(default)]
    pub delivery_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReceiptLineRequest {
    pub item_id: String,
    pub quantity: u64,
}

#[derive(Debug, Deserialize)]
pub struct PostReceiptRequest {
    pub order_id: String,
    pub lines: Vec<ReceiptLineRequest>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecordInvoiceRequest {
    pub supplier_id: String,
    #[serde(default)]
    pub order_id: Option<String>,
    pub total_amount: u64,
    #[serde(default)]
    pub tax_amount: u64,
}

/// Aggregate counters for the dashboard endpoint.
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_suppliers: usize,
    pub total_items: usize,
    pub low_stock_items: usize,
    pub submitted_requisitions: usize,
    pub pending_orders: usize,
    pub approved_orders: usize,
    pub pending_invoices: usize,
    /// On-hand stock valued at item unit prices, in minor units.
    pub inventory_value: u64,
}
