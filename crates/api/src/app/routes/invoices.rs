use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use procureflow_core::Money;
use procureflow_infra::lifecycle::RecordInvoice;
use procureflow_invoicing::InvoiceId;
use procureflow_purchasing::OrderId;
use procureflow_suppliers::SupplierId;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::ActorContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(record_invoice).get(list_invoices))
        .route("/:id", get(get_invoice))
        .route("/:id/pay", post(pay_invoice))
}

pub async fn record_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Json(body): Json<dto::RecordInvoiceRequest>,
) -> axum::response::Response {
    let supplier_id = match errors::parse_id(&body.supplier_id, "supplier") {
        Ok(v) => SupplierId::new(v),
        Err(resp) => return resp,
    };
    let order_id = match body.order_id.as_deref() {
        Some(raw) => match errors::parse_id(raw, "purchase order") {
            Ok(v) => Some(OrderId::new(v)),
            Err(resp) => return resp,
        },
        None => None,
    };

    let input = RecordInvoice {
        supplier_id,
        order_id,
        total_amount: Money::from_minor_units(body.total_amount),
        tax_amount: Money::from_minor_units(body.tax_amount),
    };
    match services.lifecycle().record_invoice(ctx.actor(), input) {
        Ok(invoice) => (StatusCode::CREATED, Json(invoice)).into_response(),
        Err(e) => errors::lifecycle_error_to_response(e),
    }
}

pub async fn list_invoices(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.invoices_list() {
        Ok(items) => (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response(),
        Err(e) => errors::lifecycle_error_to_response(e),
    }
}

pub async fn get_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id, "invoice") {
        Ok(v) => InvoiceId::new(v),
        Err(resp) => return resp,
    };
    match services.invoices_get(id) {
        Ok(invoice) => (StatusCode::OK, Json(invoice)).into_response(),
        Err(e) => errors::lifecycle_error_to_response(e),
    }
}

pub async fn pay_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id, "invoice") {
        Ok(v) => InvoiceId::new(v),
        Err(resp) => return resp,
    };
    match services.lifecycle().mark_invoice_paid(ctx.actor(), id) {
        Ok(invoice) => (StatusCode::OK, Json(invoice)).into_response(),
        Err(e) => errors::lifecycle_error_to_response(e),
    }
}
