use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;

use procureflow_infra::lifecycle::CreateOrder;
use procureflow_purchasing::{OrderId, OrderStatus};
use procureflow_suppliers::SupplierId;

use crate::app::{dto, errors};
use crate::app::routes::requisitions::parse_lines;
use crate::app::services::AppServices;
use crate::context::ActorContext;

pub fn router() -> Router {
    Router::new().nest("/orders", orders_router())
}

fn orders_router() -> Router {
    Router::new()
        .route("/", post(create_order).get(list_orders))
        .route("/:id", get(get_order))
        .route("/:id/approve", post(approve_order))
        .route("/:id/reject", post(reject_order))
        .route("/:id/document", get(get_order_document))
}

#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
}

pub async fn create_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Json(body): Json<dto::CreateOrderRequest>,
) -> axum::response::Response {
    let supplier_id = match errors::parse_id(&body.supplier_id, "supplier") {
        Ok(v) => SupplierId::new(v),
        Err(resp) => return resp,
    };
    let lines = match parse_lines(&body.lines) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let input = CreateOrder {
        supplier_id,
        lines,
        delivery_date: body.delivery_date,
        notes: body.notes,
    };
    match services.lifecycle().create_order(ctx.actor(), input) {
        Ok(po) => (StatusCode::CREATED, Json(po)).into_response(),
        Err(e) => errors::lifecycle_error_to_response(e),
    }
}

pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<OrderListQuery>,
) -> axum::response::Response {
    match services.orders_list(query.status) {
        Ok(items) => (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response(),
        Err(e) => errors::lifecycle_error_to_response(e),
    }
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id, "purchase order") {
        Ok(v) => OrderId::new(v),
        Err(resp) => return resp,
    };
    match services.orders_get(id) {
        Ok(po) => (StatusCode::OK, Json(po)).into_response(),
        Err(e) => errors::lifecycle_error_to_response(e),
    }
}

pub async fn approve_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id, "purchase order") {
        Ok(v) => OrderId::new(v),
        Err(resp) => return resp,
    };
    match services.lifecycle().approve_order(ctx.actor(), id) {
        Ok(po) => (StatusCode::OK, Json(po)).into_response(),
        Err(e) => errors::lifecycle_error_to_response(e),
    }
}

pub async fn reject_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id, "purchase order") {
        Ok(v) => OrderId::new(v),
        Err(resp) => return resp,
    };
    match services.lifecycle().reject_order(ctx.actor(), id) {
        Ok(po) => (StatusCode::OK, Json(po)).into_response(),
        Err(e) => errors::lifecycle_error_to_response(e),
    }
}

/// Order with its full paper trail: receipts and invoices referencing it.
pub async fn get_order_document(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id, "purchase order") {
        Ok(v) => OrderId::new(v),
        Err(resp) => return resp,
    };
    let order = match services.orders_get(id) {
        Ok(po) => po,
        Err(e) => return errors::lifecycle_error_to_response(e),
    };
    let receipts = match services.receipts_for_order(id) {
        Ok(v) => v,
        Err(e) => return errors::lifecycle_error_to_response(e),
    };
    let invoices = match services.invoices_for_order(id) {
        Ok(v) => v,
        Err(e) => return errors::lifecycle_error_to_response(e),
    };
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "order": order,
            "receipts": receipts,
            "invoices": invoices,
        })),
    )
        .into_response()
}
