use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use procureflow_core::Money;
use procureflow_infra::lifecycle::{CreateRequisition, NewLine};
use procureflow_inventory::ItemId;
use procureflow_purchasing::RequisitionId;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::ActorContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_requisition).get(list_requisitions))
        .route("/:id", get(get_requisition))
        .route("/:id/approve", post(approve_requisition))
        .route("/:id/reject", post(reject_requisition))
}

pub async fn create_requisition(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Json(body): Json<dto::CreateRequisitionRequest>,
) -> axum::response::Response {
    let lines = match parse_lines(&body.lines) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let input = CreateRequisition {
        requester_name: body.requester_name,
        department: body.department,
        justification: body.justification,
        lines,
    };
    match services.lifecycle().create_requisition(ctx.actor(), input) {
        Ok(pr) => (StatusCode::CREATED, Json(pr)).into_response(),
        Err(e) => errors::lifecycle_error_to_response(e),
    }
}

pub async fn list_requisitions(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.requisitions_list() {
        Ok(items) => (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response(),
        Err(e) => errors::lifecycle_error_to_response(e),
    }
}

pub async fn get_requisition(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id, "requisition") {
        Ok(v) => RequisitionId::new(v),
        Err(resp) => return resp,
    };
    match services.requisitions_get(id) {
        Ok(pr) => (StatusCode::OK, Json(pr)).into_response(),
        Err(e) => errors::lifecycle_error_to_response(e),
    }
}

pub async fn approve_requisition(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id, "requisition") {
        Ok(v) => RequisitionId::new(v),
        Err(resp) => return resp,
    };
    match services.lifecycle().approve_requisition(ctx.actor(), id) {
        Ok(pr) => (StatusCode::OK, Json(pr)).into_response(),
        Err(e) => errors::lifecycle_error_to_response(e),
    }
}

pub async fn reject_requisition(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id, "requisition") {
        Ok(v) => RequisitionId::new(v),
        Err(resp) => return resp,
    };
    match services.lifecycle().reject_requisition(ctx.actor(), id) {
        Ok(pr) => (StatusCode::OK, Json(pr)).into_response(),
        Err(e) => errors::lifecycle_error_to_response(e),
    }
}

/// Parse request lines into lifecycle input, rejecting malformed item ids.
pub(crate) fn parse_lines(lines: &[dto::LineRequest]) -> Result<Vec<NewLine>, axum::response::Response> {
    lines
        .iter()
        .map(|l| {
            let item_id = errors::parse_id(&l.item_id, "item").map(ItemId::new)?;
            Ok(NewLine {
                item_id,
                quantity: l.quantity,
                unit_price: Money::from_minor_units(l.unit_price),
            })
        })
        .collect()
}
