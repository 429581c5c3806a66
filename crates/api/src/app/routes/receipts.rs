use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use procureflow_infra::lifecycle::PostReceipt;
use procureflow_inventory::ItemId;
use procureflow_purchasing::{OrderId, ReceiptId, ReceivedLine};

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::ActorContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(post_receipt).get(list_receipts))
        .route("/:id", get(get_receipt))
}

pub async fn post_receipt(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Json(body): Json<dto::PostReceiptRequest>,
) -> axum::response::Response {
    let order_id = match errors::parse_id(&body.order_id, "purchase order") {
        Ok(v) => OrderId::new(v),
        Err(resp) => return resp,
    };
    let lines = match body
        .lines
        .iter()
        .map(|l| {
            let item_id = errors::parse_id(&l.item_id, "item").map(ItemId::new)?;
            Ok(ReceivedLine {
                item_id,
                quantity: l.quantity,
            })
        })
        .collect::<Result<Vec<_>, axum::response::Response>>()
    {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let input = PostReceipt {
        order_id,
        lines,
        notes: body.notes,
    };
    match services.lifecycle().post_goods_receipt(ctx.actor(), input) {
        Ok(gr) => (StatusCode::CREATED, Json(gr)).into_response(),
        Err(e) => errors::lifecycle_error_to_response(e),
    }
}

pub async fn list_receipts(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.receipts_list() {
        Ok(items) => (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response(),
        Err(e) => errors::lifecycle_error_to_response(e),
    }
}

pub async fn get_receipt(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id, "goods receipt") {
        Ok(v) => ReceiptId::new(v),
        Err(resp) => return resp,
    };
    match services.receipts_get(id) {
        Ok(gr) => (StatusCode::OK, Json(gr)).into_response(),
        Err(e) => errors::lifecycle_error_to_response(e),
    }
}
