use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use procureflow_inventory::ItemId;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().nest("/items", items_router())
}

fn items_router() -> Router {
    Router::new()
        .route("/", post(create_item).get(list_items))
        .route("/low-stock", get(list_low_stock_items))
        .route("/:id", get(get_item).patch(update_item))
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateItemRequest>,
) -> axum::response::Response {
    match services.create_item(body) {
        Ok(item) => (StatusCode::CREATED, Json(item)).into_response(),
        Err(e) => errors::lifecycle_error_to_response(e),
    }
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.items_list() {
        Ok(items) => (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response(),
        Err(e) => errors::lifecycle_error_to_response(e),
    }
}

pub async fn list_low_stock_items(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.items_low_stock() {
        Ok(items) => (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response(),
        Err(e) => errors::lifecycle_error_to_response(e),
    }
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id, "item") {
        Ok(v) => ItemId::new(v),
        Err(resp) => return resp,
    };
    match services.items_get(id) {
        Ok(item) => (StatusCode::OK, Json(item)).into_response(),
        Err(e) => errors::lifecycle_error_to_response(e),
    }
}

pub async fn update_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateItemRequest>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id, "item") {
        Ok(v) => ItemId::new(v),
        Err(resp) => return resp,
    };
    match services.update_item(id, body) {
        Ok(item) => (StatusCode::OK, Json(item)).into_response(),
        Err(e) => errors::lifecycle_error_to_response(e),
    }
}
