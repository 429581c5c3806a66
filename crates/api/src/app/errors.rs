//! Consistent JSON error responses.

use axum::{Json, http::StatusCode, response::IntoResponse};

use procureflow_core::EntityId;
use procureflow_infra::LifecycleError;

/// Map a lifecycle failure onto its HTTP status and error code.
pub fn lifecycle_error_to_response(err: LifecycleError) -> axum::response::Response {
    match err {
        LifecycleError::Validation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        LifecycleError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        LifecycleError::PermissionDenied => {
            json_error(StatusCode::FORBIDDEN, "forbidden", "permission denied")
        }
        LifecycleError::InvalidStateTransition(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invalid_state_transition", msg)
        }
        LifecycleError::AlreadyApproved => json_error(
            StatusCode::CONFLICT,
            "already_approved",
            "document is already fully approved",
        ),
        LifecycleError::OverReceipt(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "over_receipt", msg)
        }
        LifecycleError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        LifecycleError::Store(e) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "store_error",
            e.to_string(),
        ),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        Json(serde_json::json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Parse a path segment as an entity id or produce the 400 response.
pub fn parse_id(raw: &str, what: &str) -> Result<EntityId, axum::response::Response> {
    raw.parse::<EntityId>().map_err(|_| {
        json_error(
            StatusCode::BAD_REQUEST,
            "invalid_id",
            format!("invalid {what} id"),
        )
    })
}
