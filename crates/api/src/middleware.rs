use axum::{
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use procureflow_auth::{Actor, Role};
use procureflow_core::UserId;

use crate::context::ActorContext;

/// Headers the upstream identity layer stamps on every request.
const ACTOR_ID_HEADER: &str = "x-actor-id";
const ACTOR_ROLE_HEADER: &str = "x-actor-role";

/// Resolve the per-request actor from trusted identity headers.
///
/// Requests without a valid id and role are refused before any handler runs.
pub async fn identity_middleware(
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let actor = extract_actor(req.headers())?;
    req.extensions_mut().insert(ActorContext::new(actor));
    Ok(next.run(req).await)
}

fn extract_actor(headers: &HeaderMap) -> Result<Actor, StatusCode> {
    let user_id = header_value(headers, ACTOR_ID_HEADER)?
        .parse::<UserId>()
        .map_err(|_| StatusCode::UNAUTHORIZED)?;
    let role = header_value(headers, ACTOR_ROLE_HEADER)?
        .parse::<Role>()
        .map_err(|_| StatusCode::UNAUTHORIZED)?;
    Ok(Actor::new(user_id, role))
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str, StatusCode> {
    let value = headers
        .get(name)
        .ok_or(StatusCode::UNAUTHORIZED)?
        .to_str()
        .map_err(|_| StatusCode::UNAUTHORIZED)?
        .trim();
    if value.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(value)
}
