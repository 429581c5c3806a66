use axum::{Router, routing::get};

pub mod dashboard;
pub mod inventory;
pub mod invoices;
pub mod purchases;
pub mod receipts;
pub mod requisitions;
pub mod suppliers;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/suppliers", suppliers::router())
        .nest("/inventory", inventory::router())
        .nest("/requisitions", requisitions::router())
        .nest("/purchases", purchases::router())
        .nest("/receipts", receipts::router())
        .nest("/invoices", invoices::router())
        .nest("/dashboard", dashboard::router())
}
