use procureflow_core::Money;
use procureflow_purchasing::ApprovalPolicy;

#[tokio::main]
async fn main() {
    procureflow_observability::init();

    let policy = approval_policy_from_env();
    let app = procureflow_api::app::build_app(policy);

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {bind_addr}: {e}"));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}

/// Single-threshold approval policy, with the boundary overridable via
/// `APPROVAL_THRESHOLD_CENTS`.
fn approval_policy_from_env() -> ApprovalPolicy {
    match std::env::var("APPROVAL_THRESHOLD_CENTS") {
        Ok(raw) => {
            let cents: u64 = raw
                .parse()
                .unwrap_or_else(|_| panic!("APPROVAL_THRESHOLD_CENTS is not a number: {raw}"));
            ApprovalPolicy::single_threshold(Money::from_minor_units(cents))
        }
        Err(_) => ApprovalPolicy::default(),
    }
}
