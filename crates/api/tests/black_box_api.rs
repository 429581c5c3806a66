use procureflow_purchasing::ApprovalPolicy;
use reqwest::StatusCode;
use serde_json::json;
use uuid::Uuid;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Build app (same router as prod), but bind to an ephemeral port.
        let app = procureflow_api::app::build_app(ApprovalPolicy::default());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Identity headers the gateway stamps on each request.
trait WithIdentity {
    fn identity(self, role: &str) -> Self;
}

impl WithIdentity for reqwest::RequestBuilder {
    fn identity(self, role: &str) -> Self {
        self.header("x-actor-id", Uuid::now_v7().to_string())
            .header("x-actor-role", role)
    }
}

async fn create_supplier(client: &reqwest::Client, base_url: &str) -> String {
    let res = client
        .post(format!("{}/suppliers", base_url))
        .identity("purchaser")
        .json(&json!({"name": "Acme Industrial"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    body["id"].as_str().unwrap().to_string()
}

async fn create_item(client: &reqwest::Client, base_url: &str, quantity: u64) -> String {
    let res = client
        .post(format!("{}/inventory/items", base_url))
        .identity("purchaser")
        .json(&json!({
            "sku": "SKU-001",
            "name": "M8 hex bolt",
            "category": "fasteners",
            "unit": "pcs",
            "unit_price": 120,
            "quantity": quantity,
            "reorder_level": 10,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    body["id"].as_str().unwrap().to_string()
}

async fn create_order(
    client: &reqwest::Client,
    base_url: &str,
    supplier_id: &str,
    item_id: &str,
    quantity: u64,
    unit_price: u64,
) -> serde_json::Value {
    let res = client
        .post(format!("{}/purchases/orders", base_url))
        .identity("purchaser")
        .json(&json!({
            "supplier_id": supplier_id,
            "lines": [{"item_id": item_id, "quantity": quantity, "unit_price": unit_price}],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

#[tokio::test]
async fn identity_headers_required_for_protected_endpoints() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Health stays public.
    let res = client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/whoami", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Unknown roles are refused outright.
    let res = client
        .get(format!("{}/whoami", srv.base_url))
        .header("x-actor-id", Uuid::now_v7().to_string())
        .header("x-actor-role", "superuser")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn whoami_reflects_the_identity_headers() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let actor_id = Uuid::now_v7().to_string();
    let res = client
        .get(format!("{}/whoami", srv.base_url))
        .header("x-actor-id", &actor_id)
        .header("x-actor-role", "finance")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["user_id"].as_str().unwrap(), actor_id);
    assert_eq!(body["role"].as_str().unwrap(), "finance");
}

#[tokio::test]
async fn full_procurement_flow_from_order_to_paid_invoice() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let supplier_id = create_supplier(&client, &srv.base_url).await;
    let item_id = create_item(&client, &srv.base_url, 25).await;

    // 10 x 500.00 = 5,000.00: a single approval level.
    let po = create_order(&client, &srv.base_url, &supplier_id, &item_id, 10, 50_000).await;
    let po_id = po["id"].as_str().unwrap().to_string();
    assert_eq!(po["po_number"].as_str().unwrap(), "PO-00001");
    assert_eq!(po["status"].as_str().unwrap(), "pending");
    assert_eq!(po["required_approval_levels"].as_u64().unwrap(), 1);

    let res = client
        .post(format!("{}/purchases/orders/{}/approve", srv.base_url, po_id))
        .identity("approver")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"].as_str().unwrap(), "approved");

    // Receive everything; the order completes and stock goes up.
    let res = client
        .post(format!("{}/receipts", srv.base_url))
        .identity("warehouse")
        .json(&json!({
            "order_id": po_id,
            "lines": [{"item_id": item_id, "quantity": 10}],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let gr: serde_json::Value = res.json().await.unwrap();
    assert_eq!(gr["gr_number"].as_str().unwrap(), "GR-00001");
    assert_eq!(gr["status"].as_str().unwrap(), "complete");

    let res = client
        .get(format!("{}/inventory/items/{}", srv.base_url, item_id))
        .identity("purchaser")
        .send()
        .await
        .unwrap();
    let item: serde_json::Value = res.json().await.unwrap();
    assert_eq!(item["quantity"].as_u64().unwrap(), 35);

    let res = client
        .get(format!("{}/purchases/orders/{}/document", srv.base_url, po_id))
        .identity("purchaser")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let doc: serde_json::Value = res.json().await.unwrap();
    assert_eq!(doc["order"]["status"].as_str().unwrap(), "completed");
    assert_eq!(doc["receipts"].as_array().unwrap().len(), 1);

    // Invoice against the order, then pay it.
    let res = client
        .post(format!("{}/invoices", srv.base_url))
        .identity("finance")
        .json(&json!({
            "supplier_id": supplier_id,
            "order_id": po_id,
            "total_amount": 500_000,
            "tax_amount": 35_000,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let invoice: serde_json::Value = res.json().await.unwrap();
    let invoice_id = invoice["id"].as_str().unwrap().to_string();
    assert_eq!(invoice["invoice_number"].as_str().unwrap(), "INV-00001");
    assert_eq!(invoice["status"].as_str().unwrap(), "pending");

    let res = client
        .post(format!("{}/invoices/{}/pay", srv.base_url, invoice_id))
        .identity("finance")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let paid: serde_json::Value = res.json().await.unwrap();
    assert_eq!(paid["status"].as_str().unwrap(), "paid");
}

#[tokio::test]
async fn orders_above_the_threshold_need_two_approvals() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let supplier_id = create_supplier(&client, &srv.base_url).await;
    let item_id = create_item(&client, &srv.base_url, 0).await;

    // 10 x 1,500.00 = 15,000.00: above the threshold, two levels.
    let po = create_order(&client, &srv.base_url, &supplier_id, &item_id, 10, 150_000).await;
    let po_id = po["id"].as_str().unwrap();
    assert_eq!(po["required_approval_levels"].as_u64().unwrap(), 2);

    let approve_url = format!("{}/purchases/orders/{}/approve", srv.base_url, po_id);

    let res = client.post(&approve_url).identity("approver").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"].as_str().unwrap(), "pending");
    assert_eq!(body["approval_level"].as_u64().unwrap(), 1);

    let res = client.post(&approve_url).identity("approver").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"].as_str().unwrap(), "approved");

    // A third approval is refused as a conflict.
    let res = client.post(&approve_url).identity("approver").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"].as_str().unwrap(), "already_approved");
}

#[tokio::test]
async fn approval_is_forbidden_without_the_approver_capability() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let supplier_id = create_supplier(&client, &srv.base_url).await;
    let item_id = create_item(&client, &srv.base_url, 0).await;
    let po = create_order(&client, &srv.base_url, &supplier_id, &item_id, 10, 50_000).await;
    let po_id = po["id"].as_str().unwrap();

    let res = client
        .post(format!("{}/purchases/orders/{}/approve", srv.base_url, po_id))
        .identity("purchaser")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // The order is untouched.
    let res = client
        .get(format!("{}/purchases/orders/{}", srv.base_url, po_id))
        .identity("purchaser")
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"].as_str().unwrap(), "pending");
    assert_eq!(body["approval_level"].as_u64().unwrap(), 0);
}

#[tokio::test]
async fn over_receipt_is_refused_with_unprocessable_entity() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let supplier_id = create_supplier(&client, &srv.base_url).await;
    let item_id = create_item(&client, &srv.base_url, 0).await;
    let po = create_order(&client, &srv.base_url, &supplier_id, &item_id, 10, 50_000).await;
    let po_id = po["id"].as_str().unwrap();

    let res = client
        .post(format!("{}/purchases/orders/{}/approve", srv.base_url, po_id))
        .identity("approver")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(format!("{}/receipts", srv.base_url))
        .identity("warehouse")
        .json(&json!({
            "order_id": po_id,
            "lines": [{"item_id": item_id, "quantity": 11}],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"].as_str().unwrap(), "over_receipt");

    // Nothing was applied: no receipts, stock unchanged.
    let res = client
        .get(format!("{}/receipts", srv.base_url))
        .identity("warehouse")
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["items"].as_array().unwrap().is_empty());

    let res = client
        .get(format!("{}/inventory/items/{}", srv.base_url, item_id))
        .identity("purchaser")
        .send()
        .await
        .unwrap();
    let item: serde_json::Value = res.json().await.unwrap();
    assert_eq!(item["quantity"].as_u64().unwrap(), 0);
}

#[tokio::test]
async fn duplicate_skus_are_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    create_item(&client, &srv.base_url, 5).await;

    // Same SKU again, different name: the catalog refuses it.
    let res = client
        .post(format!("{}/inventory/items", srv.base_url))
        .identity("purchaser")
        .json(&json!({
            "sku": "SKU-001",
            "name": "M10 hex bolt",
            "category": "fasteners",
            "unit": "pcs",
            "unit_price": 150,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"].as_str().unwrap(), "validation_error");

    let res = client
        .get(format!("{}/inventory/items", srv.base_url))
        .identity("purchaser")
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn requisition_lifecycle_and_listing() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let item_id = create_item(&client, &srv.base_url, 5).await;

    let res = client
        .post(format!("{}/requisitions", srv.base_url))
        .identity("purchaser")
        .json(&json!({
            "requester_name": "Dana Smith",
            "department": "maintenance",
            "justification": "restock fasteners",
            "lines": [{"item_id": item_id, "quantity": 5, "unit_price": 120}],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let pr: serde_json::Value = res.json().await.unwrap();
    let pr_id = pr["id"].as_str().unwrap().to_string();
    assert_eq!(pr["pr_number"].as_str().unwrap(), "PR-00001");
    assert_eq!(pr["status"].as_str().unwrap(), "submitted");
    assert_eq!(pr["total_amount"].as_u64().unwrap(), 600);

    let res = client
        .post(format!("{}/requisitions/{}/approve", srv.base_url, pr_id))
        .identity("approver")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"].as_str().unwrap(), "approved");

    // Approving again is an invalid transition, not a silent no-op.
    let res = client
        .post(format!("{}/requisitions/{}/approve", srv.base_url, pr_id))
        .identity("approver")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let res = client
        .get(format!("{}/requisitions", srv.base_url))
        .identity("purchaser")
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn dashboard_reflects_document_counts() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let supplier_id = create_supplier(&client, &srv.base_url).await;
    let item_id = create_item(&client, &srv.base_url, 5).await;
    create_order(&client, &srv.base_url, &supplier_id, &item_id, 10, 50_000).await;

    let res = client
        .get(format!("{}/dashboard/stats", srv.base_url))
        .identity("admin")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let stats: serde_json::Value = res.json().await.unwrap();
    assert_eq!(stats["total_suppliers"].as_u64().unwrap(), 1);
    assert_eq!(stats["total_items"].as_u64().unwrap(), 1);
    assert_eq!(stats["low_stock_items"].as_u64().unwrap(), 1);
    assert_eq!(stats["pending_orders"].as_u64().unwrap(), 1);
    assert_eq!(stats["inventory_value"].as_u64().unwrap(), 600);
}

#[tokio::test]
async fn orders_can_be_filtered_by_status() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let supplier_id = create_supplier(&client, &srv.base_url).await;
    let item_id = create_item(&client, &srv.base_url, 0).await;
    let first = create_order(&client, &srv.base_url, &supplier_id, &item_id, 10, 50_000).await;
    create_order(&client, &srv.base_url, &supplier_id, &item_id, 5, 50_000).await;

    let res = client
        .post(format!(
            "{}/purchases/orders/{}/approve",
            srv.base_url,
            first["id"].as_str().unwrap()
        ))
        .identity("approver")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/purchases/orders?status=pending", srv.base_url))
        .identity("purchaser")
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["status"].as_str().unwrap(), "pending");
}
