use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use server::{ServerState, router};

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    router(ServerState {
        engine: Arc::new(engine),
    })
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    tenant: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(tenant) = tenant {
        builder = builder.header("x-tenant-id", tenant);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_item(app: &Router, tenant: &str, name: &str, in_store: i32) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/inventory",
        Some(tenant),
        Some(json!({
            "category": "Lighting",
            "item_name": name,
            "in_store": in_store,
            "price_minor": 1250,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn missing_tenant_is_unauthorized() {
    let app = app().await;

    let (status, _) = send(&app, "GET", "/inventory", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/inventory", Some("  "), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn inventory_crud_and_actions() {
    let app = app().await;
    let id = create_item(&app, "alice", "Uplighter", 1).await;

    let (status, body) = send(&app, "GET", "/inventory?category=Lighting", Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    let uri = format!("/inventory/{id}/actions");
    let (status, body) = send(&app, "POST", &uri, Some("alice"), Some(json!({"action": "hire"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["in_store"], 0);
    assert_eq!(body["hired"], 1);

    let (status, body) = send(&app, "POST", &uri, Some("alice"), Some(json!({"action": "Hire"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "No items available to hire");

    let (status, _) = send(&app, "POST", &uri, Some("alice"), Some(json!({"action": "borrow"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&app, "POST", &uri, Some("bob"), Some(json!({"action": "return"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/inventory/{id}"),
        Some("alice"),
        Some(json!({"damaged": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["damaged"], 2);
    assert_eq!(body["hired"], 1);

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/inventory/{id}"),
        Some("alice"),
        Some(json!({"in_store": -1})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn categories_report_drift() {
    let app = app().await;
    create_item(&app, "alice", "Uplighter", 1).await;

    let (status, body) = send(&app, "GET", "/categories", Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["categories"], json!(["Lighting"]));
    assert!(
        body["missing"]
            .as_array()
            .unwrap()
            .contains(&json!("Arches"))
    );
    assert_eq!(body["unexpected"], json!([]));
}

#[tokio::test]
async fn requirements_accumulate_and_report_total() {
    let app = app().await;
    let item_id = create_item(&app, "alice", "Uplighter", 1).await;
    let (status, customer) = send(
        &app,
        "POST",
        "/customers",
        Some("alice"),
        Some(json!({"name": "Asha"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let customer_id = customer["id"].as_str().unwrap().to_string();

    for quantity in [3, 2] {
        let (status, _) = send(
            &app,
            "POST",
            "/requirements",
            Some("alice"),
            Some(json!({
                "customer_id": customer_id,
                "decor_item_id": item_id,
                "quantity": quantity,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(
        &app,
        "GET",
        &format!("/requirements?customer_id={customer_id}"),
        Some("alice"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["requirements"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["quantity_required"], 5);
    assert_eq!(rows[0]["customer_name"], "Asha");
    assert_eq!(rows[0]["status"], "pending");
    assert_eq!(body["total_value_minor"], 6250);

    let requirement_id = rows[0]["id"].as_str().unwrap().to_string();
    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/requirements/{requirement_id}"),
        Some("alice"),
        Some(json!({"status": "confirmed", "notes": "front entrance"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "confirmed");
    assert_eq!(body["notes"], "front entrance");

    let uri = format!("/requirements/{requirement_id}");
    let (status, _) = send(&app, "DELETE", &uri, Some("alice"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "DELETE", &uri, Some("alice"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn requirement_with_zero_quantity_is_rejected() {
    let app = app().await;
    let item_id = create_item(&app, "alice", "Uplighter", 1).await;
    let (_, customer) = send(
        &app,
        "POST",
        "/customers",
        Some("alice"),
        Some(json!({"name": "Asha"})),
    )
    .await;

    let (status, _) = send(
        &app,
        "POST",
        "/requirements",
        Some("alice"),
        Some(json!({
            "customer_id": customer["id"],
            "decor_item_id": item_id,
            "quantity": 0,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn monthly_grid_is_replaced_per_month() {
    let app = app().await;

    let (status, body) = send(
        &app,
        "PUT",
        "/allocations/2024/3",
        Some("alice"),
        Some(json!({
            "rows": [
                {"row_number": 1, "customer_name": "X", "quantities": {"arc": 2}},
                {"row_number": 2, "customer_name": "", "quantities": {"arc": 5}},
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stored"], 1);

    let (status, _) = send(
        &app,
        "PUT",
        "/allocations/2024/3",
        Some("alice"),
        Some(json!({"rows": [{"row_number": 5, "customer_name": "Y"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", "/allocations/2024/3", Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["row_number"], 5);
    assert_eq!(rows[0]["quantities"]["arc"], 0);

    let (status, body) = send(
        &app,
        "PUT",
        "/allocations/2024/3/rows/6",
        Some("alice"),
        Some(json!({"customer_name": "Z", "quantities": {"neon_signs": 1}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quantities"]["neon_signs"], 1);

    let (status, _) = send(&app, "GET", "/allocations/2024/13", Some("alice"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        "PUT",
        "/allocations/2024/3/rows/7",
        Some("alice"),
        Some(json!({"customer_name": "Z", "quantities": {"balloons": 1}})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
