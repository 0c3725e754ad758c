mod common;

use axum::http::StatusCode;
use common::{decimal_of, TestApp};
use rust_decimal_macros::dec;
use serde_json::json;

async fn create_three_line_sale(app: &TestApp) -> String {
    let (status, body) = app
        .post(
            "/api/v1/sales",
            json!({
                "sale_date": "2024-06-01T12:00:00Z",
                "customer": { "name": "Ana Souza" },
                "branch": { "name": "Downtown" },
                "items": [
                    { "name": "Water", "quantity": 2, "unit_price": 5 },
                    { "name": "Beer", "quantity": 6, "unit_price": 10 },
                    { "name": "Soda", "quantity": 15, "unit_price": 4 }
                ],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "body: {body}");
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn reread_preserves_line_count_order_and_quantities() {
    let app = TestApp::new().await;
    let sale_id = create_three_line_sale(&app).await;

    let (status, body) = app.get(&format!("/api/v1/sales/{sale_id}")).await;
    assert_eq!(status, StatusCode::OK, "body: {body}");

    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    let names: Vec<&str> = items.iter().map(|i| i["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Water", "Beer", "Soda"]);
    let quantities: Vec<i64> = items
        .iter()
        .map(|i| i["quantity"].as_i64().unwrap())
        .collect();
    assert_eq!(quantities, vec![2, 6, 15]);

    // 10 + 54 + 48
    assert_eq!(decimal_of(&body["data"]["total_amount"]), dec!(112));
}

#[tokio::test]
async fn unknown_sale_is_not_found() {
    let app = TestApp::new().await;
    let (status, _) = app
        .get("/api/v1/sales/7f1d3e5a-0000-4000-8000-000000000000")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn status_transitions_touch_status_and_update_time_only() {
    let app = TestApp::new().await;
    let sale_id = create_three_line_sale(&app).await;

    let (status, body) = app.get(&format!("/api/v1/sales/{sale_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], json!("active"));
    assert!(body["data"]["updated_at"].is_null());
    let original_total = decimal_of(&body["data"]["total_amount"]);

    let (status, body) = app
        .post(&format!("/api/v1/sales/{sale_id}/suspend"), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK, "body: {body}");
    assert_eq!(body["data"]["status"], json!("suspended"));
    assert!(!body["data"]["updated_at"].is_null());
    assert_eq!(decimal_of(&body["data"]["total_amount"]), original_total);

    let (status, body) = app
        .post(&format!("/api/v1/sales/{sale_id}/deactivate"), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], json!("inactive"));

    // no guard conditions: any state reaches any other
    let (status, body) = app
        .post(&format!("/api/v1/sales/{sale_id}/activate"), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], json!("active"));
}

#[tokio::test]
async fn cancellation_flag_is_taken_from_the_candidate() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post(
            "/api/v1/sales",
            json!({
                "sale_date": "2024-06-01T12:00:00Z",
                "customer": { "name": "Ana Souza" },
                "branch": { "name": "Downtown" },
                "is_cancelled": true,
                "status": "inactive",
                "items": [ { "name": "Beer", "quantity": 1, "unit_price": 10 } ],
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "body: {body}");
    assert_eq!(body["data"]["is_cancelled"], json!(true));
    assert_eq!(body["data"]["status"], json!("inactive"));
}

#[tokio::test]
async fn repeat_sales_reuse_resolved_entities() {
    let app = TestApp::new().await;

    let (_, first) = app
        .post(
            "/api/v1/sales",
            json!({
                "sale_date": "2024-06-01T12:00:00Z",
                "customer": { "name": "Ana Souza" },
                "branch": { "name": "Downtown" },
                "items": [ { "name": "Beer", "quantity": 1, "unit_price": 10 } ],
            }),
        )
        .await;
    let customer_id = first["data"]["customer"]["id"].as_str().unwrap().to_string();
    let product_id = first["data"]["items"][0]["product_id"]
        .as_str()
        .unwrap()
        .to_string();

    // second sale references the persisted ids
    let (status, second) = app
        .post(
            "/api/v1/sales",
            json!({
                "sale_date": "2024-06-01T12:00:00Z",
                "customer": { "id": customer_id, "name": "ignored name" },
                "branch": { "name": "Uptown" },
                "items": [
                    { "product_id": product_id, "name": "whatever", "quantity": 4, "unit_price": 10 }
                ],
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "body: {second}");
    assert_eq!(second["data"]["customer"]["id"], json!(customer_id));
    assert_eq!(second["data"]["customer"]["name"], json!("Ana Souza"));
    assert_eq!(second["data"]["items"][0]["product_id"], json!(product_id));
    assert_eq!(second["data"]["items"][0]["name"], json!("Beer"));
}
