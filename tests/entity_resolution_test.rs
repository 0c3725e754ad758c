mod common;

use axum::http::StatusCode;
use common::{decimal_of, TestApp};
use rust_decimal_macros::dec;
use serde_json::json;
use uuid::Uuid;

use saleflow_api::services::customers::CustomerRef;
use saleflow_api::services::products::ProductRef;

#[tokio::test]
async fn resolving_an_absent_reference_creates_exactly_one_row() {
    let app = TestApp::new().await;
    let service = app.state.services.customers.clone();

    let candidate = CustomerRef {
        id: None,
        name: "Ana Souza".to_string(),
        status: Default::default(),
    };

    let resolution = service.resolve(&candidate).await.unwrap();
    assert!(resolution.was_created());
    let created = resolution.into_inner();

    let stored = service.get_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(stored, created);
}

#[tokio::test]
async fn nil_uuid_counts_as_the_empty_sentinel() {
    let app = TestApp::new().await;
    let service = app.state.services.customers.clone();

    let candidate = CustomerRef {
        id: Some(Uuid::nil()),
        name: "Ana Souza".to_string(),
        status: Default::default(),
    };

    let resolution = service.resolve(&candidate).await.unwrap();
    assert!(resolution.was_created());
    assert!(!resolution.into_inner().id.is_nil());
}

#[tokio::test]
async fn resolving_an_existing_id_twice_is_idempotent() {
    let app = TestApp::new().await;
    let service = app.state.services.products.clone();

    let created = service
        .create(&ProductRef {
            id: None,
            name: "Beer".to_string(),
            price: dec!(100),
        })
        .await
        .unwrap();

    let candidate = ProductRef {
        id: Some(created.id),
        name: "Beer".to_string(),
        price: dec!(100),
    };

    let first = service.resolve(&candidate).await.unwrap();
    let second = service.resolve(&candidate).await.unwrap();
    assert!(!first.was_created());
    assert!(!second.was_created());
    assert_eq!(first.into_inner(), second.into_inner());
}

#[tokio::test]
async fn stored_values_win_over_the_candidate() {
    let app = TestApp::new().await;
    let service = app.state.services.products.clone();

    let created = service
        .create(&ProductRef {
            id: None,
            name: "Beer".to_string(),
            price: dec!(100),
        })
        .await
        .unwrap();

    // candidate carries a different name and price for a known id
    let resolution = service
        .resolve(&ProductRef {
            id: Some(created.id),
            name: "Renamed".to_string(),
            price: dec!(1),
        })
        .await
        .unwrap();

    assert!(!resolution.was_created());
    let resolved = resolution.into_inner();
    assert_eq!(resolved.name, "Beer");
    assert_eq!(resolved.price, dec!(100));
}

#[tokio::test]
async fn dangling_id_heals_in_place() {
    let app = TestApp::new().await;
    let service = app.state.services.products.clone();

    let wanted_id = Uuid::new_v4();
    let resolution = service
        .resolve(&ProductRef {
            id: Some(wanted_id),
            name: "Beer".to_string(),
            price: dec!(100),
        })
        .await
        .unwrap();

    // the create keeps the client-supplied identifier
    assert!(resolution.was_created());
    assert_eq!(resolution.into_inner().id, wanted_id);

    let stored = service.get_by_id(wanted_id).await.unwrap();
    assert!(stored.is_some());
}

#[tokio::test]
async fn sale_lines_use_the_canonical_product_row() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post("/api/v1/products", json!({ "name": "Beer", "price": 100 }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let product_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .post(
            "/api/v1/sales",
            json!({
                "sale_date": "2024-06-01T12:00:00Z",
                "customer": { "name": "Ana Souza" },
                "branch": { "name": "Downtown" },
                "items": [
                    { "product_id": product_id, "name": "Misspelled", "quantity": 2, "unit_price": 30 }
                ],
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "body: {body}");
    let line = &body["data"]["items"][0];
    // canonical name from the store, line-specific unit price from the request
    assert_eq!(line["name"], json!("Beer"));
    assert_eq!(line["product_id"], json!(product_id));
    assert_eq!(decimal_of(&line["unit_price"]), dec!(30));
    assert_eq!(decimal_of(&line["total"]), dec!(60));
}

#[tokio::test]
async fn store_endpoints_cover_lookup_and_delete() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post("/api/v1/branches", json!({ "name": "Downtown" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let branch_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app.get("/api/v1/branches/by-name/Downtown").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], json!(branch_id));

    let (status, _) = app.delete(&format!("/api/v1/branches/{branch_id}")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get(&format!("/api/v1/branches/{branch_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // deleting again reports not found
    let (status, _) = app.delete(&format!("/api/v1/branches/{branch_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn entity_create_endpoints_validate_names() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post("/api/v1/customers", json!({ "name": "ab" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"][0]
        .as_str()
        .unwrap()
        .contains("between 3 and 200"));
}
