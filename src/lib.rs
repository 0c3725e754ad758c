//! Saleflow API Library
//!
//! Records retail sales: a sale references a customer, a branch and a list
//! of product lines, gets a tiered quantity discount per line, and emits a
//! sale-created event after persistence.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod clock;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod message_queue;
pub mod migrator;
pub mod openapi;
pub mod services;

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::ToSchema;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

// Common response wrapper
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

/// The v1 API surface: sale pipeline plus the three entity stores.
pub fn api_v1_routes() -> Router<AppState> {
    let sales = Router::new()
        .route("/sales", post(handlers::sales::create_sale))
        .route("/sales/:id", get(handlers::sales::get_sale))
        .route("/sales/:id/activate", post(handlers::sales::activate_sale))
        .route(
            "/sales/:id/deactivate",
            post(handlers::sales::deactivate_sale),
        )
        .route("/sales/:id/suspend", post(handlers::sales::suspend_sale));

    let customers = Router::new()
        .route("/customers", post(handlers::customers::create_customer))
        .route(
            "/customers/:id",
            get(handlers::customers::get_customer).delete(handlers::customers::delete_customer),
        )
        .route(
            "/customers/by-name/:name",
            get(handlers::customers::get_customer_by_name),
        );

    let branches = Router::new()
        .route("/branches", post(handlers::branches::create_branch))
        .route(
            "/branches/:id",
            get(handlers::branches::get_branch).delete(handlers::branches::delete_branch),
        )
        .route(
            "/branches/by-name/:name",
            get(handlers::branches::get_branch_by_name),
        );

    let products = Router::new()
        .route("/products", post(handlers::products::create_product))
        .route(
            "/products/:id",
            get(handlers::products::get_product).delete(handlers::products::delete_product),
        )
        .route(
            "/products/by-name/:name",
            get(handlers::products::get_product_by_name),
        );

    Router::new()
        .route("/status", get(api_status))
        .route("/health", get(health_check))
        .merge(sales)
        .merge(customers)
        .merge(branches)
        .merge(products)
}

async fn api_status() -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let status_data = json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "saleflow-api",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::success(status_data)))
}

async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let db_status = match state.db.ping().await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    let health_data = json!({
        "status": db_status,
        "checks": {
            "database": db_status,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::success(health_data)))
}
