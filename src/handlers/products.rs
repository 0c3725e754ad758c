use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::product;
use crate::errors::ServiceError;
use crate::services::products::ProductRef;
use crate::services::validation;
use crate::{ApiResponse, AppState};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<product::Model> for ProductResponse {
    fn from(model: product::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            price: model.price,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Create a catalog product
#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = ProductRef,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<ProductResponse>),
        (status = 400, description = "Validation failed", body = crate::errors::ErrorResponse),
    ),
    tag = "products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(request): Json<ProductRef>,
) -> Result<(StatusCode, Json<ApiResponse<ProductResponse>>), ServiceError> {
    validation::validate_entity(&request)?;
    let product = state.services.products.create(&request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(product.into())),
    ))
}

/// Get a product by id
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product retrieved", body = ApiResponse<ProductResponse>),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse),
    ),
    tag = "products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ProductResponse>>, ServiceError> {
    let product = state
        .services
        .products
        .get_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Product with ID {} not found", id)))?;
    Ok(Json(ApiResponse::success(product.into())))
}

/// Get a product by name
#[utoipa::path(
    get,
    path = "/api/v1/products/by-name/{name}",
    params(("name" = String, Path, description = "Product name")),
    responses(
        (status = 200, description = "Product retrieved", body = ApiResponse<ProductResponse>),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse),
    ),
    tag = "products"
)]
pub async fn get_product_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<ProductResponse>>, ServiceError> {
    let product = state
        .services
        .products
        .get_by_name(&name)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Product named {} not found", name)))?;
    Ok(Json(ApiResponse::success(product.into())))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted", body = ApiResponse<bool>),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse),
    ),
    tag = "products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<bool>>, ServiceError> {
    let deleted = state.services.products.delete(id).await?;
    if deleted {
        Ok(Json(ApiResponse::success(true)))
    } else {
        Err(ServiceError::NotFound(format!(
            "Product with ID {} not found",
            id
        )))
    }
}
