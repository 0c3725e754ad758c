use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::services::sales::{CreateSaleRequest, SaleResponse};
use crate::{ApiResponse, AppState};

/// Create a new sale
#[utoipa::path(
    post,
    path = "/api/v1/sales",
    request_body = CreateSaleRequest,
    responses(
        (status = 201, description = "Sale created successfully", body = ApiResponse<SaleResponse>),
        (status = 400, description = "Validation failed", body = crate::errors::ErrorResponse),
        (status = 422, description = "Quantity limit exceeded", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "sales"
)]
pub async fn create_sale(
    State(state): State<AppState>,
    Json(request): Json<CreateSaleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SaleResponse>>), ServiceError> {
    let sale = state.services.sales.create_sale(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(sale))))
}

/// Get a sale by id, lines in original order
#[utoipa::path(
    get,
    path = "/api/v1/sales/{id}",
    params(("id" = Uuid, Path, description = "Sale id")),
    responses(
        (status = 200, description = "Sale retrieved successfully", body = ApiResponse<SaleResponse>),
        (status = 404, description = "Sale not found", body = crate::errors::ErrorResponse),
    ),
    tag = "sales"
)]
pub async fn get_sale(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SaleResponse>>, ServiceError> {
    let sale = state.services.sales.get_sale(id).await?;
    Ok(Json(ApiResponse::success(sale)))
}

/// Set the sale status to Active
#[utoipa::path(
    post,
    path = "/api/v1/sales/{id}/activate",
    params(("id" = Uuid, Path, description = "Sale id")),
    responses(
        (status = 200, description = "Sale activated", body = ApiResponse<SaleResponse>),
        (status = 404, description = "Sale not found", body = crate::errors::ErrorResponse),
    ),
    tag = "sales"
)]
pub async fn activate_sale(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SaleResponse>>, ServiceError> {
    let sale = state.services.sales.activate(id).await?;
    Ok(Json(ApiResponse::success(sale)))
}

/// Set the sale status to Inactive
#[utoipa::path(
    post,
    path = "/api/v1/sales/{id}/deactivate",
    params(("id" = Uuid, Path, description = "Sale id")),
    responses(
        (status = 200, description = "Sale deactivated", body = ApiResponse<SaleResponse>),
        (status = 404, description = "Sale not found", body = crate::errors::ErrorResponse),
    ),
    tag = "sales"
)]
pub async fn deactivate_sale(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SaleResponse>>, ServiceError> {
    let sale = state.services.sales.deactivate(id).await?;
    Ok(Json(ApiResponse::success(sale)))
}

/// Set the sale status to Suspended
#[utoipa::path(
    post,
    path = "/api/v1/sales/{id}/suspend",
    params(("id" = Uuid, Path, description = "Sale id")),
    responses(
        (status = 200, description = "Sale suspended", body = ApiResponse<SaleResponse>),
        (status = 404, description = "Sale not found", body = crate::errors::ErrorResponse),
    ),
    tag = "sales"
)]
pub async fn suspend_sale(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SaleResponse>>, ServiceError> {
    let sale = state.services.sales.suspend(id).await?;
    Ok(Json(ApiResponse::success(sale)))
}
