use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::customer::{self, CustomerStatus};
use crate::errors::ServiceError;
use crate::services::customers::CustomerRef;
use crate::services::validation;
use crate::{ApiResponse, AppState};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CustomerResponse {
    pub id: Uuid,
    pub name: String,
    pub status: CustomerStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<customer::Model> for CustomerResponse {
    fn from(model: customer::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            status: model.status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Create a customer
#[utoipa::path(
    post,
    path = "/api/v1/customers",
    request_body = CustomerRef,
    responses(
        (status = 201, description = "Customer created", body = ApiResponse<CustomerResponse>),
        (status = 400, description = "Validation failed", body = crate::errors::ErrorResponse),
    ),
    tag = "customers"
)]
pub async fn create_customer(
    State(state): State<AppState>,
    Json(request): Json<CustomerRef>,
) -> Result<(StatusCode, Json<ApiResponse<CustomerResponse>>), ServiceError> {
    validation::validate_entity(&request)?;
    let customer = state.services.customers.create(&request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(customer.into())),
    ))
}

/// Get a customer by id
#[utoipa::path(
    get,
    path = "/api/v1/customers/{id}",
    params(("id" = Uuid, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer retrieved", body = ApiResponse<CustomerResponse>),
        (status = 404, description = "Customer not found", body = crate::errors::ErrorResponse),
    ),
    tag = "customers"
)]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CustomerResponse>>, ServiceError> {
    let customer = state
        .services
        .customers
        .get_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Customer with ID {} not found", id)))?;
    Ok(Json(ApiResponse::success(customer.into())))
}

/// Get a customer by name
#[utoipa::path(
    get,
    path = "/api/v1/customers/by-name/{name}",
    params(("name" = String, Path, description = "Customer name")),
    responses(
        (status = 200, description = "Customer retrieved", body = ApiResponse<CustomerResponse>),
        (status = 404, description = "Customer not found", body = crate::errors::ErrorResponse),
    ),
    tag = "customers"
)]
pub async fn get_customer_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<CustomerResponse>>, ServiceError> {
    let customer = state
        .services
        .customers
        .get_by_name(&name)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Customer named {} not found", name)))?;
    Ok(Json(ApiResponse::success(customer.into())))
}

/// Delete a customer
#[utoipa::path(
    delete,
    path = "/api/v1/customers/{id}",
    params(("id" = Uuid, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer deleted", body = ApiResponse<bool>),
        (status = 404, description = "Customer not found", body = crate::errors::ErrorResponse),
    ),
    tag = "customers"
)]
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<bool>>, ServiceError> {
    let deleted = state.services.customers.delete(id).await?;
    if deleted {
        Ok(Json(ApiResponse::success(true)))
    } else {
        Err(ServiceError::NotFound(format!(
            "Customer with ID {} not found",
            id
        )))
    }
}
