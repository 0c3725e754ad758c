use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::branch;
use crate::errors::ServiceError;
use crate::services::branches::BranchRef;
use crate::services::validation;
use crate::{ApiResponse, AppState};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BranchResponse {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<branch::Model> for BranchResponse {
    fn from(model: branch::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Create a branch
#[utoipa::path(
    post,
    path = "/api/v1/branches",
    request_body = BranchRef,
    responses(
        (status = 201, description = "Branch created", body = ApiResponse<BranchResponse>),
        (status = 400, description = "Validation failed", body = crate::errors::ErrorResponse),
    ),
    tag = "branches"
)]
pub async fn create_branch(
    State(state): State<AppState>,
    Json(request): Json<BranchRef>,
) -> Result<(StatusCode, Json<ApiResponse<BranchResponse>>), ServiceError> {
    validation::validate_entity(&request)?;
    let branch = state.services.branches.create(&request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(branch.into())),
    ))
}

/// Get a branch by id
#[utoipa::path(
    get,
    path = "/api/v1/branches/{id}",
    params(("id" = Uuid, Path, description = "Branch id")),
    responses(
        (status = 200, description = "Branch retrieved", body = ApiResponse<BranchResponse>),
        (status = 404, description = "Branch not found", body = crate::errors::ErrorResponse),
    ),
    tag = "branches"
)]
pub async fn get_branch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BranchResponse>>, ServiceError> {
    let branch = state
        .services
        .branches
        .get_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Branch with ID {} not found", id)))?;
    Ok(Json(ApiResponse::success(branch.into())))
}

/// Get a branch by name
#[utoipa::path(
    get,
    path = "/api/v1/branches/by-name/{name}",
    params(("name" = String, Path, description = "Branch name")),
    responses(
        (status = 200, description = "Branch retrieved", body = ApiResponse<BranchResponse>),
        (status = 404, description = "Branch not found", body = crate::errors::ErrorResponse),
    ),
    tag = "branches"
)]
pub async fn get_branch_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<BranchResponse>>, ServiceError> {
    let branch = state
        .services
        .branches
        .get_by_name(&name)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Branch named {} not found", name)))?;
    Ok(Json(ApiResponse::success(branch.into())))
}

/// Delete a branch
#[utoipa::path(
    delete,
    path = "/api/v1/branches/{id}",
    params(("id" = Uuid, Path, description = "Branch id")),
    responses(
        (status = 200, description = "Branch deleted", body = ApiResponse<bool>),
        (status = 404, description = "Branch not found", body = crate::errors::ErrorResponse),
    ),
    tag = "branches"
)]
pub async fn delete_branch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<bool>>, ServiceError> {
    let deleted = state.services.branches.delete(id).await?;
    if deleted {
        Ok(Json(ApiResponse::success(true)))
    } else {
        Err(ServiceError::NotFound(format!(
            "Branch with ID {} not found",
            id
        )))
    }
}
