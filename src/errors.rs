use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use sea_orm::error::DbErr;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// HTTP status category (e.g. "Not Found", "Bad Request")
    pub error: String,
    /// Human-readable error description
    pub message: String,
    /// Per-rule detail lines (validation field errors, offending products)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
    /// ISO 8601 timestamp when the error occurred
    pub timestamp: String,
}

/// One violated validation rule, tied to the field that failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(FieldError::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {}", join_field_errors(.0))]
    ValidationFailed(Vec<FieldError>),

    #[error("The product exceeds the maximum limit of 20 items per product: {}.", .0.join(", "))]
    QuantityLimitExceeded(Vec<String>),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Event error: {0}")]
    EventError(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

impl ServiceError {
    /// Single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ValidationFailed(_) | Self::InvalidStatus(_) => StatusCode::BAD_REQUEST,
            Self::QuantityLimitExceeded(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::EventError(_) | Self::InternalError(_) | Self::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message suitable for HTTP responses. Internal errors return generic
    /// text so implementation details never leak to callers.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) => "Database error".to_string(),
            Self::EventError(_) | Self::InternalError(_) | Self::Other(_) => {
                "Internal server error".to_string()
            }
            Self::ValidationFailed(_) => "Validation failed".to_string(),
            other => other.to_string(),
        }
    }

    /// Per-rule detail lines for the two business-rule error cases; the
    /// caller always learns exactly which fields or products were wrong.
    pub fn details(&self) -> Option<Vec<String>> {
        match self {
            Self::ValidationFailed(errors) => {
                Some(errors.iter().map(FieldError::to_string).collect())
            }
            Self::QuantityLimitExceeded(products) => Some(products.clone()),
            _ => None,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let body = ErrorResponse {
            error: status
                .canonical_reason()
                .unwrap_or("Unknown Error")
                .to_string(),
            message: self.response_message(),
            details: self.details(),
            timestamp: Utc::now().to_rfc3339(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationFailed(crate::services::validation::flatten(&err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_limit_message_names_every_offender() {
        let err = ServiceError::QuantityLimitExceeded(vec!["Beer".into(), "Soda".into()]);
        assert_eq!(
            err.to_string(),
            "The product exceeds the maximum limit of 20 items per product: Beer, Soda."
        );
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn validation_details_expose_field_paths() {
        let err = ServiceError::ValidationFailed(vec![
            FieldError::new("sale_date", "The date cannot be in the future."),
            FieldError::new(
                "items[0].quantity",
                "Product Quantities must be greater than zero.",
            ),
        ]);
        let details = err.details().unwrap();
        assert_eq!(details.len(), 2);
        assert!(details[1].starts_with("items[0].quantity"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn database_errors_do_not_leak_detail() {
        let err = ServiceError::DatabaseError(DbErr::Custom("secret dsn".into()));
        assert_eq!(err.response_message(), "Database error");
        assert!(err.details().is_none());
    }
}
