//! HTTP error mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gatehouse_core::error::GatehouseError;
use serde::Serialize;

pub type ApiResult<T> = Result<T, ApiError>;

/// A domain error on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(GatehouseError);

impl From<GatehouseError> for ApiError {
    fn from(err: GatehouseError) -> Self {
        Self(err)
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            GatehouseError::InvalidArgument { .. } | GatehouseError::PolicyViolation { .. } => {
                StatusCode::BAD_REQUEST
            }
            GatehouseError::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            GatehouseError::Forbidden { .. } => StatusCode::FORBIDDEN,
            GatehouseError::NotFound { .. } => StatusCode::NOT_FOUND,
            GatehouseError::Conflict { .. } | GatehouseError::InvalidTransition { .. } => {
                StatusCode::CONFLICT
            }
            GatehouseError::Store(_)
            | GatehouseError::Crypto(_)
            | GatehouseError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, "request failed");
            // Do not leak store internals to the client.
            let body = ErrorBody {
                success: false,
                error: "internal server error".into(),
            };
            return (status, Json(body)).into_response();
        }

        let body = ErrorBody {
            success: false,
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
