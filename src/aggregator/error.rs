//! HTTP-facing errors for the aggregator.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::aggregator::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Body absent, empty, unparseable, or not a JSON object.
    #[error("No JSON data provided")]
    MissingBody,
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingBody => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(message) = &self {
            tracing::error!(error = %message, "Error handling request");
        }
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
