//! Error types for the API service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use fundhub_types::FundError;
use thiserror::Error;

use crate::api::ErrorResponse;

/// Investment store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid investment: {0}")]
    InvalidRecord(#[from] FundError),

    #[error("Failed to aggregate investments: {0}")]
    Aggregation(#[source] FundError),

    #[error("Snapshot I/O failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by request handlers
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Store(StoreError::InvalidRecord(_)) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("API error: {}", self);
        }
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
