//! API error responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Request problems detected before the engine runs
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("State and city are required for price estimation")]
    MissingLocation,
    #[error("{0} parameter is required")]
    MissingParameter(&'static str),
    #[error("{0} must be a number")]
    InvalidNumber(&'static str),
    #[error("year must be an integer")]
    InvalidYear,
    #[error("plot_size_sqft must be greater than 0")]
    NonPositivePlotSize,
    #[error("road_width_ft cannot be negative")]
    NegativeRoadWidth,
    #[error("year must be between {min} and {max}")]
    YearOutOfRange { year: i32, min: i32, max: i32 },
    #[error("Invalid area_type {0:?}, expected one of residential, commercial, agricultural, industrial")]
    InvalidAreaType(String),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Internal(e) => {
                error!("API error: {:#}", e);
                "An error occurred while processing your request".to_string()
            }
            other => other.to_string(),
        };

        let body = ApiErrorBody {
            error: message,
            code: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}
