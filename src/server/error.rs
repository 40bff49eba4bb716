use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::error::TripError;

impl TripError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            TripError::Unauthorized => StatusCode::UNAUTHORIZED,
            TripError::Validation(_) => StatusCode::BAD_REQUEST,
            TripError::NotFound(_) => StatusCode::NOT_FOUND,
            TripError::Forbidden(_) => StatusCode::FORBIDDEN,
            TripError::Generation(_) | TripError::Persistence(_) | TripError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for TripError {
    fn into_response(self) -> Response {
        if !self.is_client_error() {
            error!(code = self.error_code(), error = %self, "request failed");
        }
        (self.status_code(), Json(self.to_error_payload())).into_response()
    }
}
