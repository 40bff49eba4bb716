use thiserror::Error;

/// Failures while talking to a generative provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// The provider answered, but not with the JSON we asked for.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Network or HTTP level failure.
    #[error("transport failure: {0}")]
    TransportFailure(String),
}

/// Main error type for the trip planner
#[derive(Error, Debug)]
pub enum TripError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Failed to generate trip plan: {0}")]
    Generation(#[from] GenerationError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, TripError>;

impl From<sqlx::Error> for TripError {
    fn from(err: sqlx::Error) -> Self {
        TripError::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for TripError {
    fn from(err: serde_json::Error) -> Self {
        TripError::Persistence(format!("failed to encode trip payload: {err}"))
    }
}

impl TripError {
    /// Get the error code for structured responses
    pub fn error_code(&self) -> &'static str {
        match self {
            TripError::Unauthorized => "UNAUTHORIZED",
            TripError::Validation(_) => "VALIDATION_ERROR",
            TripError::Generation(GenerationError::InvalidResponse(_)) => "INVALID_RESPONSE",
            TripError::Generation(GenerationError::TransportFailure(_)) => "TRANSPORT_FAILURE",
            TripError::NotFound(_) => "NOT_FOUND",
            TripError::Forbidden(_) => "FORBIDDEN",
            TripError::Persistence(_) => "PERSISTENCE_ERROR",
            TripError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// True for errors caused by the caller rather than by the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            TripError::Unauthorized
                | TripError::Validation(_)
                | TripError::NotFound(_)
                | TripError::Forbidden(_)
        )
    }

    /// Message shown to API callers.
    ///
    /// Client errors carry their own message; everything else is reported as a
    /// server error with the underlying cause attached for diagnostics.
    pub fn public_message(&self) -> String {
        match self {
            TripError::Unauthorized => "Unauthorized".to_string(),
            TripError::Validation(message)
            | TripError::NotFound(message)
            | TripError::Forbidden(message) => message.clone(),
            other => format!("Server error: {other}"),
        }
    }

    /// Convert to a structured error payload
    pub fn to_error_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "error": self.public_message(),
            "code": self.error_code(),
        })
    }
}
