use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Request-boundary error taxonomy.
///
/// Handlers return `Result<_, ApiError>`; the `IntoResponse` impl maps each
/// variant to an HTTP status and a `{"message": ...}` JSON body. Internal
/// causes are logged, never leaked to the client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Rejected precondition or malformed input (400).
    #[error("{0}")]
    Validation(String),

    /// Missing, unknown, or expired bearer token (401).
    #[error("Non autorisé")]
    Unauthorized,

    /// Failed login (401). One constant shape for a bad email and a bad
    /// password, so the endpoint can't be used to enumerate accounts.
    #[error("Email ou mot de passe incorrect")]
    InvalidCredentials,

    /// Nonexistent resource, or a resource not owned by the caller (404).
    /// Ownership failures deliberately look identical to missing rows.
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness conflict, e.g. duplicate email (409).
    #[error("{0}")]
    Conflict(String),

    /// Illegal step state-machine transition (422). The step row is left
    /// unchanged.
    #[error("{0}")]
    StateViolation(String),

    /// Anything else (500).
    #[error("Erreur serveur")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::StateViolation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Internal(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(ref cause) = self {
            tracing::error!("internal error: {cause:#}");
        }
        let status = self.status();
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}
