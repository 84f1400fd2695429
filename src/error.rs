use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Required data files absent or unreadable at startup
    #[error("Missing data: {0}. The service needs a movie catalog CSV and a similarity matrix JSON, precomputed offline")]
    MissingData(String),

    /// No TMDB API key configured
    #[error("No TMDB API key configured. Set TMDB_API_KEY (a free key is available at https://www.themoviedb.org/settings/api)")]
    MissingCredential,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Connection-level failure that survived all retry attempts
    #[error("Could not reach the metadata service: {0}")]
    Transient(String),

    /// Non-2xx status or malformed payload from the metadata service
    #[error("Metadata service error: {0}")]
    ExternalApi(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether the retry policy applies to this error
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::Transient(_))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        // Connection-level problems are retryable; everything else (status
        // errors, body/decode errors) is treated as a permanent failure.
        if err.is_connect() || err.is_timeout() {
            AppError::Transient(err.to_string())
        } else {
            AppError::ExternalApi(err.to_string())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::MissingCredential => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            AppError::MissingData(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::Transient(_) | AppError::ExternalApi(_) => {
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(AppError::Transient("connection refused".into()).is_transient());
        assert!(!AppError::ExternalApi("status 500".into()).is_transient());
        assert!(!AppError::NotFound("x".into()).is_transient());
    }

    #[test]
    fn missing_credential_names_the_variable() {
        let msg = AppError::MissingCredential.to_string();
        assert!(msg.contains("TMDB_API_KEY"));
    }
}
