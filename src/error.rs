use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("Internal server error")]
    InternalError(String),
}

impl From<safeswap_shared::Error> for AppError {
    fn from(err: safeswap_shared::Error) -> Self {
        match err {
            safeswap_shared::Error::Validate(errors) => AppError::ValidationError(errors.to_string()),
            safeswap_shared::Error::NotFound(what) => AppError::NotFound(what),
            safeswap_shared::Error::Server(msg) => AppError::InternalError(msg),
            safeswap_shared::Error::Unknown(err) => AppError::InternalError(format!("{err:#}")),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError(format!("{err:#}"))
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_title, error_message) = match self {
            AppError::ValidationError(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Validation Error".to_string(),
                msg,
            ),
            AppError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                "Not Found".to_string(),
                format!("{what} not found"),
            ),
            AppError::CatalogUnavailable(msg) => {
                tracing::error!("Catalog unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Catalog Unavailable".to_string(),
                    "The ingredient catalog could not be loaded. Please try again later."
                        .to_string(),
                )
            }
            AppError::DatabaseError(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database Error".to_string(),
                    "A database error occurred. Please try again later.".to_string(),
                )
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                    "An unexpected error occurred. Please try again later.".to_string(),
                )
            }
        };

        (
            status_code,
            Json(ErrorBody {
                error: error_title,
                message: error_message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                AppError::ValidationError("bad".to_string()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::NotFound("ingredient x".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::CatalogUnavailable("down".to_string()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AppError::InternalError("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_shared_error_conversion() {
        let err: AppError = safeswap_shared::Error::NotFound("comment 1".to_string()).into();
        assert!(matches!(err, AppError::NotFound(what) if what == "comment 1"));
    }
}
