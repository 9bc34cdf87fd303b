use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error response type
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Response type for health check endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Response type for unhealthy status
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UnhealthyResponse {
    pub status: String,
    pub error: String,
}

/// Level of the hierarchy an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Menu,
    Submenu,
    Dish,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Resource::Menu => "menu",
            Resource::Submenu => "submenu",
            Resource::Dish => "dish",
        })
    }
}

/// Custom error type for API endpoints
///
/// Every variant renders as `{"detail": ...}` with a matching status code.
#[derive(Debug)]
pub enum ApiError {
    /// No row at the requested path
    NotFound(Resource),
    /// Path segment is not an integer id
    InvalidPath(String),
    /// Malformed JSON or missing field in the request body
    InvalidBody(String),
    /// Request body sent without a JSON content type
    UnsupportedMediaType(String),
    /// The store rejected the data
    ConstraintViolation(String),
    /// Any other database failure
    DatabaseError(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::NotFound(resource) => (StatusCode::NOT_FOUND, format!("{} not found", resource)),
            ApiError::InvalidPath(msg) => (StatusCode::BAD_REQUEST, format!("Invalid path: {}", msg)),
            ApiError::InvalidBody(msg) => (StatusCode::BAD_REQUEST, format!("Invalid request body: {}", msg)),
            ApiError::UnsupportedMediaType(msg) => (StatusCode::UNSUPPORTED_MEDIA_TYPE, msg),
            ApiError::ConstraintViolation(msg) => (StatusCode::BAD_REQUEST, format!("Constraint violation: {}", msg)),
            ApiError::DatabaseError(err) => {
                tracing::error!("Database error: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Database error: {}", err))
            }
        };

        (status, Json(ErrorResponse { detail })).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match constraint_message(&err) {
            Some(msg) => ApiError::ConstraintViolation(msg),
            None => ApiError::DatabaseError(err),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        anyhow::Error::from(err).into()
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::InvalidPath(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match &rejection {
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::UnsupportedMediaType(rejection.body_text())
            }
            _ => ApiError::InvalidBody(rejection.body_text()),
        }
    }
}

/// Message of the underlying database error when it is an integrity or
/// data error the client caused.
fn constraint_message(err: &anyhow::Error) -> Option<String> {
    let db_err = err.downcast_ref::<sqlx::Error>()?.as_database_error()?;

    let integrity = matches!(
        db_err.kind(),
        sqlx::error::ErrorKind::ForeignKeyViolation
            | sqlx::error::ErrorKind::UniqueViolation
            | sqlx::error::ErrorKind::NotNullViolation
            | sqlx::error::ErrorKind::CheckViolation
    );
    // SQLSTATE class 22: data exceptions such as values too long for the column
    let data_exception = db_err.code().is_some_and(|code| code.starts_with("22"));

    (integrity || data_exception).then(|| db_err.message().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn render(err: ApiError) -> (StatusCode, ErrorResponse) {
        let response = err.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_names_the_resource() {
        for (resource, expected) in [
            (Resource::Menu, "menu not found"),
            (Resource::Submenu, "submenu not found"),
            (Resource::Dish, "dish not found"),
        ] {
            let (status, body) = render(ApiError::NotFound(resource)).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body.detail, expected);
        }
    }

    #[tokio::test]
    async fn test_client_errors_are_bad_request() {
        let (status, body) = render(ApiError::InvalidPath("abc".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.detail.contains("abc"));

        let (status, _) = render(ApiError::InvalidBody("missing field `title`".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = render(ApiError::ConstraintViolation("value too long".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.detail.starts_with("Constraint violation"));
    }

    #[tokio::test]
    async fn test_unsupported_media_type() {
        let (status, body) = render(ApiError::UnsupportedMediaType(
            "Expected request with `Content-Type: application/json`".to_string(),
        ))
        .await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(body.detail.contains("application/json"));
    }

    #[tokio::test]
    async fn test_plain_anyhow_error_is_internal() {
        let err: ApiError = anyhow::anyhow!("connection reset").into();
        assert!(matches!(err, ApiError::DatabaseError(_)));

        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.detail.contains("connection reset"));
    }

    #[test]
    fn test_non_database_sqlx_error_is_internal() {
        let err = anyhow::Error::new(sqlx::Error::RowNotFound).context("Failed to read menu 1");
        assert!(matches!(ApiError::from(err), ApiError::DatabaseError(_)));
    }
}
