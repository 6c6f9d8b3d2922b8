//! Shared API state and error handling
//!
//! - `AppState`: services handed to every handler
//! - `ApiError`: JSON error body mapped to an HTTP status

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::db::repositories::{SqlxBlogPostRepository, SqlxBookRepository, SqlxLaptopRepository};
use crate::services::{BlogPostService, BookService, CatalogError, LaptopService};

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub book_service: Arc<BookService>,
    pub laptop_service: Arc<LaptopService>,
    pub post_service: Arc<BlogPostService>,
}

impl AppState {
    /// Wire the SQLite repositories and services over `pool`
    pub fn from_pool(pool: SqlitePool, recent_posts: u32) -> Self {
        Self {
            book_service: Arc::new(BookService::new(SqlxBookRepository::boxed(pool.clone()))),
            laptop_service: Arc::new(LaptopService::new(SqlxLaptopRepository::boxed(
                pool.clone(),
            ))),
            post_service: Arc::new(BlogPostService::new(
                SqlxBlogPostRepository::boxed(pool),
                recent_posts,
            )),
        }
    }
}

/// Error response for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }

    pub fn status(&self) -> StatusCode {
        match self.error.code.as_str() {
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(msg) => ApiError::not_found(msg),
            CatalogError::InvalidParameter(msg) => ApiError::validation_error(msg),
            CatalogError::Internal(e) => {
                tracing::error!("Request failed: {:#}", e);
                ApiError::internal_error("Internal server error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_errors_map_to_status() {
        let cases = [
            (CatalogError::not_found("Book not found: 1"), StatusCode::NOT_FOUND),
            (CatalogError::invalid("bad brand"), StatusCode::BAD_REQUEST),
            (
                CatalogError::Internal(anyhow::anyhow!("disk full")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn test_internal_error_hides_cause() {
        let err = ApiError::from(CatalogError::Internal(anyhow::anyhow!("disk full")));
        assert_eq!(err.error.code, "INTERNAL_ERROR");
        assert!(!err.error.message.contains("disk"));
    }

    #[test]
    fn test_error_body_shape() {
        let body = serde_json::to_value(ApiError::validation_error("min_price must not be negative"))
            .unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "error": {
                    "code": "VALIDATION_ERROR",
                    "message": "min_price must not be negative"
                }
            })
        );
    }
}
