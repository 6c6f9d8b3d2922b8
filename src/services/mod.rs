//! Services layer - Business logic
//!
//! Services validate raw request parameters, build catalog queries and
//! run them through the repositories:
//! - `BookService`: lookup and partial update of books
//! - `LaptopService`: stock-gated listings, brand/price filtering
//! - `BlogPostService`: published post listings, search and time windows

pub mod blog_post;
pub mod book;
pub mod laptop;

pub use blog_post::{parse_last_days, BlogPostService};
pub use book::BookService;
pub use laptop::{parse_laptop_criteria, LaptopService};

/// Error types for catalog service operations
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Lookup by id matched nothing
    #[error("{0}")]
    NotFound(String),

    /// A request parameter was missing, malformed or out of range
    #[error("{0}")]
    InvalidParameter(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl CatalogError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }
}

impl From<crate::models::UnknownVariant> for CatalogError {
    fn from(err: crate::models::UnknownVariant) -> Self {
        Self::InvalidParameter(err.to_string())
    }
}
