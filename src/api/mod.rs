//! API layer - HTTP handlers and routing
//!
//! All endpoints live under `/api/v1`:
//! - Book lookup and form update
//! - Laptop listings (in stock, filtered, latest)
//! - Published blog post listings

pub mod books;
pub mod laptops;
pub mod middleware;
pub mod posts;
pub mod responses;

#[cfg(test)]
mod tests;

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use middleware::{ApiError, AppState};

/// Build the main API router
pub fn build_api_router() -> Router<AppState> {
    Router::new()
        .nest("/books", books::router())
        .nest("/laptops", laptops::router())
        .nest("/posts", posts::router())
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);
    match cors_origin.parse::<HeaderValue>() {
        Ok(origin) => cors = cors.allow_origin(origin),
        Err(e) => tracing::warn!("Ignoring invalid CORS origin {:?}: {}", cors_origin, e),
    }

    Router::new()
        .nest("/api/v1", build_api_router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
