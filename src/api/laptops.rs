//! Laptop API endpoints
//!
//! - GET /api/v1/laptops/{id} - Get a laptop
//! - GET /api/v1/laptops/in-stock - Laptops in stock, newest first
//! - GET /api/v1/laptops/filter - Filter by brand / minimum price
//! - GET /api/v1/laptops/last - Most recently added laptop in stock

use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::{list_or_no_content, LaptopResponse};
use crate::services::parse_laptop_criteria;

/// Query parameters for laptop filtering
///
/// Kept as raw strings so malformed values surface as a validation error
/// rather than an extractor rejection.
#[derive(Debug, Deserialize)]
pub struct FilterLaptopsQuery {
    pub brand: Option<String>,
    pub min_price: Option<String>,
}

/// Build the laptops router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/in-stock", get(list_in_stock))
        .route("/filter", get(filter_laptops))
        .route("/last", get(get_last_laptop))
        .route("/{id}", get(get_laptop))
}

/// GET /api/v1/laptops/{id}
async fn get_laptop(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<LaptopResponse>, ApiError> {
    let laptop = state.laptop_service.get(id).await?;
    Ok(Json(laptop.into()))
}

/// GET /api/v1/laptops/in-stock
async fn list_in_stock(State(state): State<AppState>) -> Result<Response, ApiError> {
    let laptops = state.laptop_service.in_stock().await?;
    Ok(list_or_no_content::<_, LaptopResponse>(laptops))
}

/// GET /api/v1/laptops/filter?brand=&min_price=
async fn filter_laptops(
    State(state): State<AppState>,
    Query(query): Query<FilterLaptopsQuery>,
) -> Result<Response, ApiError> {
    let criteria = parse_laptop_criteria(query.brand.as_deref(), query.min_price.as_deref())?;
    let laptops = state.laptop_service.filter(&criteria).await?;
    Ok(list_or_no_content::<_, LaptopResponse>(laptops))
}

/// GET /api/v1/laptops/last
async fn get_last_laptop(State(state): State<AppState>) -> Result<Json<LaptopResponse>, ApiError> {
    let laptop = state.laptop_service.latest().await?;
    Ok(Json(laptop.into()))
}
