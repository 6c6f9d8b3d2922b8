//! Book API endpoints
//!
//! - GET /api/v1/books/{id} - Get a book
//! - POST /api/v1/books/{id}/update - Overwrite fields from a form

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Form, Json, Router,
};

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::BookResponse;
use crate::models::UpdateBookInput;

/// Build the books router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(get_book))
        .route("/{id}/update", post(update_book))
}

/// GET /api/v1/books/{id}
async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<BookResponse>, ApiError> {
    let book = state.book_service.get(id).await?;
    Ok(Json(book.into()))
}

/// POST /api/v1/books/{id}/update
///
/// Blank form fields leave the stored value unchanged.
async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(input): Form<UpdateBookInput>,
) -> Result<Json<BookResponse>, ApiError> {
    let book = state.book_service.update(id, input).await?;
    Ok(Json(book.into()))
}
