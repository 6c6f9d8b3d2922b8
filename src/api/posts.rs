//! Blog post API endpoints
//!
//! All listings return published posts only and answer 204 when empty.
//! - GET /api/v1/posts/last
//! - GET /api/v1/posts/search?title=&body=
//! - GET /api/v1/posts/untagged
//! - GET /api/v1/posts/categories?category=news,tips
//! - GET /api/v1/posts/last-days?last_days=7

use axum::{
    extract::{Query, State},
    response::Response,
    routing::get,
    Router,
};
use chrono::Utc;
use serde::Deserialize;

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::{list_or_no_content, BlogPostResponse};
use crate::services::parse_last_days;

#[derive(Debug, Deserialize)]
pub struct SearchPostsQuery {
    pub title: Option<String>,
    pub body: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CategoriesQuery {
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Deserialize)]
pub struct LastDaysQuery {
    pub last_days: Option<String>,
}

/// Build the posts router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/last", get(last_posts))
        .route("/search", get(search_posts))
        .route("/untagged", get(untagged_posts))
        .route("/categories", get(posts_by_categories))
        .route("/last-days", get(posts_last_days))
}

async fn last_posts(State(state): State<AppState>) -> Result<Response, ApiError> {
    let posts = state.post_service.recent().await?;
    Ok(list_or_no_content::<_, BlogPostResponse>(posts))
}

async fn search_posts(
    State(state): State<AppState>,
    Query(query): Query<SearchPostsQuery>,
) -> Result<Response, ApiError> {
    let posts = state.post_service.search(query.title, query.body).await?;
    Ok(list_or_no_content::<_, BlogPostResponse>(posts))
}

async fn untagged_posts(State(state): State<AppState>) -> Result<Response, ApiError> {
    let posts = state.post_service.untagged().await?;
    Ok(list_or_no_content::<_, BlogPostResponse>(posts))
}

async fn posts_by_categories(
    State(state): State<AppState>,
    Query(query): Query<CategoriesQuery>,
) -> Result<Response, ApiError> {
    let posts = state.post_service.by_categories(&query.category).await?;
    Ok(list_or_no_content::<_, BlogPostResponse>(posts))
}

async fn posts_last_days(
    State(state): State<AppState>,
    Query(query): Query<LastDaysQuery>,
) -> Result<Response, ApiError> {
    let days = parse_last_days(query.last_days.as_deref())?;
    let posts = state.post_service.published_within(days, Utc::now()).await?;
    Ok(list_or_no_content::<_, BlogPostResponse>(posts))
}
