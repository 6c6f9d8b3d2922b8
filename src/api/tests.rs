use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

use super::{build_router, AppState};
use crate::db::repositories::{
    BlogPostRepository, BookRepository, LaptopRepository, SqlxBlogPostRepository,
    SqlxBookRepository, SqlxLaptopRepository,
};
use crate::db::{create_test_pool, migrations};
use crate::models::{
    Brand, CreateBookInput, CreateLaptopInput, CreatePostInput, PostCategory, PostStatus,
};

async fn setup_test_app() -> (SqlitePool, Router) {
    let pool = create_test_pool().await.expect("Failed to create test pool");
    migrations::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    let state = AppState::from_pool(pool.clone(), 3);
    (pool, build_router(state, "http://localhost:3000"))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn ids(body: &Value) -> Vec<i64> {
    body.as_array()
        .expect("expected a JSON array")
        .iter()
        .map(|item| item["id"].as_i64().unwrap())
        .collect()
}

fn published(title: &str, author: &str) -> CreatePostInput {
    CreatePostInput::new(title, format!("About {}", title), author)
        .with_status(PostStatus::Published)
}

#[tokio::test]
async fn test_get_book() {
    let (pool, app) = setup_test_app().await;
    let book = SqlxBookRepository::new(pool)
        .create(&CreateBookInput::new("Dune", "Frank Herbert", "111"))
        .await
        .unwrap();

    let (status, body) = get(&app, &format!("/api/v1/books/{}", book.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Dune");
    assert_eq!(body["author_full_name"], "Frank Herbert");

    let (status, body) = get(&app, "/api/v1/books/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_update_book_form() {
    let (pool, app) = setup_test_app().await;
    let book = SqlxBookRepository::new(pool)
        .create(&CreateBookInput::new("Dune", "Frank Herbert", "111"))
        .await
        .unwrap();

    let form = |uri: String, body: &'static str| {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    };

    let uri = format!("/api/v1/books/{}/update", book.id);
    let (status, body) = send(&app, form(uri.clone(), "title=Dune+Messiah&isbn=")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Dune Messiah");
    assert_eq!(body["isbn"], "111");

    let (status, body) = send(&app, form(uri, "title=&author_full_name=&isbn=")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, _) = send(&app, form("/api/v1/books/999/update".to_string(), "isbn=2")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_laptop_by_id_and_last() {
    let (pool, app) = setup_test_app().await;

    let (status, _) = get(&app, "/api/v1/laptops/last").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let laptop = SqlxLaptopRepository::new(pool)
        .create(&CreateLaptopInput::new(Brand::Apple))
        .await
        .unwrap();

    let (status, body) = get(&app, &format!("/api/v1/laptops/{}", laptop.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["brand"], "apple");
    assert_eq!(body["price"], "1500.00");
    assert_eq!(body["quantity"], 10);

    let (status, body) = get(&app, "/api/v1/laptops/last").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], laptop.id);
}

#[tokio::test]
async fn test_in_stock_no_content_when_empty() {
    let (pool, app) = setup_test_app().await;
    let (status, body) = get(&app, "/api/v1/laptops/in-stock").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let repo = SqlxLaptopRepository::new(pool);
    repo.create(&CreateLaptopInput::new(Brand::Apple).with_quantity(0))
        .await
        .unwrap();
    let stocked = repo.create(&CreateLaptopInput::new(Brand::Thinkpad)).await.unwrap();

    let (status, body) = get(&app, "/api/v1/laptops/in-stock").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![stocked.id]);
}

#[tokio::test]
async fn test_filter_laptops() {
    let (pool, app) = setup_test_app().await;
    let repo = SqlxLaptopRepository::new(pool);
    let pricey = repo
        .create(&CreateLaptopInput::new(Brand::Thinkpad).with_price(Decimal::new(2000, 0)))
        .await
        .unwrap();
    let cheap = repo
        .create(&CreateLaptopInput::new(Brand::Thinkpad).with_price(Decimal::new(1200, 0)))
        .await
        .unwrap();
    repo.create(&CreateLaptopInput::new(Brand::Thinkpad).with_price(Decimal::new(900, 0)))
        .await
        .unwrap();
    repo.create(&CreateLaptopInput::new(Brand::Apple).with_price(Decimal::new(3000, 0)))
        .await
        .unwrap();

    let (status, body) = get(&app, "/api/v1/laptops/filter?brand=thinkpad&min_price=1000").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![cheap.id, pricey.id]);

    let (status, _) = get(&app, "/api/v1/laptops/filter?min_price=5000").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_filter_laptops_rejects_bad_parameters() {
    let (_pool, app) = setup_test_app().await;
    for uri in [
        "/api/v1/laptops/filter?brand=dell",
        "/api/v1/laptops/filter?min_price=-5",
        "/api/v1/laptops/filter?min_price=cheap",
    ] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn test_last_posts() {
    let (pool, app) = setup_test_app().await;
    let (status, _) = get(&app, "/api/v1/posts/last").await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let repo = SqlxBlogPostRepository::new(pool);
    let now = Utc::now();
    let mut created = Vec::new();
    for day in (1..=4).rev() {
        let post = repo
            .create(&published("p", "ann").with_published_at(now - Duration::days(day)))
            .await
            .unwrap();
        created.push(post.id);
    }
    repo.create(&CreatePostInput::new("draft", "text", "ann"))
        .await
        .unwrap();

    let (status, body) = get(&app, "/api/v1/posts/last").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![created[3], created[2], created[1]]);
}

#[tokio::test]
async fn test_search_posts() {
    let (pool, app) = setup_test_app().await;
    let repo = SqlxBlogPostRepository::new(pool);
    let go = repo.create(&published("Go basics", "ann")).await.unwrap();
    repo.create(&published("Rust intro", "bob")).await.unwrap();

    let (status, body) = get(&app, "/api/v1/posts/search?title=go").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![go.id]);
    assert_eq!(body[0]["status"], "published");

    let (status, _) = get(&app, "/api/v1/posts/search?title=&body=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&app, "/api/v1/posts/search?body=haskell").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_search_posts_folds_non_ascii_case() {
    let (pool, app) = setup_test_app().await;
    let repo = SqlxBlogPostRepository::new(pool);
    let privet = repo.create(&published("Привет мир", "ann")).await.unwrap();
    let ecole = repo.create(&published("ÉCOLE news", "bob")).await.unwrap();

    let (status, body) = get(&app, "/api/v1/posts/search?title=%D0%BF%D1%80%D0%B8%D0%B2%D0%B5%D1%82").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![privet.id]);

    let (status, body) = get(&app, "/api/v1/posts/search?title=%C3%A9cole").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![ecole.id]);
}

#[tokio::test]
async fn test_untagged_and_categories() {
    let (pool, app) = setup_test_app().await;
    let repo = SqlxBlogPostRepository::new(pool);
    let news = repo
        .create(&published("n", "ann").with_category(Some(PostCategory::News)))
        .await
        .unwrap();
    repo.create(&published("t", "ann").with_category(Some(PostCategory::Trends)))
        .await
        .unwrap();
    let loose = repo
        .create(&published("u", "ann").with_category(None))
        .await
        .unwrap();

    let (status, body) = get(&app, "/api/v1/posts/untagged").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![loose.id]);
    assert!(body[0]["category"].is_null());

    let (status, body) = get(&app, "/api/v1/posts/categories?category=news,tips").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![news.id]);

    for uri in [
        "/api/v1/posts/categories",
        "/api/v1/posts/categories?category=",
        "/api/v1/posts/categories?category=news,gossip",
    ] {
        let (status, _) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
    }
}

#[tokio::test]
async fn test_posts_last_days() {
    let (pool, app) = setup_test_app().await;
    let repo = SqlxBlogPostRepository::new(pool);
    let now = Utc::now();
    repo.create(&published("old", "ann").with_published_at(now - Duration::days(8)))
        .await
        .unwrap();
    let fresh = repo
        .create(&published("fresh", "ann").with_published_at(now - Duration::days(6)))
        .await
        .unwrap();

    let (status, body) = get(&app, "/api/v1/posts/last-days?last_days=7").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![fresh.id]);

    let (status, _) = get(&app, "/api/v1/posts/last-days?last_days=1").await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    for uri in [
        "/api/v1/posts/last-days",
        "/api/v1/posts/last-days?last_days=-1",
        "/api/v1/posts/last-days?last_days=week",
        "/api/v1/posts/last-days?last_days=100000000",
        "/api/v1/posts/last-days?last_days=4294967295",
    ] {
        let (status, _) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
    }
}
