//! Blog post repository
//!
//! This module provides:
//! - `BlogPostRepository` trait defining the interface for post data access
//! - `SqlxBlogPostRepository` implementing the trait for SQLite

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use crate::models::{BlogPost, CreatePostInput, PostCategory, PostStatus, UpdatePostInput};
use crate::query::{CatalogQuery, PostColumn};

const POST_SELECT: &str = "SELECT id, title, body, author, status, category, published_at, created, modified FROM blog_posts";

/// Blog post repository trait
#[async_trait]
pub trait BlogPostRepository: Send + Sync {
    /// Create a new post
    async fn create(&self, input: &CreatePostInput) -> Result<BlogPost>;

    /// Get post by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<BlogPost>>;

    /// Update a post; `None` when it does not exist
    async fn update(&self, id: i64, input: &UpdatePostInput) -> Result<Option<BlogPost>>;

    /// Delete a post; `false` when it did not exist
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Run a catalog query over posts
    async fn find(&self, query: &CatalogQuery<PostColumn>) -> Result<Vec<BlogPost>>;
}

/// SQLx-based blog post repository implementation
pub struct SqlxBlogPostRepository {
    pool: SqlitePool,
}

impl SqlxBlogPostRepository {
    /// Create a new SQLx blog post repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn BlogPostRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl BlogPostRepository for SqlxBlogPostRepository {
    async fn create(&self, input: &CreatePostInput) -> Result<BlogPost> {
        create_post_sqlite(&self.pool, input).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<BlogPost>> {
        get_post_by_id_sqlite(&self.pool, id).await
    }

    async fn update(&self, id: i64, input: &UpdatePostInput) -> Result<Option<BlogPost>> {
        update_post_sqlite(&self.pool, id, input).await
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        delete_post_sqlite(&self.pool, id).await
    }

    async fn find(&self, query: &CatalogQuery<PostColumn>) -> Result<Vec<BlogPost>> {
        find_posts_sqlite(&self.pool, query).await
    }
}

/// Published posts without an explicit publication time are stamped `now`.
fn publication_time(
    status: PostStatus,
    published_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match (status, published_at) {
        (_, Some(at)) => Some(at),
        (PostStatus::Published, None) => Some(now),
        _ => None,
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_post_sqlite(pool: &SqlitePool, input: &CreatePostInput) -> Result<BlogPost> {
    input
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid post: {}", e))?;

    let now = Utc::now();
    let published_at = publication_time(input.status, input.published_at, now);

    let result = sqlx::query(
        r#"
        INSERT INTO blog_posts (title, body, title_folded, body_folded, author, status, category, published_at, created, modified)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.title)
    .bind(&input.body)
    .bind(input.title.to_lowercase())
    .bind(input.body.to_lowercase())
    .bind(&input.author)
    .bind(input.status.as_str())
    .bind(input.category.map(|c| c.as_str()))
    .bind(published_at)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create blog post")?;

    Ok(BlogPost {
        id: result.last_insert_rowid(),
        title: input.title.clone(),
        body: input.body.clone(),
        author: input.author.clone(),
        status: input.status,
        category: input.category,
        published_at,
        created: now,
        modified: now,
    })
}

async fn get_post_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<BlogPost>> {
    let row = sqlx::query(&format!("{} WHERE id = ?", POST_SELECT))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get blog post by ID")?;

    row.as_ref().map(row_to_post_sqlite).transpose()
}

async fn update_post_sqlite(
    pool: &SqlitePool,
    id: i64,
    input: &UpdatePostInput,
) -> Result<Option<BlogPost>> {
    input
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid post: {}", e))?;

    let Some(existing) = get_post_by_id_sqlite(pool, id).await? else {
        return Ok(None);
    };

    let now = Utc::now();
    let status = input.status.unwrap_or(existing.status);
    let published_at = publication_time(
        status,
        input.published_at.unwrap_or(existing.published_at),
        now,
    );

    let post = BlogPost {
        id,
        title: input.title.clone().unwrap_or(existing.title),
        body: input.body.clone().unwrap_or(existing.body),
        author: input.author.clone().unwrap_or(existing.author),
        status,
        category: input.category.unwrap_or(existing.category),
        published_at,
        created: existing.created,
        modified: now,
    };

    sqlx::query(
        r#"
        UPDATE blog_posts
        SET title = ?, body = ?, title_folded = ?, body_folded = ?, author = ?, status = ?,
            category = ?, published_at = ?, modified = ?
        WHERE id = ?
        "#,
    )
    .bind(&post.title)
    .bind(&post.body)
    .bind(post.title.to_lowercase())
    .bind(post.body.to_lowercase())
    .bind(&post.author)
    .bind(post.status.as_str())
    .bind(post.category.map(|c| c.as_str()))
    .bind(post.published_at)
    .bind(post.modified)
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to update blog post")?;

    Ok(Some(post))
}

async fn delete_post_sqlite(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM blog_posts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete blog post")?;

    Ok(result.rows_affected() > 0)
}

async fn find_posts_sqlite(
    pool: &SqlitePool,
    query: &CatalogQuery<PostColumn>,
) -> Result<Vec<BlogPost>> {
    let mut qb = query.render(POST_SELECT);
    tracing::debug!("Blog post query: {}", qb.sql());

    let rows = qb
        .build()
        .fetch_all(pool)
        .await
        .context("Failed to query blog posts")?;

    rows.iter().map(row_to_post_sqlite).collect()
}

fn row_to_post_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<BlogPost> {
    let status_str: String = row.try_get("status")?;
    let category_str: Option<String> = row.try_get("category")?;

    Ok(BlogPost {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        body: row.try_get("body")?,
        author: row.try_get("author")?,
        status: status_str.parse::<PostStatus>()?,
        category: category_str
            .map(|c| c.parse::<PostCategory>())
            .transpose()?,
        published_at: row.try_get("published_at")?,
        created: row.try_get("created")?,
        modified: row.try_get("modified")?,
    })
}
