//! Book repository

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use crate::models::{Book, CreateBookInput, UpdateBookInput};

/// Book repository trait
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Create a new book
    async fn create(&self, input: &CreateBookInput) -> Result<Book>;

    /// Get book by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Book>>;

    /// Overwrite the non-blank fields of `input`; `None` when the book does not exist
    async fn update(&self, id: i64, input: &UpdateBookInput) -> Result<Option<Book>>;

    /// Delete a book
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based book repository implementation
pub struct SqlxBookRepository {
    pool: SqlitePool,
}

impl SqlxBookRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: SqlitePool) -> Arc<dyn BookRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl BookRepository for SqlxBookRepository {
    async fn create(&self, input: &CreateBookInput) -> Result<Book> {
        create_book_sqlite(&self.pool, input).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Book>> {
        get_book_by_id_sqlite(&self.pool, id).await
    }

    async fn update(&self, id: i64, input: &UpdateBookInput) -> Result<Option<Book>> {
        update_book_sqlite(&self.pool, id, input).await
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete book")?;

        Ok(result.rows_affected() > 0)
    }
}

async fn create_book_sqlite(pool: &SqlitePool, input: &CreateBookInput) -> Result<Book> {
    let result = sqlx::query("INSERT INTO books (title, author_full_name, isbn) VALUES (?, ?, ?)")
        .bind(&input.title)
        .bind(&input.author_full_name)
        .bind(&input.isbn)
        .execute(pool)
        .await
        .context("Failed to create book")?;

    Ok(Book {
        id: result.last_insert_rowid(),
        title: input.title.clone(),
        author_full_name: input.author_full_name.clone(),
        isbn: input.isbn.clone(),
    })
}

async fn get_book_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Book>> {
    let row = sqlx::query("SELECT id, title, author_full_name, isbn FROM books WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get book by ID")?;

    row.as_ref().map(row_to_book_sqlite).transpose()
}

async fn update_book_sqlite(
    pool: &SqlitePool,
    id: i64,
    input: &UpdateBookInput,
) -> Result<Option<Book>> {
    let Some(existing) = get_book_by_id_sqlite(pool, id).await? else {
        return Ok(None);
    };

    let input = input.clone().normalized();
    let book = Book {
        id,
        title: input.title.unwrap_or(existing.title),
        author_full_name: input.author_full_name.unwrap_or(existing.author_full_name),
        isbn: input.isbn.unwrap_or(existing.isbn),
    };

    sqlx::query("UPDATE books SET title = ?, author_full_name = ?, isbn = ? WHERE id = ?")
        .bind(&book.title)
        .bind(&book.author_full_name)
        .bind(&book.isbn)
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to update book")?;

    Ok(Some(book))
}

fn row_to_book_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Book> {
    Ok(Book {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        author_full_name: row.try_get("author_full_name")?,
        isbn: row.try_get("isbn")?,
    })
}
