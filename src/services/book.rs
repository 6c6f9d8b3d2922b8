//! Book service

use std::sync::Arc;

use super::CatalogError;
use crate::db::repositories::BookRepository;
use crate::models::{Book, UpdateBookInput};

/// Book service
pub struct BookService {
    repo: Arc<dyn BookRepository>,
}

impl BookService {
    pub fn new(repo: Arc<dyn BookRepository>) -> Self {
        Self { repo }
    }

    /// Get a book by id
    pub async fn get(&self, id: i64) -> Result<Book, CatalogError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::not_found(format!("Book not found: {}", id)))
    }

    /// Overwrite the non-blank fields of `input`
    ///
    /// # Errors
    /// - `InvalidParameter` when every field is missing or blank
    /// - `NotFound` when no book has this id
    pub async fn update(&self, id: i64, input: UpdateBookInput) -> Result<Book, CatalogError> {
        let input = input.normalized();
        if !input.has_changes() {
            return Err(CatalogError::invalid(
                "At least one of title, author_full_name or isbn is required",
            ));
        }

        let book = self
            .repo
            .update(id, &input)
            .await?
            .ok_or_else(|| CatalogError::not_found(format!("Book not found: {}", id)))?;

        tracing::info!("Updated book {}", id);
        Ok(book)
    }
}
