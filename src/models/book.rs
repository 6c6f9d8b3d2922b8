//! Book model

use serde::{Deserialize, Serialize};

/// Book entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author_full_name: String,
    pub isbn: String,
}

/// Input for creating a new book
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookInput {
    pub title: String,
    pub author_full_name: String,
    pub isbn: String,
}

impl CreateBookInput {
    pub fn new(
        title: impl Into<String>,
        author_full_name: impl Into<String>,
        isbn: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author_full_name: author_full_name.into(),
            isbn: isbn.into(),
        }
    }
}

/// Input for updating an existing book
///
/// Blank strings count as "not provided".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBookInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author_full_name: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
}

impl UpdateBookInput {
    /// Drop fields that are missing or blank
    pub fn normalized(self) -> Self {
        fn keep(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.trim().is_empty())
        }
        Self {
            title: keep(self.title),
            author_full_name: keep(self.author_full_name),
            isbn: keep(self.isbn),
        }
    }

    /// Check if any field carries a non-blank value
    pub fn has_changes(&self) -> bool {
        [&self.title, &self.author_full_name, &self.isbn]
            .iter()
            .any(|v| v.as_deref().is_some_and(|s| !s.trim().is_empty()))
    }
}
