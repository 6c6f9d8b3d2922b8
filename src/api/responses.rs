//! Shared API response types
//!
//! Records are serialized as flat objects; timestamps use RFC 3339 and
//! prices a two-digit decimal string.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::models::{BlogPost, Book, Laptop};

#[derive(Debug, Serialize, Deserialize)]
pub struct BookResponse {
    pub id: i64,
    pub title: String,
    pub author_full_name: String,
    pub isbn: String,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author_full_name: book.author_full_name,
            isbn: book.isbn,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LaptopResponse {
    pub id: i64,
    pub brand: String,
    pub year_of_manufacture: u16,
    pub ram: u16,
    pub hdd_capacity: u32,
    pub price: String,
    pub quantity: u32,
    pub created: String,
    pub modified: String,
}

impl From<Laptop> for LaptopResponse {
    fn from(laptop: Laptop) -> Self {
        Self {
            id: laptop.id,
            brand: laptop.brand.to_string(),
            year_of_manufacture: laptop.year_of_manufacture,
            ram: laptop.ram,
            hdd_capacity: laptop.hdd_capacity,
            price: format!("{:.2}", laptop.price),
            quantity: laptop.quantity,
            created: laptop.created.to_rfc3339(),
            modified: laptop.modified.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BlogPostResponse {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub author: String,
    pub status: String,
    pub category: Option<String>,
    pub published_at: Option<String>,
    pub created: String,
    pub modified: String,
}

impl From<BlogPost> for BlogPostResponse {
    fn from(post: BlogPost) -> Self {
        Self {
            id: post.id,
            title: post.title,
            body: post.body,
            author: post.author,
            status: post.status.to_string(),
            category: post.category.map(|c| c.to_string()),
            published_at: post.published_at.map(|dt| dt.to_rfc3339()),
            created: post.created.to_rfc3339(),
            modified: post.modified.to_rfc3339(),
        }
    }
}

/// JSON array of `items`, or 204 No Content when there are none
pub fn list_or_no_content<T, R>(items: Vec<T>) -> Response
where
    R: Serialize + From<T>,
{
    if items.is_empty() {
        return StatusCode::NO_CONTENT.into_response();
    }
    let body: Vec<R> = items.into_iter().map(R::from).collect();
    Json(body).into_response()
}
