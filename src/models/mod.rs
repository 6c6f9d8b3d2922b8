//! Data models
//!
//! Record types held by the catalog store:
//! - Database entities (Book, Laptop, BlogPost)
//! - Closed value sets stored as text (Brand, PostStatus, PostCategory)
//! - Inputs for creating and updating records

mod blog_post;
mod book;
mod laptop;

pub use blog_post::{BlogPost, CreatePostInput, PostCategory, PostStatus, UpdatePostInput};
pub use book::{Book, CreateBookInput, UpdateBookInput};
pub use laptop::{
    cents_to_price, price_to_cents, Brand, CreateLaptopInput, Laptop, UpdateLaptopInput,
    MAX_PRICE_CENTS,
};

/// A string did not name any member of a closed value set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: '{value}' (expected one of: {expected})")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

impl UnknownVariant {
    pub(crate) fn new(kind: &'static str, value: &str, expected: &'static str) -> Self {
        Self {
            kind,
            value: value.to_string(),
            expected,
        }
    }
}
