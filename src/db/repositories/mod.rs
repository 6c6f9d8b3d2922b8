//! Repository layer
//!
//! One repository per record kind, each behind a trait so services can be
//! exercised against any implementation.

mod blog_post;
mod book;
mod laptop;

pub use blog_post::{BlogPostRepository, SqlxBlogPostRepository};
pub use book::{BookRepository, SqlxBookRepository};
pub use laptop::{LaptopRepository, SqlxLaptopRepository};
