//! Database layer
//!
//! SQLite-backed record store for books, laptops and blog posts.
//!
//! # Usage
//!
//! ```ignore
//! use catalog_api::config::DatabaseConfig;
//! use catalog_api::db::{create_pool, migrations};
//!
//! let pool = create_pool(&DatabaseConfig::default()).await?;
//! migrations::run_migrations(&pool).await?;
//! ```

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool, ping};
