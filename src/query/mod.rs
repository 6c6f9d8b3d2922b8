//! Catalog query builder
//!
//! Turns optional, independently specified filter criteria into a single
//! predicate over a record collection, pairs it with a deterministic
//! ordering and renders the result as parameterized SQL. Nothing here
//! touches the database; repositories execute what this module builds.
//!
//! - `laptop`: stock-gated laptop filtering (brand, minimum price)
//! - `post`: publication-gated post filtering (text, categories, time window)

pub mod laptop;
pub mod post;
mod predicate;

pub use laptop::{LaptopColumn, LaptopCriteria};
pub use post::{PostColumn, PostCriteria};
pub use predicate::{CatalogQuery, Column, Direction, OrderBy, Predicate, Value};
