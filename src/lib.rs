//! Catalog API - HTTP catalog service for books, laptops and blog posts
//!
//! This library provides the record store, the catalog query builder and
//! the HTTP layer serving filtered listings over them.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod query;
pub mod services;
