//! Laptop repository
//!
//! This module provides:
//! - `LaptopRepository` trait defining the interface for laptop data access
//! - `SqlxLaptopRepository` implementing the trait for SQLite
//!
//! Prices are stored as integer cents and surfaced as two-digit decimals.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use crate::models::{
    cents_to_price, price_to_cents, Brand, CreateLaptopInput, Laptop, UpdateLaptopInput,
};
use crate::query::{CatalogQuery, LaptopColumn};

const LAPTOP_SELECT: &str = "SELECT id, brand, year_of_manufacture, ram, hdd_capacity, price_cents, quantity, created, modified FROM laptops";

/// Laptop repository trait
#[async_trait]
pub trait LaptopRepository: Send + Sync {
    /// Create a new laptop
    async fn create(&self, input: &CreateLaptopInput) -> Result<Laptop>;

    /// Get laptop by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Laptop>>;

    /// Update a laptop; `None` when it does not exist
    async fn update(&self, id: i64, input: &UpdateLaptopInput) -> Result<Option<Laptop>>;

    /// Delete a laptop; `false` when it did not exist
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Run a catalog query over laptops
    async fn find(&self, query: &CatalogQuery<LaptopColumn>) -> Result<Vec<Laptop>>;
}

/// SQLx-based laptop repository implementation
pub struct SqlxLaptopRepository {
    pool: SqlitePool,
}

impl SqlxLaptopRepository {
    /// Create a new SQLx laptop repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn LaptopRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl LaptopRepository for SqlxLaptopRepository {
    async fn create(&self, input: &CreateLaptopInput) -> Result<Laptop> {
        create_laptop_sqlite(&self.pool, input).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Laptop>> {
        get_laptop_by_id_sqlite(&self.pool, id).await
    }

    async fn update(&self, id: i64, input: &UpdateLaptopInput) -> Result<Option<Laptop>> {
        update_laptop_sqlite(&self.pool, id, input).await
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        delete_laptop_sqlite(&self.pool, id).await
    }

    async fn find(&self, query: &CatalogQuery<LaptopColumn>) -> Result<Vec<Laptop>> {
        find_laptops_sqlite(&self.pool, query).await
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

fn checked_price_cents(input: &CreateLaptopInput) -> Result<i64> {
    input
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid laptop: {}", e))?;
    price_to_cents(input.price).context("Invalid laptop price")
}

async fn create_laptop_sqlite(pool: &SqlitePool, input: &CreateLaptopInput) -> Result<Laptop> {
    let price_cents = checked_price_cents(input)?;
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO laptops (brand, year_of_manufacture, ram, hdd_capacity, price_cents, quantity, created, modified)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(input.brand.as_str())
    .bind(i64::from(input.year_of_manufacture))
    .bind(i64::from(input.ram))
    .bind(i64::from(input.hdd_capacity))
    .bind(price_cents)
    .bind(i64::from(input.quantity))
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create laptop")?;

    Ok(Laptop {
        id: result.last_insert_rowid(),
        brand: input.brand,
        year_of_manufacture: input.year_of_manufacture,
        ram: input.ram,
        hdd_capacity: input.hdd_capacity,
        price: cents_to_price(price_cents),
        quantity: input.quantity,
        created: now,
        modified: now,
    })
}

async fn get_laptop_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Laptop>> {
    let row = sqlx::query(&format!("{} WHERE id = ?", LAPTOP_SELECT))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get laptop by ID")?;

    row.as_ref().map(row_to_laptop_sqlite).transpose()
}

async fn update_laptop_sqlite(
    pool: &SqlitePool,
    id: i64,
    input: &UpdateLaptopInput,
) -> Result<Option<Laptop>> {
    let Some(existing) = get_laptop_by_id_sqlite(pool, id).await? else {
        return Ok(None);
    };

    let merged = input.apply(&existing);
    let price_cents = checked_price_cents(&merged)?;
    let now = Utc::now();

    sqlx::query(
        r#"
        UPDATE laptops
        SET brand = ?, year_of_manufacture = ?, ram = ?, hdd_capacity = ?, price_cents = ?, quantity = ?, modified = ?
        WHERE id = ?
        "#,
    )
    .bind(merged.brand.as_str())
    .bind(i64::from(merged.year_of_manufacture))
    .bind(i64::from(merged.ram))
    .bind(i64::from(merged.hdd_capacity))
    .bind(price_cents)
    .bind(i64::from(merged.quantity))
    .bind(now)
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to update laptop")?;

    Ok(Some(Laptop {
        id,
        brand: merged.brand,
        year_of_manufacture: merged.year_of_manufacture,
        ram: merged.ram,
        hdd_capacity: merged.hdd_capacity,
        price: cents_to_price(price_cents),
        quantity: merged.quantity,
        created: existing.created,
        modified: now,
    }))
}

async fn delete_laptop_sqlite(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM laptops WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete laptop")?;

    Ok(result.rows_affected() > 0)
}

async fn find_laptops_sqlite(
    pool: &SqlitePool,
    query: &CatalogQuery<LaptopColumn>,
) -> Result<Vec<Laptop>> {
    let mut qb = query.render(LAPTOP_SELECT);
    tracing::debug!("Laptop query: {}", qb.sql());

    let rows = qb
        .build()
        .fetch_all(pool)
        .await
        .context("Failed to query laptops")?;

    rows.iter().map(row_to_laptop_sqlite).collect()
}

fn row_to_laptop_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Laptop> {
    let brand_str: String = row.try_get("brand")?;
    let brand = brand_str.parse::<Brand>()?;

    let year: i64 = row.try_get("year_of_manufacture")?;
    let ram: i64 = row.try_get("ram")?;
    let hdd_capacity: i64 = row.try_get("hdd_capacity")?;
    let quantity: i64 = row.try_get("quantity")?;

    Ok(Laptop {
        id: row.try_get("id")?,
        brand,
        year_of_manufacture: u16::try_from(year).context("year_of_manufacture out of range")?,
        ram: u16::try_from(ram).context("ram out of range")?,
        hdd_capacity: u32::try_from(hdd_capacity).context("hdd_capacity out of range")?,
        price: cents_to_price(row.try_get("price_cents")?),
        quantity: u32::try_from(quantity).context("quantity out of range")?,
        created: row.try_get("created")?,
        modified: row.try_get("modified")?,
    })
}
