//! Laptop model
//!
//! This module provides:
//! - `Laptop` entity for the hardware catalog
//! - `Brand` closed value set
//! - Input types for creating and updating laptops
//! - Conversions between decimal prices and stored cents

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::UnknownVariant;

/// Prices hold at most 10 digits, two of them fractional.
pub const MAX_PRICE_CENTS: i64 = 9_999_999_999;

/// Laptop entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Laptop {
    pub id: i64,
    pub brand: Brand,
    pub year_of_manufacture: u16,
    /// RAM in gigabytes
    pub ram: u16,
    /// Disk capacity in gigabytes
    pub hdd_capacity: u32,
    /// Price with exactly two fractional digits
    pub price: Decimal,
    /// Units in stock
    pub quantity: u32,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// Laptop manufacturer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Brand {
    #[default]
    Apple,
    Thinkpad,
}

impl Brand {
    /// Convert brand to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Brand::Apple => "apple",
            Brand::Thinkpad => "thinkpad",
        }
    }
}

impl FromStr for Brand {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "apple" => Ok(Brand::Apple),
            "thinkpad" => Ok(Brand::Thinkpad),
            other => Err(UnknownVariant::new("brand", other, "apple, thinkpad")),
        }
    }
}

impl std::fmt::Display for Brand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Convert a price to whole cents.
///
/// Returns `None` for negative prices, prices with more than two significant
/// fractional digits, or prices above `MAX_PRICE_CENTS`.
pub fn price_to_cents(price: Decimal) -> Option<i64> {
    if price < Decimal::ZERO || price.normalize().scale() > 2 {
        return None;
    }
    let cents = (price * Decimal::ONE_HUNDRED).to_i64()?;
    (cents <= MAX_PRICE_CENTS).then_some(cents)
}

/// Convert stored cents back to a two-digit decimal price
pub fn cents_to_price(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

fn default_price() -> Decimal {
    Decimal::new(150_000, 2)
}

/// Input for creating a new laptop
///
/// Every field has a catalog default, so `CreateLaptopInput::default()`
/// describes a complete laptop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateLaptopInput {
    pub brand: Brand,
    pub year_of_manufacture: u16,
    pub ram: u16,
    pub hdd_capacity: u32,
    pub price: Decimal,
    pub quantity: u32,
}

impl Default for CreateLaptopInput {
    fn default() -> Self {
        Self {
            brand: Brand::default(),
            year_of_manufacture: 2024,
            ram: 16,
            hdd_capacity: 512,
            price: default_price(),
            quantity: 10,
        }
    }
}

impl CreateLaptopInput {
    pub fn new(brand: Brand) -> Self {
        Self {
            brand,
            ..Self::default()
        }
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = price;
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_ram(mut self, ram: u16) -> Self {
        self.ram = ram;
        self
    }

    /// Check positivity and price precision
    pub fn validate(&self) -> Result<(), String> {
        if self.year_of_manufacture == 0 {
            return Err("year_of_manufacture must be positive".to_string());
        }
        if self.ram == 0 {
            return Err("ram must be positive".to_string());
        }
        if self.hdd_capacity == 0 {
            return Err("hdd_capacity must be positive".to_string());
        }
        if price_to_cents(self.price).is_none() {
            return Err(format!(
                "price {} must be non-negative with at most 10 digits and 2 decimal places",
                self.price
            ));
        }
        Ok(())
    }
}

/// Input for updating an existing laptop
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateLaptopInput {
    pub brand: Option<Brand>,
    pub year_of_manufacture: Option<u16>,
    pub ram: Option<u16>,
    pub hdd_capacity: Option<u32>,
    pub price: Option<Decimal>,
    pub quantity: Option<u32>,
}

impl UpdateLaptopInput {
    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Check if any field is set
    pub fn has_changes(&self) -> bool {
        self.brand.is_some()
            || self.year_of_manufacture.is_some()
            || self.ram.is_some()
            || self.hdd_capacity.is_some()
            || self.price.is_some()
            || self.quantity.is_some()
    }

    /// Apply the set fields to a copy of `laptop`
    pub fn apply(&self, laptop: &Laptop) -> CreateLaptopInput {
        CreateLaptopInput {
            brand: self.brand.unwrap_or(laptop.brand),
            year_of_manufacture: self.year_of_manufacture.unwrap_or(laptop.year_of_manufacture),
            ram: self.ram.unwrap_or(laptop.ram),
            hdd_capacity: self.hdd_capacity.unwrap_or(laptop.hdd_capacity),
            price: self.price.unwrap_or(laptop.price),
            quantity: self.quantity.unwrap_or(laptop.quantity),
        }
    }
}
