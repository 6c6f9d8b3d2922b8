//! Laptop listing queries
//!
//! Every laptop listing is restricted to records with stock left; the
//! optional criteria only narrow that set further.

use super::{CatalogQuery, Column, OrderBy, Predicate, Value};
use crate::models::Brand;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaptopColumn {
    Id,
    Brand,
    PriceCents,
    Quantity,
    Created,
}

impl Column for LaptopColumn {
    fn name(&self) -> &'static str {
        match self {
            LaptopColumn::Id => "id",
            LaptopColumn::Brand => "brand",
            LaptopColumn::PriceCents => "price_cents",
            LaptopColumn::Quantity => "quantity",
            LaptopColumn::Created => "created",
        }
    }
}

/// Optional laptop filters. Validation (known brand, non-negative price)
/// happens before these are built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaptopCriteria {
    pub brand: Option<Brand>,
    /// Minimum price in whole currency units
    pub min_price: Option<u32>,
}

/// Build the filter for `criteria`; always requires quantity > 0.
pub fn filter(criteria: &LaptopCriteria) -> Predicate<LaptopColumn> {
    let mut predicate = Predicate::Gt(LaptopColumn::Quantity, Value::Int(0));

    if let Some(brand) = criteria.brand {
        predicate = predicate.and(Predicate::Eq(LaptopColumn::Brand, brand.as_str().into()));
    }
    if let Some(min_price) = criteria.min_price {
        let min_cents = i64::from(min_price) * 100;
        predicate = predicate.and(Predicate::Gte(LaptopColumn::PriceCents, Value::Int(min_cents)));
    }

    predicate
}

/// Newest first
pub fn by_recency() -> Vec<OrderBy<LaptopColumn>> {
    vec![OrderBy::desc(LaptopColumn::Created), OrderBy::desc(LaptopColumn::Id)]
}

/// Cheapest first
pub fn by_price() -> Vec<OrderBy<LaptopColumn>> {
    vec![OrderBy::asc(LaptopColumn::PriceCents), OrderBy::asc(LaptopColumn::Id)]
}

/// All laptops in stock, newest first
pub fn in_stock() -> CatalogQuery<LaptopColumn> {
    CatalogQuery::new(filter(&LaptopCriteria::default())).order_by(by_recency())
}

/// Laptops matching `criteria`, cheapest first
pub fn filtered(criteria: &LaptopCriteria) -> CatalogQuery<LaptopColumn> {
    CatalogQuery::new(filter(criteria)).order_by(by_price())
}

/// The single most recently added laptop in stock
pub fn latest() -> CatalogQuery<LaptopColumn> {
    in_stock().limit(1)
}
