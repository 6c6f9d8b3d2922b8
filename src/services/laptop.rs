//! Laptop service
//!
//! Listings only ever include laptops with stock left:
//! - in-stock listing, newest first
//! - brand / minimum price filtering, cheapest first
//! - the most recently added laptop in stock

use std::sync::Arc;

use super::CatalogError;
use crate::db::repositories::LaptopRepository;
use crate::models::{Brand, Laptop};
use crate::query::{laptop, LaptopCriteria};

/// Parse raw `brand` / `min_price` request parameters
///
/// Blank values count as absent. An unknown brand, or a minimum price that
/// is negative or not an integer, is rejected.
pub fn parse_laptop_criteria(
    brand: Option<&str>,
    min_price: Option<&str>,
) -> Result<LaptopCriteria, CatalogError> {
    let brand = brand
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(str::parse::<Brand>)
        .transpose()?;

    let min_price = match min_price.map(str::trim).filter(|p| !p.is_empty()) {
        None => None,
        Some(raw) => {
            let value: i64 = raw.parse().map_err(|_| {
                CatalogError::invalid(format!("min_price must be an integer, got '{}'", raw))
            })?;
            if value < 0 {
                return Err(CatalogError::invalid("min_price must not be negative"));
            }
            let value = u32::try_from(value)
                .map_err(|_| CatalogError::invalid("min_price is out of range"))?;
            Some(value)
        }
    };

    Ok(LaptopCriteria { brand, min_price })
}

/// Laptop service
pub struct LaptopService {
    repo: Arc<dyn LaptopRepository>,
}

impl LaptopService {
    pub fn new(repo: Arc<dyn LaptopRepository>) -> Self {
        Self { repo }
    }

    /// Get a laptop by id, in stock or not
    pub async fn get(&self, id: i64) -> Result<Laptop, CatalogError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::not_found(format!("Laptop not found: {}", id)))
    }

    /// All laptops in stock, newest first
    pub async fn in_stock(&self) -> Result<Vec<Laptop>, CatalogError> {
        Ok(self.repo.find(&laptop::in_stock()).await?)
    }

    /// Laptops in stock matching `criteria`, cheapest first
    pub async fn filter(&self, criteria: &LaptopCriteria) -> Result<Vec<Laptop>, CatalogError> {
        let laptops = self.repo.find(&laptop::filtered(criteria)).await?;
        tracing::debug!(
            "Laptop filter brand={:?} min_price={:?} matched {}",
            criteria.brand,
            criteria.min_price,
            laptops.len()
        );
        Ok(laptops)
    }

    /// The most recently added laptop in stock
    pub async fn latest(&self) -> Result<Laptop, CatalogError> {
        self.repo
            .find(&laptop::latest())
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::not_found("No laptops in stock"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxLaptopRepository;
    use crate::db::{create_test_pool, migrations};
    use crate::models::CreateLaptopInput;
    use rust_decimal::Decimal;

    async fn setup_test_service() -> (Arc<dyn LaptopRepository>, LaptopService) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let repo = SqlxLaptopRepository::boxed(pool);
        (repo.clone(), LaptopService::new(repo))
    }

    #[test]
    fn test_parse_criteria() {
        let criteria = parse_laptop_criteria(Some("thinkpad"), Some("1200")).unwrap();
        assert_eq!(criteria.brand, Some(Brand::Thinkpad));
        assert_eq!(criteria.min_price, Some(1200));

        assert_eq!(
            parse_laptop_criteria(Some(""), None).unwrap(),
            LaptopCriteria::default()
        );
        assert_eq!(
            parse_laptop_criteria(None, Some("0")).unwrap().min_price,
            Some(0)
        );
    }

    #[test]
    fn test_parse_criteria_rejects_bad_values() {
        for (brand, price) in [
            (Some("dell"), None),
            (Some("Apple"), None),
            (None, Some("-1")),
            (None, Some("abc")),
            (None, Some("12.5")),
            (None, Some("99999999999")),
        ] {
            assert!(
                matches!(
                    parse_laptop_criteria(brand, price),
                    Err(CatalogError::InvalidParameter(_))
                ),
                "expected rejection for {:?} {:?}",
                brand,
                price
            );
        }
    }

    #[tokio::test]
    async fn test_latest_without_stock_is_not_found() {
        let (repo, service) = setup_test_service().await;
        repo.create(&CreateLaptopInput::new(Brand::Apple).with_quantity(0))
            .await
            .unwrap();

        assert!(matches!(service.latest().await, Err(CatalogError::NotFound(_))));
        assert!(service.in_stock().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_returns_out_of_stock_laptop() {
        let (repo, service) = setup_test_service().await;
        let created = repo
            .create(&CreateLaptopInput::new(Brand::Thinkpad).with_quantity(0))
            .await
            .unwrap();

        let found = service.get(created.id).await.unwrap();
        assert_eq!(found.id, created.id);
        assert!(matches!(service.get(created.id + 1).await, Err(CatalogError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_in_stock_newest_first() {
        let (repo, service) = setup_test_service().await;
        let first = repo.create(&CreateLaptopInput::new(Brand::Apple)).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        let second = repo
            .create(&CreateLaptopInput::new(Brand::Thinkpad))
            .await
            .unwrap();

        let ids: Vec<i64> = service.in_stock().await.unwrap().iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
        assert_eq!(service.latest().await.unwrap().id, second.id);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn laptop_row() -> impl Strategy<Value = (bool, u32, u32)> {
            (any::<bool>(), 0u32..5000, 0u32..3)
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(20))]

            /// Listings never include laptops without stock, every result
            /// honours the minimum price and prices never decrease.
            #[test]
            fn property_filter_respects_stock_price_and_order(
                laptops in proptest::collection::vec(laptop_row(), 1..12),
                min_price in 0u32..5000,
                brand in proptest::option::of(prop_oneof![Just(Brand::Apple), Just(Brand::Thinkpad)]),
            ) {
                let result: Result<(), TestCaseError> = tokio_test::block_on(async {
                    let (repo, service) = setup_test_service().await;
                    for (thinkpad, price, quantity) in &laptops {
                        let brand = if *thinkpad { Brand::Thinkpad } else { Brand::Apple };
                        repo.create(
                            &CreateLaptopInput::new(brand)
                                .with_price(Decimal::from(*price))
                                .with_quantity(*quantity),
                        )
                        .await
                        .expect("create should succeed");
                    }

                    let criteria = LaptopCriteria { brand, min_price: Some(min_price) };
                    let found = service.filter(&criteria).await.expect("filter should succeed");

                    let expected = laptops
                        .iter()
                        .filter(|(thinkpad, price, quantity)| {
                            let b = if *thinkpad { Brand::Thinkpad } else { Brand::Apple };
                            *quantity > 0
                                && *price >= min_price
                                && brand.map_or(true, |wanted| wanted == b)
                        })
                        .count();
                    prop_assert_eq!(found.len(), expected);

                    for laptop in &found {
                        prop_assert!(laptop.quantity > 0);
                        prop_assert!(laptop.price >= Decimal::from(min_price));
                        if let Some(wanted) = brand {
                            prop_assert_eq!(laptop.brand, wanted);
                        }
                    }
                    for pair in found.windows(2) {
                        prop_assert!(pair[0].price <= pair[1].price);
                    }
                    Ok(())
                });
                result?;
            }

            /// Anything outside the brand set is rejected before a query runs.
            #[test]
            fn property_unknown_brand_rejected(raw in "[a-z]{1,12}") {
                prop_assume!(raw != "apple" && raw != "thinkpad");
                prop_assert!(matches!(
                    parse_laptop_criteria(Some(&raw), None),
                    Err(CatalogError::InvalidParameter(_))
                ));
            }
        }
    }
}
