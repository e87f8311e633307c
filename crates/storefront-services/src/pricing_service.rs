//! # Pricing Service
//!
//! The pricing engine: owns the discount on/off state per product and the
//! effective-price computation.
//!
//! All arithmetic is `Decimal`; the original-price snapshot makes every
//! discount fully reversible with no rounding drift (see
//! `storefront_core::pricing`).

use rust_decimal::Decimal;
use tracing::info;

use storefront_core::validation::validate_percentage;
use storefront_core::{CoreError, CoreResult, Product};
use storefront_db::Database;

/// Applies and removes product discounts.
#[derive(Debug, Clone)]
pub struct PricingService {
    db: Database,
}

impl PricingService {
    /// Creates the service over a database handle.
    pub fn new(db: Database) -> Self {
        PricingService { db }
    }

    /// Applies a percentage discount to a product.
    ///
    /// If the product is not currently discounted its price is snapshotted
    /// into `original_price` first; re-applying recomputes from that
    /// snapshot, never compounding on the discounted price.
    ///
    /// ## Errors
    /// * [`CoreError::Validation`] - percentage outside `[0, 100]`
    /// * [`CoreError::NotFound`] - unknown product
    pub async fn apply_discount(&self, product_id: &str, percentage: Decimal) -> CoreResult<Product> {
        validate_percentage(percentage)?;

        let product = self.db.products().apply_discount(product_id, percentage).await?;

        info!(
            product_id = %product_id,
            percentage = %percentage,
            price = %product.price,
            "Discount applied"
        );

        Ok(product)
    }

    /// Removes a product's discount, restoring the original price exactly.
    ///
    /// Remove-when-not-discounted is rejected, not a no-op: surfacing the
    /// caller bug beats silently absorbing it.
    ///
    /// ## Errors
    /// * [`CoreError::NotFound`] - unknown product
    /// * [`CoreError::InvalidState`] - product is not discounted
    pub async fn remove_discount(&self, product_id: &str) -> CoreResult<Product> {
        let restored = self.db.products().remove_discount(product_id).await?;

        if !restored {
            // The conditional UPDATE matched nothing: missing row or not
            // discounted. Disambiguate for the caller.
            return match self.db.products().get_by_id(product_id).await? {
                None => Err(CoreError::not_found("Product", product_id)),
                Some(_) => Err(CoreError::invalid_state("product is not discounted")),
            };
        }

        let product = self
            .db
            .products()
            .get_by_id(product_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Product", product_id))?;

        info!(product_id = %product_id, price = %product.price, "Discount removed");

        Ok(product)
    }

    /// Lists every product currently carrying a discount.
    pub async fn list_discounted(&self) -> CoreResult<Vec<Product>> {
        Ok(self.db.products().list_discounted().await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{seed_attributes, seed_product, test_db};

    #[tokio::test]
    async fn test_apply_then_remove_restores_price_exactly() {
        let db = test_db().await;
        let attrs = seed_attributes(&db).await;
        let service = PricingService::new(db.clone());

        // Sweep representative percentages, including awkward fractions.
        for (index, pct) in [
            Decimal::ZERO,
            Decimal::from(20),
            Decimal::new(335, 1),  // 33.5
            Decimal::new(1, 2),    // 0.01
            Decimal::ONE_HUNDRED,
        ]
        .into_iter()
        .enumerate()
        {
            let product =
                seed_product(&db, &attrs, &format!("Sweep {index}"), "19.99", 10).await;

            service.apply_discount(&product.id, pct).await.unwrap();
            let restored = service.remove_discount(&product.id).await.unwrap();

            assert_eq!(restored.price, Decimal::new(1999, 2));
            assert_eq!(restored.original_price, Decimal::new(1999, 2));
            assert!(!restored.is_discounted);
            assert!(restored.discount_percentage.is_none());
        }
    }

    #[tokio::test]
    async fn test_double_apply_derives_from_original() {
        let db = test_db().await;
        let attrs = seed_attributes(&db).await;
        let service = PricingService::new(db.clone());
        let product = seed_product(&db, &attrs, "Parka", "200.00", 5).await;

        let first = service
            .apply_discount(&product.id, Decimal::from(25))
            .await
            .unwrap();
        assert_eq!(first.price, Decimal::new(15000, 2)); // 150.00

        let second = service
            .apply_discount(&product.id, Decimal::from(10))
            .await
            .unwrap();
        // 10% off the ORIGINAL 200.00, not off 150.00
        assert_eq!(second.price, Decimal::new(18000, 2));
        assert_eq!(second.original_price, Decimal::new(20000, 2));
        assert_eq!(second.discount_percentage, Some(Decimal::from(10)));
    }

    #[tokio::test]
    async fn test_remove_on_undiscounted_is_invalid_state() {
        let db = test_db().await;
        let attrs = seed_attributes(&db).await;
        let service = PricingService::new(db.clone());
        let product = seed_product(&db, &attrs, "Vest", "59.00", 5).await;

        let err = service.remove_discount(&product.id).await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_unknown_product_is_not_found() {
        let db = test_db().await;
        let service = PricingService::new(db);

        let err = service
            .apply_discount("ghost", Decimal::from(10))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));

        let err = service.remove_discount("ghost").await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_percentage_bounds_are_validated() {
        let db = test_db().await;
        let attrs = seed_attributes(&db).await;
        let service = PricingService::new(db.clone());
        let product = seed_product(&db, &attrs, "Tee", "15.00", 5).await;

        let err = service
            .apply_discount(&product.id, Decimal::from(101))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));

        let err = service
            .apply_discount(&product.id, Decimal::from(-5))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_list_discounted() {
        let db = test_db().await;
        let attrs = seed_attributes(&db).await;
        let service = PricingService::new(db.clone());
        let a = seed_product(&db, &attrs, "A", "10.00", 1).await;
        let _b = seed_product(&db, &attrs, "B", "20.00", 1).await;

        assert!(service.list_discounted().await.unwrap().is_empty());

        service.apply_discount(&a.id, Decimal::from(15)).await.unwrap();

        let discounted = service.list_discounted().await.unwrap();
        assert_eq!(discounted.len(), 1);
        assert_eq!(discounted[0].id, a.id);
    }
}
