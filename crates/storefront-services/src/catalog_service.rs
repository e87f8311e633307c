//! # Catalog Service
//!
//! Product CRUD and filtered search over the catalog store. Attribute
//! references (category, brand, gender, color, size) arrive as NAMES and
//! are resolved against the lookup tables; an unknown name is the caller's
//! error, surfaced as NotFound for that attribute.
//!
//! The external search index that mirrors product changes is out of scope;
//! nothing here blocks on it.

use chrono::Utc;
use tracing::info;

use storefront_core::pricing;
use storefront_core::validation::{validate_price, validate_product_name};
use storefront_core::{CoreError, CoreResult, Product, ProductFilter, ProductRequest};
use storefront_db::repository::new_id;
use storefront_db::Database;

/// Resolved attribute ids for a product request.
struct ResolvedAttributes {
    category_id: String,
    brand_id: String,
    gender_id: String,
    color_id: String,
    size_id: String,
}

/// Catalog maintenance and search.
#[derive(Debug, Clone)]
pub struct CatalogService {
    db: Database,
}

impl CatalogService {
    /// Creates the service over a database handle.
    pub fn new(db: Database) -> Self {
        CatalogService { db }
    }

    /// Fetches a product.
    ///
    /// ## Errors
    /// * [`CoreError::NotFound`] - unknown product
    pub async fn product(&self, product_id: &str) -> CoreResult<Product> {
        self.db
            .products()
            .get_by_id(product_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Product", product_id))
    }

    /// Lists the whole catalog.
    pub async fn list_products(&self) -> CoreResult<Vec<Product>> {
        Ok(self.db.products().list_all().await?)
    }

    /// Creates a product from a request.
    ///
    /// New products start undiscounted with `original_price == price`.
    ///
    /// ## Errors
    /// * [`CoreError::Validation`] - empty name, negative price or quantity
    /// * [`CoreError::NotFound`] - an attribute name that does not resolve
    pub async fn create_product(&self, request: ProductRequest) -> CoreResult<Product> {
        validate_product_name(&request.name)?;
        validate_price(request.price)?;
        if request.quantity < 0 {
            return Err(storefront_core::error::ValidationError::MustNotBeNegative {
                field: "quantity".to_string(),
            }
            .into());
        }

        let attrs = self.resolve_attributes(&request).await?;

        let now = Utc::now();
        let product = Product {
            id: new_id(),
            name: request.name,
            description: request.description,
            price: request.price,
            original_price: request.price,
            is_discounted: false,
            discount_percentage: None,
            quantity: request.quantity,
            category_id: attrs.category_id,
            brand_id: attrs.brand_id,
            gender_id: attrs.gender_id,
            color_id: attrs.color_id,
            size_id: attrs.size_id,
            created_at: now,
            updated_at: now,
        };

        self.db.products().insert(&product).await?;

        info!(product_id = %product.id, name = %product.name, "Product created");

        Ok(product)
    }

    /// Updates a product from a request.
    ///
    /// The incoming price is the new list price: for an undiscounted
    /// product both `price` and `original_price` track it, keeping the
    /// snapshot invariant; for a discounted product it becomes the new
    /// `original_price` and the effective price is recomputed from the
    /// stored percentage.
    ///
    /// ## Errors
    /// * [`CoreError::NotFound`] - unknown product or attribute name
    /// * [`CoreError::Validation`] - empty name, negative price or quantity
    pub async fn update_product(
        &self,
        product_id: &str,
        request: ProductRequest,
    ) -> CoreResult<Product> {
        validate_product_name(&request.name)?;
        validate_price(request.price)?;
        if request.quantity < 0 {
            return Err(storefront_core::error::ValidationError::MustNotBeNegative {
                field: "quantity".to_string(),
            }
            .into());
        }

        let mut product = self.product(product_id).await?;
        let attrs = self.resolve_attributes(&request).await?;

        product.name = request.name;
        product.description = request.description;
        product.quantity = request.quantity;
        product.category_id = attrs.category_id;
        product.brand_id = attrs.brand_id;
        product.gender_id = attrs.gender_id;
        product.color_id = attrs.color_id;
        product.size_id = attrs.size_id;

        product.original_price = request.price;
        product.price = match product.discount_percentage {
            Some(pct) if product.is_discounted => pricing::discounted_price(request.price, pct),
            _ => request.price,
        };
        product.updated_at = Utc::now();

        self.db.products().update(&product).await?;

        info!(product_id = %product_id, "Product updated");

        Ok(product)
    }

    /// Hard-deletes a product.
    ///
    /// ## Errors
    /// * [`CoreError::NotFound`] - unknown product
    /// * [`CoreError::Database`] - order items still reference the row
    pub async fn delete_product(&self, product_id: &str) -> CoreResult<()> {
        self.db.products().delete(product_id).await?;

        info!(product_id = %product_id, "Product deleted");

        Ok(())
    }

    /// Searches the catalog with conjunctive filters.
    pub async fn search_products(&self, filter: &ProductFilter) -> CoreResult<Vec<Product>> {
        Ok(self.db.products().search(filter).await?)
    }

    async fn resolve_attributes(&self, request: &ProductRequest) -> CoreResult<ResolvedAttributes> {
        let catalog = self.db.catalog();

        let category = catalog.categories().require_by_name(&request.category_name).await?;
        let brand = catalog.brands().require_by_name(&request.brand_name).await?;
        let gender = catalog.genders().require_by_name(&request.gender_name).await?;
        let color = catalog.colors().require_by_name(&request.color_name).await?;
        let size = catalog.sizes().require_by_name(&request.size_name).await?;

        Ok(ResolvedAttributes {
            category_id: category.id,
            brand_id: brand.id,
            gender_id: gender.id,
            color_id: color.id,
            size_id: size.id,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{seed_attributes, test_db};
    use rust_decimal::Decimal;

    fn request(name: &str, price: &str, quantity: i64) -> ProductRequest {
        ProductRequest {
            name: name.to_string(),
            description: None,
            price: price.parse().unwrap(),
            quantity,
            category_name: "Footwear".to_string(),
            brand_name: "Northline".to_string(),
            gender_name: "Unisex".to_string(),
            color_name: "Black".to_string(),
            size_name: "42".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_resolves_attributes_and_snapshots_price() {
        let db = test_db().await;
        let attrs = seed_attributes(&db).await;
        let service = CatalogService::new(db.clone());

        let product = service
            .create_product(request("Trail Runner", "89.99", 40))
            .await
            .unwrap();

        assert_eq!(product.category_id, attrs.category.id);
        assert_eq!(product.brand_id, attrs.brand.id);
        assert_eq!(product.price, Decimal::new(8999, 2));
        assert_eq!(product.original_price, Decimal::new(8999, 2));
        assert!(!product.is_discounted);

        let fetched = service.product(&product.id).await.unwrap();
        assert_eq!(fetched.name, "Trail Runner");
    }

    #[tokio::test]
    async fn test_create_with_unknown_attribute_is_not_found() {
        let db = test_db().await;
        seed_attributes(&db).await;
        let service = CatalogService::new(db);

        let mut bad = request("X", "10.00", 1);
        bad.brand_name = "No Such Brand".to_string();

        let err = service.create_product(bad).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound { ref entity, .. } if entity == "Brand"));
    }

    #[tokio::test]
    async fn test_create_validates_inputs() {
        let db = test_db().await;
        seed_attributes(&db).await;
        let service = CatalogService::new(db);

        let err = service
            .create_product(request("", "10.00", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));

        let err = service
            .create_product(request("Neg", "-1.00", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));

        let err = service
            .create_product(request("NegQty", "1.00", -2))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_keeps_snapshot_invariant_for_undiscounted() {
        let db = test_db().await;
        seed_attributes(&db).await;
        let service = CatalogService::new(db);

        let product = service
            .create_product(request("Loafer", "74.50", 25))
            .await
            .unwrap();

        let updated = service
            .update_product(&product.id, request("Loafer", "79.00", 20))
            .await
            .unwrap();

        assert_eq!(updated.price, Decimal::new(7900, 2));
        assert_eq!(updated.original_price, Decimal::new(7900, 2));
        assert_eq!(updated.quantity, 20);
    }

    #[tokio::test]
    async fn test_update_recomputes_discounted_price_from_new_original() {
        let db = test_db().await;
        seed_attributes(&db).await;
        let service = CatalogService::new(db.clone());
        let pricing_service = crate::PricingService::new(db);

        let product = service
            .create_product(request("Boot", "100.00", 10))
            .await
            .unwrap();
        pricing_service
            .apply_discount(&product.id, Decimal::from(20))
            .await
            .unwrap();

        // New list price 150.00 at the standing 20% discount → 120.00
        let updated = service
            .update_product(&product.id, request("Boot", "150.00", 10))
            .await
            .unwrap();
        assert!(updated.is_discounted);
        assert_eq!(updated.original_price, Decimal::new(15000, 2));
        assert_eq!(updated.price, Decimal::new(12000, 2));
    }

    #[tokio::test]
    async fn test_delete_product() {
        let db = test_db().await;
        seed_attributes(&db).await;
        let service = CatalogService::new(db);

        let product = service
            .create_product(request("Doomed", "5.00", 1))
            .await
            .unwrap();

        service.delete_product(&product.id).await.unwrap();

        let err = service.product(&product.id).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_search_by_attribute_names() {
        let db = test_db().await;
        seed_attributes(&db).await;
        let service = CatalogService::new(db);

        service
            .create_product(request("Sneaker", "60.00", 5))
            .await
            .unwrap();

        let hits = service
            .search_products(&ProductFilter {
                category: Some("Footwear".to_string()),
                brand: Some("Northline".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);

        let misses = service
            .search_products(&ProductFilter {
                category: Some("Outerwear".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(misses.is_empty());
    }
}
