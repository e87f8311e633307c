//! # Product Repository
//!
//! Database operations for product rows.
//!
//! ## Key Operations
//! - CRUD and filtered search
//! - Discount apply/remove (price snapshot semantics)
//! - Authoritative stock decrement
//!
//! ## Discount Snapshot
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    apply_discount(id, pct)                              │
//! │                                                                         │
//! │  read row ──► discounted already?                                      │
//! │                  │ no: original_price ← price   (snapshot once)        │
//! │                  │ yes: keep original_price     (never re-snapshot)    │
//! │                  ▼                                                      │
//! │  price ← original_price × (1 − pct/100)                                │
//! │  write row (same transaction as the read)                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! The read and write share one transaction so concurrent applies on the
//! same product cannot interleave into a double snapshot.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::parse_decimal;
use storefront_core::pricing;
use storefront_core::{Product, ProductFilter};

/// Every product column, in insert order.
const PRODUCT_COLUMNS: &str = "id, name, description, price, original_price, is_discounted, \
     discount_percentage, quantity, category_id, brand_id, gender_id, color_id, size_id, \
     created_at, updated_at";

/// Raw product row as stored; decimal columns are TEXT until parsed.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    name: String,
    description: Option<String>,
    price: String,
    original_price: String,
    is_discounted: bool,
    discount_percentage: Option<String>,
    quantity: i64,
    category_id: String,
    brand_id: String,
    gender_id: String,
    color_id: String,
    size_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProductRow {
    /// Parses the decimal TEXT columns into the domain type.
    fn into_product(self) -> DbResult<Product> {
        let price = parse_decimal("products.price", &self.price)?;
        let original_price = parse_decimal("products.original_price", &self.original_price)?;
        let discount_percentage = self
            .discount_percentage
            .as_deref()
            .map(|raw| parse_decimal("products.discount_percentage", raw))
            .transpose()?;

        Ok(Product {
            id: self.id,
            name: self.name,
            description: self.description,
            price,
            original_price,
            is_discounted: self.is_discounted,
            discount_percentage,
            quantity: self.quantity,
            category_id: self.category_id,
            brand_id: self.brand_id,
            gender_id: self.gender_id,
            color_id: self.color_id,
            size_id: self.size_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let product = repo.get_by_id("uuid-here").await?;
/// let discounted = repo.apply_discount("uuid-here", Decimal::from(20)).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its id.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");

        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(ProductRow::into_product).transpose()
    }

    /// Lists all products, ordered by name.
    pub async fn list_all(&self) -> DbResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name, id");

        let rows: Vec<ProductRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }

    /// Lists products that currently carry a discount.
    pub async fn list_discounted(&self) -> DbResult<Vec<Product>> {
        let sql =
            format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE is_discounted = 1 ORDER BY name, id");

        let rows: Vec<ProductRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }

    /// Inserts a new product.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            "INSERT INTO products ( \
                id, name, description, price, original_price, is_discounted, \
                discount_percentage, quantity, category_id, brand_id, gender_id, \
                color_id, size_id, created_at, updated_at \
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price.to_string())
        .bind(product.original_price.to_string())
        .bind(product.is_discounted)
        .bind(product.discount_percentage.map(|p| p.to_string()))
        .bind(product.quantity)
        .bind(&product.category_id)
        .bind(&product.brand_id)
        .bind(&product.gender_id)
        .bind(&product.color_id)
        .bind(&product.size_id)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing product row in full.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET \
                name = ?2, description = ?3, price = ?4, original_price = ?5, \
                is_discounted = ?6, discount_percentage = ?7, quantity = ?8, \
                category_id = ?9, brand_id = ?10, gender_id = ?11, color_id = ?12, \
                size_id = ?13, updated_at = ?14 \
            WHERE id = ?1",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price.to_string())
        .bind(product.original_price.to_string())
        .bind(product.is_discounted)
        .bind(product.discount_percentage.map(|p| p.to_string()))
        .bind(product.quantity)
        .bind(&product.category_id)
        .bind(&product.brand_id)
        .bind(&product.gender_id)
        .bind(&product.color_id)
        .bind(&product.size_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Hard-deletes a product.
    ///
    /// Fails with a foreign key violation while order items still reference
    /// the row; order history keeps priority over catalog cleanup.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Searches products with conjunctive filters.
    ///
    /// Attribute filters match by NAME via joins on the lookup tables.
    /// Price bounds are applied after the decimal parse: the price column is
    /// TEXT and SQLite would compare it lexicographically.
    pub async fn search(&self, filter: &ProductFilter) -> DbResult<Vec<Product>> {
        let mut builder = QueryBuilder::<Sqlite>::new(
            "SELECT p.id, p.name, p.description, p.price, p.original_price, \
             p.is_discounted, p.discount_percentage, p.quantity, p.category_id, \
             p.brand_id, p.gender_id, p.color_id, p.size_id, p.created_at, p.updated_at \
             FROM products p \
             JOIN categories c ON c.id = p.category_id \
             JOIN brands b ON b.id = p.brand_id \
             JOIN genders g ON g.id = p.gender_id \
             JOIN colors col ON col.id = p.color_id \
             JOIN sizes s ON s.id = p.size_id \
             WHERE 1 = 1",
        );

        if let Some(category) = &filter.category {
            builder.push(" AND c.name = ").push_bind(category);
        }
        if let Some(gender) = &filter.gender {
            builder.push(" AND g.name = ").push_bind(gender);
        }
        if let Some(brand) = &filter.brand {
            builder.push(" AND b.name = ").push_bind(brand);
        }
        if let Some(size) = &filter.size {
            builder.push(" AND s.name = ").push_bind(size);
        }
        if let Some(color) = &filter.color {
            builder.push(" AND col.name = ").push_bind(color);
        }
        if let Some(in_stock) = filter.in_stock {
            builder.push(" AND (p.quantity > 0) = ").push_bind(in_stock);
        }
        builder.push(" ORDER BY p.name, p.id");

        let rows: Vec<ProductRow> = builder.build_query_as().fetch_all(&self.pool).await?;

        let mut products = rows
            .into_iter()
            .map(ProductRow::into_product)
            .collect::<DbResult<Vec<_>>>()?;

        if let Some(min) = filter.min_price {
            products.retain(|p| p.price >= min);
        }
        if let Some(max) = filter.max_price {
            products.retain(|p| p.price <= max);
        }

        debug!(count = products.len(), "Product search returned");
        Ok(products)
    }

    /// Applies a percentage discount, snapshotting the pre-discount price
    /// exactly once.
    ///
    /// Runs the read and the write in one transaction. Re-applying while
    /// already discounted recomputes from the stored `original_price`; it
    /// never compounds on the discounted price.
    ///
    /// ## Returns
    /// The updated product.
    pub async fn apply_discount(&self, id: &str, percentage: Decimal) -> DbResult<Product> {
        debug!(id = %id, percentage = %percentage, "Applying discount");

        let mut tx = self.pool.begin().await?;

        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let mut product = row
            .ok_or_else(|| DbError::not_found("Product", id))?
            .into_product()?;

        // Snapshot once: an already-discounted product keeps its original.
        if !product.is_discounted {
            product.original_price = product.price;
        }
        product.price = pricing::discounted_price(product.original_price, percentage);
        product.discount_percentage = Some(percentage);
        product.is_discounted = true;
        product.updated_at = Utc::now();

        sqlx::query(
            "UPDATE products SET price = ?2, original_price = ?3, is_discounted = ?4, \
             discount_percentage = ?5, updated_at = ?6 WHERE id = ?1",
        )
        .bind(id)
        .bind(product.price.to_string())
        .bind(product.original_price.to_string())
        .bind(product.is_discounted)
        .bind(product.discount_percentage.map(|p| p.to_string()))
        .bind(product.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(product)
    }

    /// Removes a discount, restoring the original price.
    ///
    /// A single conditional UPDATE: it only touches rows that are currently
    /// discounted, so the restore cannot race with another remove.
    ///
    /// ## Returns
    /// * `Ok(true)` - A discounted row was restored
    /// * `Ok(false)` - No discounted row matched (missing product or not
    ///   discounted; the caller disambiguates)
    pub async fn remove_discount(&self, id: &str) -> DbResult<bool> {
        debug!(id = %id, "Removing discount");

        let result = sqlx::query(
            "UPDATE products SET price = original_price, is_discounted = 0, \
             discount_percentage = NULL, updated_at = ?2 \
             WHERE id = ?1 AND is_discounted = 1",
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Decrements the stored on-hand quantity, all-or-nothing.
    ///
    /// A single conditional UPDATE guarded by `quantity >= amount`: the
    /// check and the decrement are one atomic statement, so an insufficient
    /// balance never produces a partial write and concurrent decrements
    /// cannot oversell.
    ///
    /// ## Returns
    /// * `Ok(true)` - Quantity decremented
    /// * `Ok(false)` - No row matched (missing product or insufficient
    ///   stock; the caller disambiguates)
    pub async fn decrement_quantity(&self, id: &str, amount: i64) -> DbResult<bool> {
        debug!(id = %id, amount = %amount, "Decrementing stock");

        let result = sqlx::query(
            "UPDATE products SET quantity = quantity - ?2, updated_at = ?3 \
             WHERE id = ?1 AND quantity >= ?2",
        )
        .bind(id)
        .bind(amount)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
