//! # Catalog Repository
//!
//! Attribute lookup tables: Category, Brand, Gender, Color, Size.
//!
//! All five tables share the same `{id, name}` shape and the same access
//! pattern (by-id and by-name lookups, used when creating or updating
//! products), so one parameterized repository serves them all.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::new_id;
use storefront_core::Attribute;

/// Access to one attribute table.
///
/// Obtained via [`CatalogRepository::categories`] and friends; the table
/// name is a compile-time constant, never caller input.
#[derive(Debug, Clone)]
pub struct AttributeRepository {
    pool: SqlitePool,
    table: &'static str,
    entity: &'static str,
}

impl AttributeRepository {
    fn new(pool: SqlitePool, table: &'static str, entity: &'static str) -> Self {
        AttributeRepository {
            pool,
            table,
            entity,
        }
    }

    /// The entity label used in NotFound errors ("Category", "Brand", ...).
    pub fn entity(&self) -> &'static str {
        self.entity
    }

    /// Inserts a new attribute value.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - Name already exists
    pub async fn insert(&self, name: &str) -> DbResult<Attribute> {
        let attribute = Attribute {
            id: new_id(),
            name: name.to_string(),
        };

        debug!(table = self.table, name = %name, "Inserting attribute");

        let sql = format!("INSERT INTO {} (id, name) VALUES (?1, ?2)", self.table);
        sqlx::query(&sql)
            .bind(&attribute.id)
            .bind(&attribute.name)
            .execute(&self.pool)
            .await?;

        Ok(attribute)
    }

    /// Gets an attribute by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Attribute>> {
        let sql = format!("SELECT id, name FROM {} WHERE id = ?1", self.table);

        let attribute: Option<Attribute> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(attribute)
    }

    /// Gets an attribute by its unique name.
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<Attribute>> {
        let sql = format!("SELECT id, name FROM {} WHERE name = ?1", self.table);

        let attribute: Option<Attribute> = sqlx::query_as(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(attribute)
    }

    /// Resolves an attribute by name, failing with NotFound when missing.
    pub async fn require_by_name(&self, name: &str) -> DbResult<Attribute> {
        self.get_by_name(name)
            .await?
            .ok_or_else(|| DbError::not_found(self.entity, name))
    }

    /// Lists all values in this attribute table.
    pub async fn list(&self) -> DbResult<Vec<Attribute>> {
        let sql = format!("SELECT id, name FROM {} ORDER BY name", self.table);

        let attributes: Vec<Attribute> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        Ok(attributes)
    }
}

/// Entry point to the five attribute tables.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Category lookups.
    pub fn categories(&self) -> AttributeRepository {
        AttributeRepository::new(self.pool.clone(), "categories", "Category")
    }

    /// Brand lookups.
    pub fn brands(&self) -> AttributeRepository {
        AttributeRepository::new(self.pool.clone(), "brands", "Brand")
    }

    /// Gender lookups.
    pub fn genders(&self) -> AttributeRepository {
        AttributeRepository::new(self.pool.clone(), "genders", "Gender")
    }

    /// Color lookups.
    pub fn colors(&self) -> AttributeRepository {
        AttributeRepository::new(self.pool.clone(), "colors", "Color")
    }

    /// Size lookups.
    pub fn sizes(&self) -> AttributeRepository {
        AttributeRepository::new(self.pool.clone(), "sizes", "Size")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::test_db;

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let db = test_db().await;
        let categories = db.catalog().categories();

        let created = categories.insert("Shoes").await.unwrap();

        let by_id = categories.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(by_id.name, "Shoes");

        let by_name = categories.get_by_name("Shoes").await.unwrap().unwrap();
        assert_eq!(by_name.id, created.id);

        assert!(categories.get_by_name("Hats").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_require_by_name_not_found() {
        let db = test_db().await;

        let err = db
            .catalog()
            .brands()
            .require_by_name("Ghost Brand")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
        assert_eq!(err.to_string(), "Brand not found: Ghost Brand");
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let db = test_db().await;
        let sizes = db.catalog().sizes();

        sizes.insert("XL").await.unwrap();
        let err = sizes.insert("XL").await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_tables_are_independent() {
        let db = test_db().await;

        db.catalog().colors().insert("Red").await.unwrap();
        assert!(db
            .catalog()
            .sizes()
            .get_by_name("Red")
            .await
            .unwrap()
            .is_none());
    }
}
