//! Shared fixtures for the service tests.
//!
//! Every test gets its own in-memory database, so fixture names repeat
//! across tests without colliding.

use chrono::Utc;
use tracing_subscriber::EnvFilter;

use storefront_core::{Attribute, Order, OrderItemRequest, OrderStatus, Product, User};
use storefront_db::repository::new_id;
use storefront_db::{Database, DbConfig};

/// One value from each attribute table, enough to satisfy product FKs.
pub(crate) struct AttributeSet {
    pub category: Attribute,
    pub brand: Attribute,
    pub gender: Attribute,
    pub color: Attribute,
    pub size: Attribute,
}

/// Fresh, migrated in-memory database. Installs a tracing subscriber on
/// first use so `RUST_LOG=debug cargo test` shows the engine's logs.
pub(crate) async fn test_db() -> Database {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database")
}

/// Seeds one row in each attribute table.
pub(crate) async fn seed_attributes(db: &Database) -> AttributeSet {
    let catalog = db.catalog();
    AttributeSet {
        category: catalog.categories().insert("Footwear").await.unwrap(),
        brand: catalog.brands().insert("Northline").await.unwrap(),
        gender: catalog.genders().insert("Unisex").await.unwrap(),
        color: catalog.colors().insert("Black").await.unwrap(),
        size: catalog.sizes().insert("42").await.unwrap(),
    }
}

/// Seeds an undiscounted product with the given price and on-hand quantity.
pub(crate) async fn seed_product(
    db: &Database,
    attrs: &AttributeSet,
    name: &str,
    price: &str,
    quantity: i64,
) -> Product {
    let now = Utc::now();
    let price = price.parse().expect("test price literal");
    let product = Product {
        id: new_id(),
        name: name.to_string(),
        description: None,
        price,
        original_price: price,
        is_discounted: false,
        discount_percentage: None,
        quantity,
        category_id: attrs.category.id.clone(),
        brand_id: attrs.brand.id.clone(),
        gender_id: attrs.gender.id.clone(),
        color_id: attrs.color.id.clone(),
        size_id: attrs.size.id.clone(),
        created_at: now,
        updated_at: now,
    };
    db.products().insert(&product).await.unwrap();
    product
}

/// Seeds a user directory entry.
pub(crate) async fn seed_user(db: &Database, email: &str) -> User {
    db.users().insert(email, "Test", "User").await.unwrap()
}

/// Builds an order line request with a literal unit price.
pub(crate) fn line(product_id: &str, quantity: i64, unit_price: &str) -> OrderItemRequest {
    OrderItemRequest {
        product_id: product_id.to_string(),
        quantity,
        unit_price: unit_price.parse().expect("test price literal"),
    }
}

/// Inserts an order directly through the repository and drives it to the
/// given status.
pub(crate) async fn place_order_with_status(
    db: &Database,
    user_id: &str,
    items: &[OrderItemRequest],
    status: OrderStatus,
) -> Order {
    let (order, _) = db.orders().insert(user_id, items).await.unwrap();
    if status != OrderStatus::Pending {
        db.orders().update_status(&order.id, status).await.unwrap();
    }
    db.orders().get_by_id(&order.id).await.unwrap().unwrap()
}
