//! # Seed Data Generator
//!
//! Populates the database with demo catalog data for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database file
//! cargo run -p storefront-db --bin seed
//!
//! # Specify database path
//! cargo run -p storefront-db --bin seed -- --db ./data/store.db
//! ```

use chrono::Utc;
use std::env;

use storefront_core::Product;
use storefront_db::repository::new_id;
use storefront_db::{Database, DbConfig};

const CATEGORIES: &[&str] = &["Footwear", "Outerwear", "Accessories"];
const BRANDS: &[&str] = &["Northline", "Vectra", "Harbor & Co"];
const GENDERS: &[&str] = &["Men", "Women", "Unisex"];
const COLORS: &[&str] = &["Black", "White", "Navy", "Olive"];
const SIZES: &[&str] = &["S", "M", "L", "XL", "40", "42", "44"];

/// (name, price, quantity) triples spread across the attribute tables.
const PRODUCTS: &[(&str, &str, i64)] = &[
    ("Trail Runner 2", "89.99", 40),
    ("City Loafer", "74.50", 25),
    ("Storm Shell Jacket", "149.00", 18),
    ("Down Parka", "229.99", 12),
    ("Wool Beanie", "19.99", 80),
    ("Canvas Belt", "24.00", 60),
    ("Ridge Boot", "129.95", 22),
    ("Rain Poncho", "39.99", 35),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./storefront_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Storefront Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./storefront_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Storefront Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("Connected, migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("Database already has {} products", existing);
        println!("Skipping seed to avoid duplicates.");
        println!("Delete the database file to regenerate.");
        return Ok(());
    }

    // Attribute tables first (products reference them by id)
    let catalog = db.catalog();
    let mut categories = Vec::new();
    for name in CATEGORIES {
        categories.push(catalog.categories().insert(name).await?);
    }
    let mut brands = Vec::new();
    for name in BRANDS {
        brands.push(catalog.brands().insert(name).await?);
    }
    let mut genders = Vec::new();
    for name in GENDERS {
        genders.push(catalog.genders().insert(name).await?);
    }
    let mut colors = Vec::new();
    for name in COLORS {
        colors.push(catalog.colors().insert(name).await?);
    }
    let mut sizes = Vec::new();
    for name in SIZES {
        sizes.push(catalog.sizes().insert(name).await?);
    }
    println!("Seeded attribute tables");

    // A couple of directory users for order placement
    db.users().insert("ada@example.com", "Ada", "Lovelace").await?;
    db.users().insert("alan@example.com", "Alan", "Turing").await?;
    println!("Seeded users");

    let now = Utc::now();
    for (index, (name, price, quantity)) in PRODUCTS.iter().enumerate() {
        let price = price.parse()?;
        let product = Product {
            id: new_id(),
            name: (*name).to_string(),
            description: None,
            price,
            original_price: price,
            is_discounted: false,
            discount_percentage: None,
            quantity: *quantity,
            category_id: categories[index % categories.len()].id.clone(),
            brand_id: brands[index % brands.len()].id.clone(),
            gender_id: genders[index % genders.len()].id.clone(),
            color_id: colors[index % colors.len()].id.clone(),
            size_id: sizes[index % sizes.len()].id.clone(),
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await?;
    }

    println!("Seeded {} products", PRODUCTS.len());
    println!();
    println!("Seed complete!");

    Ok(())
}
