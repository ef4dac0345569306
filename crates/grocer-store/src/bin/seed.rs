//! # Seed Data Generator
//!
//! Populates a data directory (or SQLite file) with sample grocery products.
//!
//! ## Usage
//! ```bash
//! # 200 products into ./data (JSON collections)
//! cargo run -p grocer-store --bin seed
//!
//! # Custom amount
//! cargo run -p grocer-store --bin seed -- --count 50
//!
//! # SQLite file instead of JSON
//! cargo run -p grocer-store --bin seed -- --sqlite ./data/grocer.db
//! ```
//!
//! Each product gets a name with a size suffix, a price between $0.99 and
//! $12.98, stock between 0 and 60 and a unique 13-digit barcode.

use std::env;
use std::sync::Arc;

use grocer_core::{Money, NewProduct, StockPolicy};
use grocer_store::{JsonPersistence, Persistence, SqliteConfig, SqlitePersistence, Store};

/// Product families for realistic test data.
const FAMILIES: &[(&str, &[&str])] = &[
    (
        "DAIRY",
        &[
            "Whole Milk",
            "Skim Milk",
            "Greek Yogurt",
            "Butter",
            "Cheddar Cheese",
            "Eggs",
        ],
    ),
    (
        "BAKERY",
        &["White Bread", "Baguette", "Croissant", "Wheat Bread", "Muffin"],
    ),
    (
        "PANTRY",
        &[
            "Rice",
            "Pasta",
            "Sugar",
            "Flour",
            "Vegetable Oil",
            "Tomato Paste",
            "Salt",
            "Peanut Butter",
        ],
    ),
    (
        "DRINKS",
        &[
            "Mineral Water",
            "Orange Juice",
            "Cola",
            "Ginger Drink",
            "Coffee",
            "Tea",
        ],
    ),
    (
        "PRODUCE",
        &["Bananas", "Plantains", "Tomatoes", "Onions", "Potatoes", "Apples"],
    ),
];

/// Size variants and their price addon in cents.
const SIZES: &[(&str, i64)] = &[("Small", 0), ("Medium", 150), ("Large", 300), ("Family", 500)];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut data_dir = String::from("./data");
    let mut sqlite_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--data-dir" | "-d" => {
                if i + 1 < args.len() {
                    data_dir = args[i + 1].clone();
                    i += 1;
                }
            }
            "--sqlite" | "-s" => {
                if i + 1 < args.len() {
                    sqlite_path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Grocer POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>        Number of products to generate (default: 200)");
                println!("  -d, --data-dir <PATH>  JSON data directory (default: ./data)");
                println!("  -s, --sqlite <PATH>    Write to a SQLite file instead");
                println!("  -h, --help             Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let persistence: Arc<dyn Persistence> = match &sqlite_path {
        Some(path) => Arc::new(SqlitePersistence::connect(SqliteConfig::new(path)).await?),
        None => Arc::new(JsonPersistence::new(&data_dir)),
    };

    println!("Grocer POS Seed Data Generator");
    println!("==============================");
    println!("Backend:  {}", persistence.describe());
    println!("Products: {}", count);
    println!();

    let store = Store::open(persistence, StockPolicy::AllowNegative).await?;

    let existing = store.products().await.len();
    if existing > 0 {
        println!("Catalog already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the data to regenerate.");
        return Ok(());
    }

    println!("Generating products...");

    let mut generated = 0;
    let start = std::time::Instant::now();

    'outer: for (family_idx, (_, names)) in FAMILIES.iter().enumerate() {
        for (name_idx, name) in names.iter().enumerate() {
            for (size_idx, (size, addon)) in SIZES.iter().enumerate() {
                if generated >= count {
                    break 'outer;
                }

                let seed = family_idx * 1000 + name_idx * 10 + size_idx;
                let draft = generate_product(name, size, *addon, seed);

                if let Err(e) = store.add_product(draft).await {
                    eprintln!("Failed to insert {} {}: {}", name, size, e);
                    continue;
                }

                generated += 1;
                if generated % 50 == 0 {
                    println!("  Generated {} products...", generated);
                }
            }
        }
    }

    println!();
    println!("Generated {} products in {:?}", generated, start.elapsed());
    println!(
        "  Search 'milk': {} results",
        store.search_products("milk").await?.len()
    );
    println!("Seed complete!");

    Ok(())
}

/// Generates a single product draft with deterministic data.
fn generate_product(name: &str, size: &str, price_addon: i64, seed: usize) -> NewProduct {
    // Base price $0.99 - $7.98, plus the size addon
    let base_price = 99 + ((seed * 17) % 700) as i64;

    NewProduct {
        name: format!("{} {}", name, size),
        price: Money::from_cents(base_price + price_addon),
        stock: (seed % 61) as i64,
        barcode: format!("620{:010}", seed),
    }
}
