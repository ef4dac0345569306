//! # Product Commands
//!
//! Catalog CRUD plus search and barcode lookup.
//!
//! ## Lookup Flow
//! ```text
//! grocer products search "milk"      name contains / barcode contains
//! grocer products barcode 6200000001 exact barcode match, NOT_FOUND otherwise
//! ```

use clap::{Args, Subcommand};
use tracing::debug;

use super::AppContext;
use crate::error::ApiError;
use grocer_core::{Money, NewProduct, Product};

#[derive(Debug, Subcommand)]
pub enum ProductCommand {
    /// List every product
    List,
    /// Add a product
    Add(AddProductArgs),
    /// Change fields of a product
    Update(UpdateProductArgs),
    /// Remove a product
    Delete { id: String },
    /// Search by name or barcode
    Search { term: String },
    /// Exact barcode lookup
    Barcode { barcode: String },
}

#[derive(Debug, Args)]
pub struct AddProductArgs {
    #[arg(long)]
    pub name: String,
    /// Unit price, e.g. 2.50
    #[arg(long)]
    pub price: Money,
    #[arg(long, default_value_t = 0)]
    pub stock: i64,
    #[arg(long, default_value = "")]
    pub barcode: String,
}

#[derive(Debug, Args)]
pub struct UpdateProductArgs {
    pub id: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub price: Option<Money>,
    #[arg(long)]
    pub stock: Option<i64>,
    /// Pass an empty string to clear
    #[arg(long)]
    pub barcode: Option<String>,
}

pub async fn run(ctx: &AppContext, command: ProductCommand) -> Result<String, ApiError> {
    match command {
        ProductCommand::List => {
            let products = ctx.store.products().await;
            ctx.output(&products, |p| product_table(ctx, p))
        }
        ProductCommand::Add(args) => add(ctx, args).await,
        ProductCommand::Update(args) => update(ctx, args).await,
        ProductCommand::Delete { id } => {
            ctx.store.delete_product(&id).await?;
            Ok(format!("Deleted product {}", id))
        }
        ProductCommand::Search { term } => {
            debug!(term = %term, "search_products command");
            let products = ctx.store.search_products(&term).await?;
            ctx.output(&products, |p| product_table(ctx, p))
        }
        ProductCommand::Barcode { barcode } => {
            let product = ctx
                .store
                .find_by_barcode(&barcode)
                .await
                .ok_or_else(|| ApiError::not_found("Product with barcode", &barcode))?;
            ctx.output(&product, |p| product_table(ctx, std::slice::from_ref(p)))
        }
    }
}

async fn add(ctx: &AppContext, args: AddProductArgs) -> Result<String, ApiError> {
    let product = ctx
        .store
        .add_product(NewProduct {
            name: args.name,
            price: args.price,
            stock: args.stock,
            barcode: args.barcode,
        })
        .await?;

    ctx.output(&product, |p| format!("Added product {} ({})", p.name, p.id))
}

async fn update(ctx: &AppContext, args: UpdateProductArgs) -> Result<String, ApiError> {
    let mut product = ctx
        .store
        .get_product(&args.id)
        .await
        .ok_or_else(|| ApiError::not_found("Product", &args.id))?;

    if let Some(name) = args.name {
        product.name = name;
    }
    if let Some(price) = args.price {
        product.price = price;
    }
    if let Some(stock) = args.stock {
        product.stock = stock;
    }
    if let Some(barcode) = args.barcode {
        product.barcode = barcode;
    }

    ctx.store.update_product(product.clone()).await?;
    ctx.output(&product, |p| format!("Updated product {} ({})", p.name, p.id))
}

fn product_table(ctx: &AppContext, products: &[Product]) -> String {
    if products.is_empty() {
        return "No products".to_string();
    }

    let mut lines = vec![format!(
        "{:<36}  {:<30}  {:>10}  {:>6}  {}",
        "ID", "NAME", "PRICE", "STOCK", "BARCODE"
    )];
    for p in products {
        let low = if p.is_low_stock(ctx.config.low_stock_threshold) {
            "  (low)"
        } else {
            ""
        };
        lines.push(format!(
            "{:<36}  {:<30}  {:>10}  {:>6}  {}{}",
            p.id,
            p.name,
            ctx.money(p.price),
            p.stock,
            p.barcode,
            low
        ));
    }
    lines.join("\n")
}
