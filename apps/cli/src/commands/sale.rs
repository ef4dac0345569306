//! # Sale Commands
//!
//! Checkout plus the sales history screen.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  grocer checkout --item <id-or-barcode>[:qty] ... --payment momo        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Resolve each item (id first, then barcode) ── unknown ──► NOT_FOUND   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Cart::add_item (merges repeats, enforces cart limits)                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Cart::to_order ── empty ──► EMPTY_ORDER                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Store::commit (sale + stock decrements, one save)                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Print receipt, clear cart                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::str::FromStr;

use clap::{Args, Subcommand};
use serde::Serialize;
use tracing::debug;

use super::AppContext;
use crate::error::ApiError;
use grocer_core::report::{sales_history, SaleSummary};
use grocer_core::{Cart, PaymentMethod, Product, Receipt, Sale};

/// One `--item` value: a product id or barcode and an optional quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSpec {
    pub reference: String,
    pub quantity: i64,
}

impl FromStr for ItemSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (reference, quantity) = match s.rsplit_once(':') {
            Some((reference, qty)) => {
                let quantity = qty
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| format!("invalid quantity '{}' in '{}'", qty, s))?;
                (reference, quantity)
            }
            None => (s, 1),
        };

        let reference = reference.trim();
        if reference.is_empty() {
            return Err(format!("missing product in '{}'", s));
        }

        Ok(ItemSpec {
            reference: reference.to_string(),
            quantity,
        })
    }
}

#[derive(Debug, Args)]
pub struct CheckoutArgs {
    /// <product id or barcode>[:quantity], repeatable
    #[arg(long = "item", value_name = "PRODUCT[:QTY]")]
    pub items: Vec<ItemSpec>,

    /// cash, orangeMoney, momo or merchantCode
    #[arg(long, default_value = "cash")]
    pub payment: PaymentMethod,
}

#[derive(Debug, Subcommand)]
pub enum SalesCommand {
    /// Sales in the order they were recorded
    List {
        /// Keep sales with a line whose product name contains this
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Reprint the receipt of a sale
    Show { id: String },
}

/// A sale together with its printed receipt.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleReceipt {
    pub sale: Sale,
    pub receipt: String,
}

pub async fn checkout(ctx: &AppContext, args: CheckoutArgs) -> Result<String, ApiError> {
    debug!(items = args.items.len(), payment = %args.payment, "checkout command");

    let mut cart = Cart::new();
    for spec in &args.items {
        let product = resolve_product(ctx, &spec.reference).await?;
        cart.add_item(&product, spec.quantity)?;
    }

    let order = cart.to_order(args.payment)?;
    let receipt = Receipt::from_cart(&ctx.config.store_name, &cart).render(&ctx.config.currency_symbol);

    let sale = ctx.store.commit(order).await?;
    cart.clear();

    ctx.output(&SaleReceipt { sale, receipt }, |r| {
        format!(
            "{}\n\nSale {} recorded ({})",
            r.receipt, r.sale.id, r.sale.payment_method
        )
    })
}

pub async fn run(ctx: &AppContext, command: SalesCommand) -> Result<String, ApiError> {
    match command {
        SalesCommand::List { search } => {
            let state = ctx.store.snapshot().await;
            let rows = sales_history(&state, &search);
            ctx.output(&rows, |rows| sales_table(ctx, rows))
        }
        SalesCommand::Show { id } => {
            let state = ctx.store.snapshot().await;
            let sale = state
                .sale(&id)
                .cloned()
                .ok_or_else(|| ApiError::not_found("Sale", &id))?;
            let receipt = Receipt::from_sale(&ctx.config.store_name, &sale, &state)
                .render(&ctx.config.currency_symbol);

            ctx.output(&SaleReceipt { sale, receipt }, |r| r.receipt.clone())
        }
    }
}

/// Id match first, then barcode.
async fn resolve_product(ctx: &AppContext, reference: &str) -> Result<Product, ApiError> {
    if let Some(product) = ctx.store.get_product(reference).await {
        return Ok(product);
    }
    ctx.store
        .find_by_barcode(reference)
        .await
        .ok_or_else(|| ApiError::not_found("Product", reference))
}

fn sales_table(ctx: &AppContext, rows: &[SaleSummary]) -> String {
    if rows.is_empty() {
        return "No sales".to_string();
    }

    let mut lines = vec![format!(
        "{:<16}  {:<36}  {:>5}  {:>10}  {:<12}  {}",
        "DATE", "ID", "QTY", "TOTAL", "PAYMENT", "ITEMS"
    )];
    for row in rows {
        lines.push(format!(
            "{:<16}  {:<36}  {:>5}  {:>10}  {:<12}  {}",
            row.date.format("%Y-%m-%d %H:%M"),
            row.id,
            row.total_quantity,
            ctx.money(row.total),
            row.payment_method,
            row.lines.join(", ")
        ));
    }
    lines.join("\n")
}
