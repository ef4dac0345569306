//! # grocer-core: Pure Business Logic for Grocer POS
//!
//! This crate is the **heart** of Grocer POS. It contains the catalog, the
//! sale ledger, the cart and every report as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Grocer POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    grocer CLI (apps/cli)                        │   │
//! │  │    products ──► checkout ──► receipt ──► reports                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    grocer-store (Store)                         │   │
//! │  │    clone → transition → save once → swap                       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ grocer-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  catalog  │  │  ledger   │  │   cart    │  │  report   │  │   │
//! │  │   │  Product  │  │  commit   │  │ CartItem  │  │ overview  │  │   │
//! │  │   │  stock    │  │  Sale     │  │ to_order  │  │ finances  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK READS IN TRANSITIONS         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, Order, Supplier, User)
//! - [`money`] - Money type with integer arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//! - [`state`] - The persisted [`StoreState`]
//! - [`catalog`] - Product CRUD and stock adjustment
//! - [`ledger`] - Sale history and the checkout commit
//! - [`directory`] - Suppliers and staff users
//! - [`cart`] - The transient checkout cart
//! - [`report`] - Dashboard aggregations
//! - [`receipt`] - Receipt rendering
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use grocer_core::{Cart, Money, NewProduct, PaymentMethod, StockPolicy, StoreState};
//!
//! let mut state = StoreState::default();
//! let milk = state
//!     .add_product(
//!         "p1".to_string(),
//!         NewProduct {
//!             name: "Milk".to_string(),
//!             price: Money::from_cents(250),
//!             stock: 10,
//!             barcode: "111".to_string(),
//!         },
//!     )
//!     .unwrap();
//!
//! let mut cart = Cart::new();
//! cart.add_item(&milk, 3).unwrap();
//! let order = cart.to_order(PaymentMethod::Cash).unwrap();
//!
//! let commit = state
//!     .commit_order(order, "s1".to_string(), Utc::now(), StockPolicy::AllowNegative)
//!     .unwrap();
//!
//! assert_eq!(commit.sale.total.cents(), 750);
//! assert_eq!(state.product("p1").unwrap().stock, 7);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod directory;
pub mod error;
pub mod ledger;
pub mod money;
pub mod receipt;
pub mod report;
pub mod state;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use grocer_core::Money` instead of
// `use grocer_core::money::Money`

pub use cart::{Cart, CartItem};
pub use error::{CoreError, CoreResult, ValidationError};
pub use ledger::Commit;
pub use money::Money;
pub use receipt::Receipt;
pub use report::{FinancePeriod, ReportPeriod};
pub use state::{new_id, StoreState};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single cart line.
///
/// ## Business Reason
/// Catches typos at the till (1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Products with stock strictly below this count as low on stock.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

/// Label shown for a sale line whose product has been deleted.
pub const UNKNOWN_PRODUCT_LABEL: &str = "Unknown Product";
