//! # Cart
//!
//! The transient shopping cart owned by the POS front end.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Cashier Action           Cart Method             Cart Change           │
//! │  ──────────────           ───────────             ───────────           │
//! │                                                                         │
//! │  Tap product ───────────► add_product() ────────► qty += 1 / push      │
//! │                                                                         │
//! │  Scan N units ──────────► add_item() ───────────► qty += n / push      │
//! │                                                                         │
//! │  Change quantity ───────► update_quantity() ────► qty = n (≤0 removes) │
//! │                                                                         │
//! │  Click remove ──────────► remove_item() ────────► items.remove(i)      │
//! │                                                                         │
//! │  Checkout ──────────────► to_order() ───────────► Order for the ledger │
//! │                                                                         │
//! │  Sale recorded ─────────► clear() ──────────────► items.clear()        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart never touches the catalog: stock is only decremented when the
//! resulting [`Order`] is committed.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Order, PaymentMethod, Product, SaleLineItem};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// An item in the shopping cart.
///
/// ## Price Freezing
/// `name` and `price` are copied from the product when the line is created.
/// Later catalog edits do not change what the customer is charged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: String,
    pub name: String,
    #[ts(type = "number")]
    pub price: Money,
    pub quantity: i64,
}

impl CartItem {
    /// Creates a new cart line from a product and quantity.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        CartItem {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            quantity,
        }
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by `product_id` (adding the same product increases quantity)
/// - Every quantity is in `1..=MAX_ITEM_QUANTITY`
/// - At most `MAX_CART_ITEMS` lines
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Lines in the order they were first added.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Adds one unit of a product.
    pub fn add_product(&mut self, product: &Product) -> CoreResult<()> {
        self.add_item(product, 1)
    }

    /// Adds a product to the cart or increases quantity if already present.
    ///
    /// ## Errors
    /// - `Validation` if `quantity` is not positive
    /// - `QuantityTooLarge` if the line would exceed `MAX_ITEM_QUANTITY`
    /// - `CartTooLarge` if a new line would exceed `MAX_CART_ITEMS`
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            }
            .into());
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            let new_qty = item.quantity.saturating_add(quantity);
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            item.quantity = new_qty;
            return Ok(());
        }

        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        self.items.push(CartItem::from_product(product, quantity));
        Ok(())
    }

    /// Sets the quantity of a line. Zero or less removes the line.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            return self.remove_item(product_id);
        }

        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(item) => {
                item.quantity = quantity;
                Ok(())
            }
            None => Err(CoreError::NotInCart(product_id.to_string())),
        }
    }

    /// Removes a line by product ID.
    pub fn remove_item(&mut self, product_id: &str) -> CoreResult<()> {
        let initial_len = self.items.len();
        self.items.retain(|i| i.product_id != product_id);

        if self.items.len() == initial_len {
            Err(CoreError::NotInCart(product_id.to_string()))
        } else {
            Ok(())
        }
    }

    /// Clears all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of quantities across lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Sum of `price × quantity` using the captured prices.
    pub fn total(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Builds the checkout request for the ledger.
    ///
    /// Fails with `EmptyOrder` when there is nothing to sell.
    pub fn to_order(&self, payment_method: PaymentMethod) -> CoreResult<Order> {
        if self.is_empty() {
            return Err(CoreError::EmptyOrder);
        }

        Ok(Order {
            items: self
                .items
                .iter()
                .map(|i| SaleLineItem::new(i.product_id.clone(), i.quantity))
                .collect(),
            total: self.total(),
            payment_method,
        })
    }
}
