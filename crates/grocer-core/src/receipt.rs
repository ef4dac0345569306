//! # Receipt
//!
//! Plain-text receipt for a cart at checkout or a recorded sale.
//!
//! ```text
//! Grocer Receipt
//! ---------------------
//! Milk x3: $7.50
//! Bread x1: $1.80
//! ---------------------
//! Total: $9.30
//! ```

use crate::cart::Cart;
use crate::money::Money;
use crate::state::StoreState;
use crate::types::Sale;
use crate::UNKNOWN_PRODUCT_LABEL;

const SEPARATOR: &str = "---------------------";

/// One printed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLine {
    pub name: String,
    pub quantity: i64,
    pub amount: Money,
}

/// A receipt ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub title: String,
    pub lines: Vec<ReceiptLine>,
    pub total: Money,
}

impl Receipt {
    /// Receipt for the current cart, using the captured prices.
    pub fn from_cart(title: impl Into<String>, cart: &Cart) -> Self {
        Receipt {
            title: title.into(),
            lines: cart
                .items()
                .iter()
                .map(|item| ReceiptLine {
                    name: item.name.clone(),
                    quantity: item.quantity,
                    amount: item.line_total(),
                })
                .collect(),
            total: cart.total(),
        }
    }

    /// Reprint of a recorded sale.
    ///
    /// Line amounts use current catalog prices (sales store no unit prices);
    /// the total is the recorded one.
    pub fn from_sale(title: impl Into<String>, sale: &Sale, state: &StoreState) -> Self {
        Receipt {
            title: title.into(),
            lines: sale
                .items
                .iter()
                .map(|item| match state.product(&item.product_id) {
                    Some(product) => ReceiptLine {
                        name: product.name.clone(),
                        quantity: item.quantity,
                        amount: product.price.multiply_quantity(item.quantity),
                    },
                    None => ReceiptLine {
                        name: UNKNOWN_PRODUCT_LABEL.to_string(),
                        quantity: item.quantity,
                        amount: Money::zero(),
                    },
                })
                .collect(),
            total: sale.total,
        }
    }

    /// Renders with the given currency symbol.
    pub fn render(&self, currency_symbol: &str) -> String {
        let mut out = Vec::with_capacity(self.lines.len() + 4);
        out.push(self.title.clone());
        out.push(SEPARATOR.to_string());
        for line in &self.lines {
            out.push(format!(
                "{} x{}: {}",
                line.name,
                line.quantity,
                line.amount.format_with(currency_symbol)
            ));
        }
        out.push(SEPARATOR.to_string());
        out.push(format!("Total: {}", self.total.format_with(currency_symbol)));
        out.join("\n")
    }
}
