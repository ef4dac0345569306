//! # Domain Types
//!
//! Core domain types used throughout Grocer POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  items          │       │
//! │  │  name           │   │  date           │   │  total          │       │
//! │  │  price (Money)  │◄──│  items[]        │   │  paymentMethod  │       │
//! │  │  stock          │   │  total          │   └────────┬────────┘       │
//! │  │  barcode        │   │  paymentMethod  │◄───commit──┘                │
//! │  └─────────────────┘   └─────────────────┘                             │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ PaymentMethod   │   │  StockPolicy    │   │ Supplier / User │       │
//! │  │  cash           │   │  AllowNegative  │   │  directory      │       │
//! │  │  orangeMoney    │   │  Reject         │   │  entries        │       │
//! │  │  momo           │   └─────────────────┘   └─────────────────┘       │
//! │  │  merchantCode   │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Shape
//! All entities serialize with camelCase field names and decimal amounts,
//! matching the persisted `products` / `sales` JSON arrays.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Opaque identifier (UUID v4 for products created here).
    pub id: String,

    /// Display name shown to the cashier and on receipts.
    pub name: String,

    /// Unit price.
    #[ts(type = "number")]
    pub price: Money,

    /// Current stock level. Negative only under [`StockPolicy::AllowNegative`].
    pub stock: i64,

    /// Scanned barcode; secondary lookup key.
    pub barcode: String,
}

impl Product {
    /// Builds a product from a draft and an already generated id.
    pub fn from_draft(id: impl Into<String>, draft: NewProduct) -> Self {
        Product {
            id: id.into(),
            name: draft.name,
            price: draft.price,
            stock: draft.stock,
            barcode: draft.barcode,
        }
    }

    /// Checks whether stock is below the low-stock threshold.
    #[inline]
    pub fn is_low_stock(&self, threshold: i64) -> bool {
        self.stock < threshold
    }
}

/// A product that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    #[ts(type = "number")]
    pub price: Money,
    pub stock: i64,
    pub barcode: String,
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer paid. A label only; no gateway is involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum PaymentMethod {
    /// Physical cash payment.
    #[default]
    Cash,
    /// Orange Money mobile wallet.
    OrangeMoney,
    /// MTN Mobile Money.
    Momo,
    /// Merchant code transfer.
    MerchantCode,
}

impl PaymentMethod {
    /// Every method, in the order the checkout screen offers them.
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Cash,
        PaymentMethod::OrangeMoney,
        PaymentMethod::Momo,
        PaymentMethod::MerchantCode,
    ];

    /// The persisted tag, e.g. `"orangeMoney"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::OrangeMoney => "orangeMoney",
            PaymentMethod::Momo => "momo",
            PaymentMethod::MerchantCode => "merchantCode",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        PaymentMethod::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "paymentMethod".to_string(),
                reason: format!("'{}' is not one of cash, orangeMoney, momo, merchantCode", wanted),
            })
    }
}

// =============================================================================
// Sale
// =============================================================================

/// One line of a sale: which product, how many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleLineItem {
    /// Reference to `Product.id`; may dangle after the product is deleted.
    pub product_id: String,
    /// Units sold (positive).
    pub quantity: i64,
}

impl SaleLineItem {
    pub fn new(product_id: impl Into<String>, quantity: i64) -> Self {
        SaleLineItem {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// A completed sale. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub items: Vec<SaleLineItem>,
    #[ts(type = "number")]
    pub total: Money,
    /// Older persisted sales may lack the tag; they read back as cash.
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

impl Sale {
    /// Total units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

/// A checkout request handed to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub items: Vec<SaleLineItem>,
    /// Supplied by the caller and recorded verbatim.
    #[ts(type = "number")]
    pub total: Money,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

// =============================================================================
// Stock Policy
// =============================================================================

/// Whether a commit may drive stock below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockPolicy {
    /// Decrement unconditionally; stock may go negative.
    #[default]
    AllowNegative,
    /// Reject the whole commit if any known product would go below zero.
    Reject,
}

impl fmt::Display for StockPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockPolicy::AllowNegative => write!(f, "allow_negative"),
            StockPolicy::Reject => write!(f, "reject"),
        }
    }
}

impl FromStr for StockPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "allow_negative" | "allow-negative" | "permissive" => Ok(StockPolicy::AllowNegative),
            "reject" | "strict" => Ok(StockPolicy::Reject),
            other => Err(ValidationError::InvalidFormat {
                field: "stock_policy".to_string(),
                reason: format!("'{}' is not one of allow_negative, reject", other),
            }),
        }
    }
}

// =============================================================================
// Directory Entries
// =============================================================================

/// A supplier the store orders from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: String,
    pub name: String,
    /// Phone number or other contact handle.
    pub contact: String,
    pub email: String,
}

/// A supplier that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewSupplier {
    pub name: String,
    pub contact: String,
    pub email: String,
}

/// Staff role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Manager,
    #[default]
    Cashier,
}

impl Role {
    /// Only administrators may add, edit or remove staff accounts.
    pub fn can_manage_users(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Manager => write!(f, "manager"),
            Role::Cashier => write!(f, "cashier"),
        }
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "cashier" => Ok(Role::Cashier),
            other => Err(ValidationError::InvalidFormat {
                field: "role".to_string(),
                reason: format!("'{}' is not one of admin, manager, cashier", other),
            }),
        }
    }
}

/// A staff account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub role: Role,
}

/// A staff account that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    #[serde(default)]
    pub role: Role,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_wire_shape() {
        let product = Product {
            id: "p1".to_string(),
            name: "Milk".to_string(),
            price: Money::from_cents(250),
            stock: 10,
            barcode: "111".to_string(),
        };

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "p1",
                "name": "Milk",
                "price": 2.5,
                "stock": 10,
                "barcode": "111"
            })
        );
    }

    #[test]
    fn test_sale_reads_browser_payload() {
        let raw = r#"{
            "id": "1717171717171",
            "date": "2024-05-31T16:08:37.171Z",
            "items": [{"productId": "p1", "quantity": 3}],
            "total": 7.5,
            "paymentMethod": "orangeMoney"
        }"#;

        let sale: Sale = serde_json::from_str(raw).unwrap();
        assert_eq!(sale.items, vec![SaleLineItem::new("p1", 3)]);
        assert_eq!(sale.total.cents(), 750);
        assert_eq!(sale.payment_method, PaymentMethod::OrangeMoney);
        assert_eq!(sale.total_quantity(), 3);
    }

    #[test]
    fn test_sale_without_payment_method_defaults_to_cash() {
        let raw = r#"{"id":"s1","date":"2024-05-31T16:08:37Z","items":[],"total":0}"#;
        let sale: Sale = serde_json::from_str(raw).unwrap();
        assert_eq!(sale.payment_method, PaymentMethod::Cash);
    }

    #[test]
    fn test_payment_method_parse() {
        assert_eq!("momo".parse::<PaymentMethod>().unwrap(), PaymentMethod::Momo);
        assert_eq!(
            "MerchantCode".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::MerchantCode
        );
        assert!("card".parse::<PaymentMethod>().is_err());
        assert_eq!(PaymentMethod::OrangeMoney.to_string(), "orangeMoney");
    }

    #[test]
    fn test_stock_policy_parse() {
        assert_eq!(StockPolicy::default(), StockPolicy::AllowNegative);
        assert_eq!("strict".parse::<StockPolicy>().unwrap(), StockPolicy::Reject);
        assert!("never".parse::<StockPolicy>().is_err());
    }

    #[test]
    fn test_role_permissions() {
        assert!(Role::Admin.can_manage_users());
        assert!(!Role::Manager.can_manage_users());
        assert!(!Role::Cashier.can_manage_users());
        assert_eq!("Manager".parse::<Role>().unwrap(), Role::Manager);
    }
}
