//! # Validation Module
//!
//! Input validation utilities for Grocer POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI (clap)                                                   │
//! │  ├── Argument types, required flags                                    │
//! │  └── Money::parse_decimal for amounts                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Business rule validation on drafts and orders                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Catalog / Directory transitions                              │
//! │  └── Cross-entity rules (barcode / username uniqueness, ids exist)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use grocer_core::validation::{validate_product_name, validate_quantity};
//!
//! validate_product_name("Milk").unwrap();
//! validate_quantity(3).unwrap();
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{NewProduct, NewSupplier, NewUser, Order};
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

fn required(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
///
/// ```rust
/// use grocer_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Whole Milk 1L").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    required("name", name, 200)
}

/// Validates a barcode.
///
/// Empty is allowed (hand-keyed products); non-empty barcodes are at most
/// 64 characters and contain no whitespace.
pub fn validate_barcode(barcode: &str) -> ValidationResult<()> {
    if barcode.is_empty() {
        return Ok(());
    }

    if barcode.chars().count() > 64 {
        return Err(ValidationError::TooLong {
            field: "barcode".to_string(),
            max: 64,
        });
    }

    if barcode.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: "must not contain whitespace".to_string(),
        });
    }

    Ok(())
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (returns everything)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

/// Validates an email address. Only the presence of `@` between two
/// non-empty parts is checked.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    required("email", email, 254)?;

    match email.trim().split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@domain".to_string(),
        }),
    }
}

/// Validates a username: required, at most 50 characters, no whitespace.
pub fn validate_username(username: &str) -> ValidationResult<()> {
    required("username", username, 50)?;

    if username.trim().chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "must not contain whitespace".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// ## Where It Runs
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Store::commit(order)                                                  │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_order → validate_quantity(line.quantity) ← THIS FUNCTION     │
/// │       │                                                                 │
/// │       ├── qty <= 0?  → "quantity must be positive"                     │
/// │       ├── qty > 999? → "quantity must be between 1 and 999"            │
/// │       └── OK → stock is decremented                                    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price. Zero is allowed (free items).
///
/// ```rust
/// use grocer_core::money::Money;
/// use grocer_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_cents(250)).is_ok());
/// assert!(validate_price(Money::zero()).is_ok());
/// assert!(validate_price(Money::from_cents(-1)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a stock level entered on a product form.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates an order total. Zero is allowed (all items free).
pub fn validate_total(total: Money) -> ValidationResult<()> {
    if total.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "total".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Entity Validators
// =============================================================================

/// Validates every field of a product draft.
pub fn validate_new_product(draft: &NewProduct) -> ValidationResult<()> {
    validate_product_name(&draft.name)?;
    validate_price(draft.price)?;
    validate_stock(draft.stock)?;
    validate_barcode(&draft.barcode)
}

/// Validates every field of a supplier draft.
pub fn validate_new_supplier(draft: &NewSupplier) -> ValidationResult<()> {
    required("name", &draft.name, 200)?;
    required("contact", &draft.contact, 100)?;
    validate_email(&draft.email)
}

/// Validates a user draft.
pub fn validate_new_user(draft: &NewUser) -> ValidationResult<()> {
    validate_username(&draft.username)
}

/// Validates line quantities (1 to MAX_ITEM_QUANTITY) and the total of an
/// order.
///
/// An empty item list is not a validation failure; the ledger reports it as
/// `CoreError::EmptyOrder`.
pub fn validate_order(order: &Order) -> ValidationResult<()> {
    for item in &order.items {
        if item.product_id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "productId".to_string(),
            });
        }
        validate_quantity(item.quantity)?;
    }

    validate_total(order.total)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PaymentMethod, SaleLineItem};

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Milk").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_barcode() {
        assert!(validate_barcode("").is_ok());
        assert!(validate_barcode("5449000000996").is_ok());
        assert!(validate_barcode("12 34").is_err());
        assert!(validate_barcode(&"9".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_price_and_stock() {
        assert!(validate_price(Money::zero()).is_ok());
        assert!(validate_price(Money::from_cents(-100)).is_err());
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(-5).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("supplierA@example.com").is_ok());
        assert!(validate_email("example.com").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("cashier1").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("two words").is_err());
    }

    #[test]
    fn test_validate_search_query_trims() {
        assert_eq!(validate_search_query("  milk ").unwrap(), "milk");
        assert!(validate_search_query(&"q".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_order() {
        let mut order = Order {
            items: vec![SaleLineItem::new("p1", 3)],
            total: Money::from_cents(750),
            payment_method: PaymentMethod::Cash,
        };
        assert!(validate_order(&order).is_ok());

        order.items[0].quantity = 0;
        assert!(validate_order(&order).is_err());

        order.items[0].quantity = 1000;
        assert!(matches!(
            validate_order(&order),
            Err(ValidationError::OutOfRange { .. })
        ));

        order.items[0].quantity = 2;
        order.total = Money::from_cents(-1);
        assert!(validate_order(&order).is_err());

        // Empty orders are left to the ledger.
        order.items.clear();
        order.total = Money::zero();
        assert!(validate_order(&order).is_ok());
    }
}
