//! # Sale Ledger
//!
//! The append-only sale history and the checkout commit.
//!
//! ## Commit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        commit_order()                                   │
//! │                                                                         │
//! │  Order ──► items empty? ──yes──► Err(EmptyOrder)       (nothing moved) │
//! │              │ no                                                       │
//! │              ▼                                                          │
//! │           validate_order ──fail──► Err(Validation)     (nothing moved) │
//! │              │                                                          │
//! │              ▼                                                          │
//! │           StockPolicy::Reject and oversell? ──► Err(InsufficientStock) │
//! │              │                                                          │
//! │              ▼                                                          │
//! │           push Sale { id, now, items, total, paymentMethod }           │
//! │              │                                                          │
//! │              ▼                                                          │
//! │           apply_stock_delta per line  (unknown ids are collected)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every check runs before the first mutation, so an `Err` always leaves
//! the state exactly as it was.

use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult};
use crate::state::StoreState;
use crate::types::{Order, Sale, StockPolicy};
use crate::validation::validate_order;

/// Result of a successful commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// The recorded sale.
    pub sale: Sale,
    /// Line item product ids that matched no product; their stock deltas
    /// were dropped.
    pub unknown_products: Vec<String>,
}

impl StoreState {
    /// Looks up a sale by id.
    pub fn sale(&self, id: &str) -> Option<&Sale> {
        self.sales.iter().find(|s| s.id == id)
    }

    /// Records `order` as a sale and decrements stock for each line.
    ///
    /// `order.total` is stored verbatim; only its sign is checked.
    ///
    /// ## Errors
    /// - `EmptyOrder` when `order.items` is empty
    /// - `Validation` for a quantity outside 1 to 999 or a negative total
    /// - `InsufficientStock` under [`StockPolicy::Reject`] when a known
    ///   product would drop below zero
    pub fn commit_order(
        &mut self,
        order: Order,
        id: String,
        now: DateTime<Utc>,
        policy: StockPolicy,
    ) -> CoreResult<Commit> {
        if order.items.is_empty() {
            return Err(CoreError::EmptyOrder);
        }

        validate_order(&order)?;

        if policy == StockPolicy::Reject {
            self.check_stock(&order)?;
        }

        let sale = Sale {
            id,
            date: now,
            items: order.items,
            total: order.total,
            payment_method: order.payment_method,
        };

        let mut unknown_products = Vec::new();
        for item in &sale.items {
            if !self.apply_stock_delta(&item.product_id, item.quantity) {
                unknown_products.push(item.product_id.clone());
            }
        }

        self.sales.push(sale.clone());

        Ok(Commit {
            sale,
            unknown_products,
        })
    }

    /// Fails if the summed quantity per known product exceeds its stock.
    fn check_stock(&self, order: &Order) -> CoreResult<()> {
        let mut requested: Vec<(&str, i64)> = Vec::new();
        for item in &order.items {
            match requested.iter_mut().find(|(id, _)| *id == item.product_id) {
                Some((_, qty)) => *qty = qty.saturating_add(item.quantity),
                None => requested.push((item.product_id.as_str(), item.quantity)),
            }
        }

        for (product_id, qty) in requested {
            if let Some(product) = self.product(product_id) {
                if product.stock < qty {
                    return Err(CoreError::InsufficientStock {
                        product_id: product.id.clone(),
                        name: product.name.clone(),
                        available: product.stock,
                        requested: qty,
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::money::Money;
    use crate::types::{PaymentMethod, Product, SaleLineItem};
    use chrono::TimeZone;

    fn milk_catalog() -> StoreState {
        StoreState {
            products: vec![
                Product {
                    id: "p1".to_string(),
                    name: "Milk".to_string(),
                    price: Money::from_cents(250),
                    stock: 10,
                    barcode: "111".to_string(),
                },
                Product {
                    id: "p2".to_string(),
                    name: "Bread".to_string(),
                    price: Money::from_cents(180),
                    stock: 2,
                    barcode: "222".to_string(),
                },
            ],
            ..StoreState::default()
        }
    }

    fn order(items: Vec<SaleLineItem>, total_cents: i64) -> Order {
        Order {
            items,
            total: Money::from_cents(total_cents),
            payment_method: PaymentMethod::Cash,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 31, 16, 8, 37).unwrap()
    }

    #[test]
    fn test_commit_milk_scenario() {
        let mut state = milk_catalog();

        let commit = state
            .commit_order(
                order(vec![SaleLineItem::new("p1", 3)], 750),
                "s1".to_string(),
                now(),
                StockPolicy::AllowNegative,
            )
            .unwrap();

        assert_eq!(state.product("p1").unwrap().stock, 7);
        assert_eq!(state.product("p2").unwrap().stock, 2);
        assert_eq!(commit.sale.total.cents(), 750);
        assert_eq!(commit.sale.items.len(), 1);
        assert_eq!(commit.sale.date, now());
        assert!(commit.unknown_products.is_empty());
        assert_eq!(state.sales, vec![commit.sale]);
    }

    #[test]
    fn test_commit_empty_order_changes_nothing() {
        let mut state = milk_catalog();
        let before = state.clone();

        let err = state
            .commit_order(order(vec![], 0), "s1".to_string(), now(), StockPolicy::Reject)
            .unwrap_err();

        assert!(matches!(err, CoreError::EmptyOrder));
        assert_eq!(state, before);
    }

    #[test]
    fn test_commit_keeps_supplied_total_and_item_order() {
        let mut state = milk_catalog();
        let items = vec![SaleLineItem::new("p2", 1), SaleLineItem::new("p1", 2)];

        let commit = state
            .commit_order(
                order(items.clone(), 1),
                "s1".to_string(),
                now(),
                StockPolicy::AllowNegative,
            )
            .unwrap();

        assert_eq!(commit.sale.items, items);
        assert_eq!(commit.sale.total.cents(), 1);
    }

    #[test]
    fn test_commit_unknown_product_is_dropped() {
        let mut state = milk_catalog();

        let commit = state
            .commit_order(
                order(
                    vec![SaleLineItem::new("ghost", 4), SaleLineItem::new("p1", 1)],
                    250,
                ),
                "s1".to_string(),
                now(),
                StockPolicy::Reject,
            )
            .unwrap();

        assert_eq!(commit.unknown_products, vec!["ghost".to_string()]);
        assert_eq!(state.product("p1").unwrap().stock, 9);
        assert_eq!(state.product("p2").unwrap().stock, 2);
        assert_eq!(state.sales.len(), 1);
    }

    #[test]
    fn test_commit_allows_negative_stock_by_default() {
        let mut state = milk_catalog();
        state
            .commit_order(
                order(vec![SaleLineItem::new("p2", 5)], 900),
                "s1".to_string(),
                now(),
                StockPolicy::AllowNegative,
            )
            .unwrap();

        assert_eq!(state.product("p2").unwrap().stock, -3);
    }

    #[test]
    fn test_commit_reject_policy_blocks_oversell() {
        let mut state = milk_catalog();
        let before = state.clone();

        // Two lines for the same product add up past the available stock.
        let err = state
            .commit_order(
                order(
                    vec![SaleLineItem::new("p2", 1), SaleLineItem::new("p2", 2)],
                    540,
                ),
                "s1".to_string(),
                now(),
                StockPolicy::Reject,
            )
            .unwrap_err();

        match err {
            CoreError::InsufficientStock {
                product_id,
                available,
                requested,
                ..
            } => {
                assert_eq!(product_id, "p2");
                assert_eq!(available, 2);
                assert_eq!(requested, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(state, before);
    }

    #[test]
    fn test_commit_rejects_invalid_lines() {
        let mut state = milk_catalog();
        let before = state.clone();

        assert!(state
            .commit_order(
                order(vec![SaleLineItem::new("p1", 0)], 0),
                "s1".to_string(),
                now(),
                StockPolicy::AllowNegative,
            )
            .is_err());
        assert!(state
            .commit_order(
                order(vec![SaleLineItem::new("p1", 1)], -250),
                "s1".to_string(),
                now(),
                StockPolicy::AllowNegative,
            )
            .is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn test_commit_rejects_huge_quantities_under_both_policies() {
        for policy in [StockPolicy::AllowNegative, StockPolicy::Reject] {
            let mut state = milk_catalog();
            let before = state.clone();

            let err = state
                .commit_order(
                    order(
                        vec![SaleLineItem::new("p1", i64::MAX), SaleLineItem::new("p1", 1)],
                        250,
                    ),
                    "s1".to_string(),
                    now(),
                    policy,
                )
                .unwrap_err();

            assert!(matches!(
                err,
                CoreError::Validation(ValidationError::OutOfRange { .. })
            ));
            assert_eq!(state, before);
        }
    }

    #[test]
    fn test_commit_on_deeply_negative_stock_does_not_wrap() {
        let mut state = milk_catalog();
        state.products[0].stock = i64::MIN + 1;

        state
            .commit_order(
                order(vec![SaleLineItem::new("p1", 5)], 1250),
                "s1".to_string(),
                now(),
                StockPolicy::AllowNegative,
            )
            .unwrap();

        assert_eq!(state.product("p1").unwrap().stock, i64::MIN);
    }

    #[test]
    fn test_sale_lookup() {
        let mut state = milk_catalog();
        state
            .commit_order(
                order(vec![SaleLineItem::new("p1", 1)], 250),
                "s1".to_string(),
                now(),
                StockPolicy::AllowNegative,
            )
            .unwrap();

        assert_eq!(state.sale("s1").unwrap().total.cents(), 250);
        assert!(state.sale("s2").is_none());
    }
}
