//! # Store State
//!
//! The complete persisted state and its pure transitions.
//!
//! ## Transition Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Pure State Transitions                               │
//! │                                                                         │
//! │   StoreState ──clone──► working copy ──transition──► working copy'      │
//! │        ▲                                                  │             │
//! │        │                                                  ▼             │
//! │        └──────────── swap (only if save succeeds) ◄── save(&copy')      │
//! │                                                                         │
//! │  Transitions in this crate never read the clock, never generate ids    │
//! │  on their own and never perform I/O; the caller passes ids and `now`. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Catalog operations live in [`crate::catalog`], the sale commit in
//! [`crate::ledger`], suppliers and users in [`crate::directory`]. They are
//! all inherent methods on [`StoreState`] so a single working copy carries
//! every collection through one commit.

use serde::{Deserialize, Serialize};

use crate::types::{Product, Role, Sale, Supplier, User};

/// Every persisted collection.
///
/// Field order matches the persisted keys: `products`, `sales`,
/// `suppliers`, `users`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreState {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub sales: Vec<Sale>,
    #[serde(default)]
    pub suppliers: Vec<Supplier>,
    #[serde(default)]
    pub users: Vec<User>,
}

impl StoreState {
    /// State with the catalog and ledger given and the directory seeded.
    pub fn new(products: Vec<Product>, sales: Vec<Sale>) -> Self {
        let mut state = StoreState {
            products,
            sales,
            ..StoreState::default()
        };
        state.seed_directory();
        state
    }

    /// Fills empty supplier and user lists with the starter entries.
    ///
    /// Returns `true` if anything was added.
    pub fn seed_directory(&mut self) -> bool {
        let mut seeded = false;

        if self.suppliers.is_empty() {
            self.suppliers = vec![
                Supplier {
                    id: "1".to_string(),
                    name: "Supplier A".to_string(),
                    contact: "+1234567890".to_string(),
                    email: "supplierA@example.com".to_string(),
                },
                Supplier {
                    id: "2".to_string(),
                    name: "Supplier B".to_string(),
                    contact: "+0987654321".to_string(),
                    email: "supplierB@example.com".to_string(),
                },
            ];
            seeded = true;
        }

        if self.users.is_empty() {
            self.users = [
                ("1", "admin", Role::Admin),
                ("2", "manager1", Role::Manager),
                ("3", "cashier1", Role::Cashier),
            ]
            .into_iter()
            .map(|(id, username, role)| User {
                id: id.to_string(),
                username: username.to_string(),
                role,
            })
            .collect();
            seeded = true;
        }

        seeded
    }
}

/// Generates a fresh entity id (UUID v4).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_seeds_directory() {
        let state = StoreState::new(Vec::new(), Vec::new());
        assert_eq!(state.suppliers.len(), 2);
        assert_eq!(state.suppliers[0].name, "Supplier A");
        assert_eq!(state.users.len(), 3);
        assert_eq!(state.users[0].username, "admin");
        assert_eq!(state.users[0].role, Role::Admin);
    }

    #[test]
    fn test_seed_keeps_existing_entries() {
        let mut state = StoreState::default();
        state.users.push(User {
            id: "u9".to_string(),
            username: "owner".to_string(),
            role: Role::Admin,
        });

        assert!(state.seed_directory());
        assert_eq!(state.users.len(), 1);
        assert_eq!(state.suppliers.len(), 2);

        assert!(!state.seed_directory());
    }

    #[test]
    fn test_missing_collections_deserialize_empty() {
        let state: StoreState = serde_json::from_str(r#"{"products": []}"#).unwrap();
        assert!(state.sales.is_empty());
        assert!(state.users.is_empty());
    }

    #[test]
    fn test_new_id_is_uuid() {
        let id = new_id();
        assert!(uuid::Uuid::parse_str(&id).is_ok());
        assert_ne!(id, new_id());
    }
}
