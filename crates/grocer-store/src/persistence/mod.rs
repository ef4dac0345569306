//! # Persistence Backends
//!
//! The `load()/save(state)` seam the [`Store`](crate::Store) is built on.
//!
//! ## Backends
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Arc<dyn Persistence>                                 │
//! │                                                                         │
//! │  ┌────────────────┐   ┌────────────────────┐   ┌──────────────────┐    │
//! │  │ JsonPersistence│   │ SqlitePersistence  │   │MemoryPersistence │    │
//! │  │ products.json  │   │ app_state(key,     │   │ last saved state │    │
//! │  │ sales.json     │   │   value,           │   │ (tests)          │    │
//! │  │ suppliers.json │   │   updated_at)      │   │                  │    │
//! │  │ users.json     │   │ one tx per save    │   │                  │    │
//! │  └────────────────┘   └────────────────────┘   └──────────────────┘    │
//! │                                                                         │
//! │  Every save is a whole-state overwrite. A missing collection loads as  │
//! │  an empty one.                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod json;
pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{StoreError, StoreResult};
use grocer_core::StoreState;

pub use json::JsonPersistence;
pub use memory::MemoryPersistence;
pub use sqlite::{SqliteConfig, SqlitePersistence};

/// Persisted collection keys, in save order.
pub const COLLECTIONS: [&str; 4] = ["products", "sales", "suppliers", "users"];

/// Whole-state storage.
#[async_trait]
pub trait Persistence: Send + Sync {
    /// Reads every collection. Absent collections come back empty.
    async fn load(&self) -> StoreResult<StoreState>;

    /// Overwrites every collection with `state`.
    async fn save(&self, state: &StoreState) -> StoreResult<()>;

    /// Short human-readable location, for logs.
    fn describe(&self) -> String;
}

// =============================================================================
// Collection Encoding
// =============================================================================

/// Serializes each collection of `state` into a JSON array, keyed by
/// [`COLLECTIONS`].
pub(crate) fn encode_collections(
    state: &StoreState,
    pretty: bool,
) -> StoreResult<Vec<(&'static str, String)>> {
    fn encode<T: Serialize>(key: &str, items: &[T], pretty: bool) -> StoreResult<String> {
        let encoded = if pretty {
            serde_json::to_string_pretty(items)
        } else {
            serde_json::to_string(items)
        };
        encoded.map_err(|e| StoreError::serialization(key, e))
    }

    Ok(vec![
        ("products", encode("products", &state.products, pretty)?),
        ("sales", encode("sales", &state.sales, pretty)?),
        ("suppliers", encode("suppliers", &state.suppliers, pretty)?),
        ("users", encode("users", &state.users, pretty)?),
    ])
}

/// Rebuilds a state from raw collection payloads. `raw(key)` returns `None`
/// for a collection that was never saved.
pub(crate) fn decode_collections(
    mut raw: impl FnMut(&str) -> Option<String>,
) -> StoreResult<StoreState> {
    fn decode<T: DeserializeOwned>(key: &str, payload: Option<String>) -> StoreResult<Vec<T>> {
        match payload {
            Some(text) if !text.trim().is_empty() => {
                serde_json::from_str(&text).map_err(|e| StoreError::serialization(key, e))
            }
            _ => Ok(Vec::new()),
        }
    }

    Ok(StoreState {
        products: decode("products", raw("products"))?,
        sales: decode("sales", raw("sales"))?,
        suppliers: decode("suppliers", raw("suppliers"))?,
        users: decode("users", raw("users"))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_encode_decode_preserves_state() {
        let state = StoreState::new(Vec::new(), Vec::new());
        let encoded: HashMap<_, _> = encode_collections(&state, false)
            .unwrap()
            .into_iter()
            .collect();

        assert_eq!(encoded.len(), COLLECTIONS.len());
        assert_eq!(encoded["products"], "[]");

        let decoded = decode_collections(|key| encoded.get(key).cloned()).unwrap();
        assert_eq!(decoded, state);
    }

    #[test]
    fn test_decode_reports_bad_collection() {
        let err = decode_collections(|key| (key == "sales").then(|| "{oops".to_string()))
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Serialization { ref collection, .. } if collection == "sales"
        ));
    }
}
