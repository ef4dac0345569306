//! # JSON File Backend
//!
//! One pretty-printed JSON array per collection inside a data directory.
//!
//! ## Write Path
//! ```text
//! save(state)
//!   ├── create_dir_all(data_dir)
//!   ├── write every <data_dir>/<key>.json.tmp   (any failure: drop the tmps)
//!   └── rename each tmp onto <data_dir>/<key>.json, sales first, products last
//! ```
//!
//! Each file is replaced atomically; the set of four files is not. Nothing
//! is renamed until every payload is on disk, and a failed rename leaves
//! `products.json` untouched, so stock is never decremented on disk for a
//! sale that was not recorded.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::{decode_collections, encode_collections, Persistence, COLLECTIONS};
use crate::error::{StoreError, StoreResult};
use grocer_core::StoreState;

/// Sales land before products: a half-finished save may record a sale
/// without its stock decrements, never the reverse.
const RENAME_ORDER: [&str; 4] = ["sales", "suppliers", "users", "products"];

/// File-per-collection persistence.
#[derive(Debug, Clone)]
pub struct JsonPersistence {
    data_dir: PathBuf,
}

impl JsonPersistence {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        JsonPersistence {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the file holding `collection`.
    pub fn collection_path(&self, collection: &str) -> PathBuf {
        self.data_dir.join(format!("{collection}.json"))
    }

    async fn read_collection(&self, collection: &str) -> StoreResult<Option<String>> {
        let path = self.collection_path(collection);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    fn tmp_path(&self, collection: &str) -> PathBuf {
        self.data_dir.join(format!("{collection}.json.tmp"))
    }

    async fn discard_tmp_files(&self, collections: &[&str]) {
        for key in collections {
            let tmp = self.tmp_path(key);
            if let Err(e) = tokio::fs::remove_file(&tmp).await {
                if e.kind() != ErrorKind::NotFound {
                    warn!(path = %tmp.display(), error = %e, "Could not remove temp file");
                }
            }
        }
    }

    async fn stage_collections(&self, payloads: &[(&'static str, String)]) -> StoreResult<()> {
        for (index, (key, payload)) in payloads.iter().enumerate() {
            let tmp = self.tmp_path(key);
            if let Err(e) = tokio::fs::write(&tmp, payload).await {
                let written: Vec<&str> = payloads[..=index].iter().map(|(k, _)| *k).collect();
                self.discard_tmp_files(&written).await;
                return Err(StoreError::io(&tmp, e));
            }
        }
        Ok(())
    }

    async fn publish_collections(&self) -> StoreResult<()> {
        for (index, key) in RENAME_ORDER.iter().enumerate() {
            let path = self.collection_path(key);
            if let Err(e) = tokio::fs::rename(self.tmp_path(key), &path).await {
                self.discard_tmp_files(&RENAME_ORDER[index..]).await;
                return Err(StoreError::io(&path, e));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Persistence for JsonPersistence {
    async fn load(&self) -> StoreResult<StoreState> {
        debug!(dir = %self.data_dir.display(), "Loading JSON collections");

        let mut raw = Vec::with_capacity(COLLECTIONS.len());
        for key in COLLECTIONS {
            raw.push((key, self.read_collection(key).await?));
        }

        decode_collections(|key| {
            raw.iter()
                .find(|(k, _)| *k == key)
                .and_then(|(_, payload)| payload.clone())
        })
    }

    async fn save(&self, state: &StoreState) -> StoreResult<()> {
        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|e| StoreError::io(&self.data_dir, e))?;

        let payloads = encode_collections(state, true)?;
        self.stage_collections(&payloads).await?;
        self.publish_collections().await?;

        debug!(
            dir = %self.data_dir.display(),
            products = state.products.len(),
            sales = state.sales.len(),
            "Saved JSON collections"
        );
        Ok(())
    }

    fn describe(&self) -> String {
        format!("json:{}", self.data_dir.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use grocer_core::{Money, PaymentMethod, Product, Sale, SaleLineItem};

    fn sample_state() -> StoreState {
        StoreState::new(
            vec![Product {
                id: "p1".to_string(),
                name: "Milk".to_string(),
                price: Money::from_cents(250),
                stock: 7,
                barcode: "111".to_string(),
            }],
            vec![Sale {
                id: "s1".to_string(),
                date: Utc::now(),
                items: vec![SaleLineItem::new("p1", 3)],
                total: Money::from_cents(750),
                payment_method: PaymentMethod::MerchantCode,
            }],
        )
    }

    #[tokio::test]
    async fn test_missing_directory_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonPersistence::new(dir.path().join("not-created-yet"));

        let state = backend.load().await.unwrap();
        assert_eq!(state, StoreState::default());
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonPersistence::new(dir.path());
        let state = sample_state();

        backend.save(&state).await.unwrap();
        let loaded = backend.load().await.unwrap();

        assert_eq!(loaded, state);
        assert!(!dir.path().join("products.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_files_use_camel_case_decimal_shape() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonPersistence::new(dir.path());
        backend.save(&sample_state()).await.unwrap();

        let raw = std::fs::read_to_string(backend.collection_path("sales")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(value[0]["items"][0]["productId"], "p1");
        assert_eq!(value[0]["total"], 7.5);
        assert_eq!(value[0]["paymentMethod"], "merchantCode");
    }

    #[tokio::test]
    async fn test_malformed_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("products.json"), "not json").unwrap();

        let err = JsonPersistence::new(dir.path()).load().await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization { .. }));
    }

    fn disk_stock(backend: &JsonPersistence, product_id: &str) -> i64 {
        let raw = std::fs::read_to_string(backend.collection_path("products")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        value
            .as_array()
            .unwrap()
            .iter()
            .find(|p| p["id"] == product_id)
            .and_then(|p| p["stock"].as_i64())
            .unwrap()
    }

    fn leftover_tmp_files(dir: &Path) -> Vec<String> {
        std::fs::read_dir(dir)
            .unwrap()
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".tmp") && name != "users.json.tmp")
            .collect()
    }

    #[tokio::test]
    async fn test_failed_sales_write_keeps_products_on_disk() {
        use crate::store::Store;
        use grocer_core::{Order, StockPolicy};
        use std::sync::Arc;

        let dir = tempfile::tempdir().unwrap();
        let backend = JsonPersistence::new(dir.path());
        backend.save(&sample_state()).await.unwrap();

        let store = Store::open(Arc::new(backend.clone()), StockPolicy::AllowNegative)
            .await
            .unwrap();

        // A directory where sales.json should be makes the rename fail.
        std::fs::remove_file(backend.collection_path("sales")).unwrap();
        std::fs::create_dir(backend.collection_path("sales")).unwrap();

        let result = store
            .commit(Order {
                items: vec![SaleLineItem::new("p1", 3)],
                total: Money::from_cents(750),
                payment_method: PaymentMethod::Cash,
            })
            .await;

        assert!(result.is_err());
        assert_eq!(disk_stock(&backend, "p1"), 7);
        assert_eq!(store.get_product("p1").await.unwrap().stock, 7);
        assert!(leftover_tmp_files(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_failed_staging_renames_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonPersistence::new(dir.path());
        backend.save(&sample_state()).await.unwrap();

        std::fs::create_dir(dir.path().join("users.json.tmp")).unwrap();

        let mut changed = sample_state();
        changed.products[0].stock = 4;
        assert!(backend.save(&changed).await.is_err());

        assert_eq!(disk_stock(&backend, "p1"), 7);
        assert!(leftover_tmp_files(dir.path()).is_empty());
    }
}
