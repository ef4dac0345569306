//! In-memory backend for tests and throwaway sessions.

use async_trait::async_trait;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;

use super::Persistence;
use crate::error::{StoreError, StoreResult};
use grocer_core::StoreState;

/// Keeps the last saved state. Saves can be made to fail on demand.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    saved: Mutex<Option<StoreState>>,
    fail_saves: AtomicBool,
    save_count: AtomicUsize,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        MemoryPersistence::default()
    }

    /// Backend that loads `state` as if it had been saved earlier.
    pub fn with_state(state: StoreState) -> Self {
        MemoryPersistence {
            saved: Mutex::new(Some(state)),
            ..MemoryPersistence::default()
        }
    }

    /// While `true`, every `save` returns an I/O error and keeps nothing.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }

    /// The last successfully saved state.
    pub async fn saved(&self) -> Option<StoreState> {
        self.saved.lock().await.clone()
    }
}

#[async_trait]
impl Persistence for MemoryPersistence {
    async fn load(&self) -> StoreResult<StoreState> {
        Ok(self.saved.lock().await.clone().unwrap_or_default())
    }

    async fn save(&self, state: &StoreState) -> StoreResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::io(
                "memory",
                io::Error::new(io::ErrorKind::Other, "save disabled"),
            ));
        }

        *self.saved.lock().await = Some(state.clone());
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
