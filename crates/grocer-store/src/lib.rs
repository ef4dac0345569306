//! # grocer-store: Persistence Layer for Grocer POS
//!
//! This crate owns every read and write of the persisted collections and
//! exposes the transactional [`Store`].
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Grocer POS Data Flow                             │
//! │                                                                         │
//! │  CLI command (checkout)                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   grocer-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │    Store      │    │  Persistence  │    │  Migrations  │  │   │
//! │  │   │  (store.rs)   │    │  (trait)      │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ Mutex<State>  │───►│ Json          │    │ 001_init.sql │  │   │
//! │  │   │ clone/save/   │    │ Sqlite        │◄───│              │  │   │
//! │  │   │ swap          │    │ Memory        │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  products.json / sales.json / ...   or   grocer.db (app_state)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The transactional store
//! - [`persistence`] - Backend trait and implementations
//! - [`migrations`] - Embedded SQLite migrations
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use grocer_store::{JsonPersistence, Store};
//!
//! let store = Store::open(Arc::new(JsonPersistence::new("./data")), Default::default()).await?;
//! let sale = store.commit(order).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod persistence;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use persistence::{
    JsonPersistence, MemoryPersistence, Persistence, SqliteConfig, SqlitePersistence,
};
pub use store::Store;
