//! Infrastructure layer: document stores, the inventory repository and
//! store configuration.

pub mod config;
pub mod document_store;
pub mod repository;

pub use config::{ConfigError, StoreBackend, StoreSettings};
pub use repository::{DEFAULT_COLLECTION, InventoryError, InventoryRepository};
