//! Keyed document store boundary.
//!
//! This module defines the infrastructure-facing abstraction for the remote
//! document database: named collections of JSON documents addressed by a
//! string key. Adapters live in the submodules.

#[cfg(feature = "firestore")]
pub mod firestore;
pub mod firestore_value;
pub mod in_memory;
pub mod postgres;
pub mod r#trait;

#[cfg(feature = "firestore")]
pub use firestore::{FirestoreConfig, FirestoreDocumentStore};
pub use in_memory::InMemoryDocumentStore;
pub use postgres::PostgresDocumentStore;
pub use r#trait::{Document, DocumentStore, StoreError, StoredDocument};
