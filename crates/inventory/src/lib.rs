//! Inventory domain module.
//!
//! This crate contains business rules for inventory, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage). Commands are
//! decided against a snapshot of the records they read and produce the store
//! writes that carry them out.

pub mod item;
pub mod search;

pub use item::{
    AddItem, InventoryCommand, InventoryItem, ItemDocument, ModifyItem, RemoveAll, RemoveOne,
    RenamePolicy, StockSnapshot, StoreWrite,
};
pub use search::matches_search;
