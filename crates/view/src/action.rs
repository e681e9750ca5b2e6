//! Inputs to the reducer and the store work it asks for.

use pantry_core::ItemName;
use pantry_inventory::{InventoryCommand, InventoryItem};

/// Something that happened on the page, or the outcome of a store round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    /// Page shown for the first time.
    Mount,
    Refresh,
    /// A list (or a mutation followed by a re-list) succeeded.
    Loaded(Vec<InventoryItem>),
    /// A store round trip failed; carries the error text.
    Failed(String),
    DismissNotice,

    SetSearch(String),

    OpenAdd,
    CloseAdd,
    SetAddName(String),
    SetAddQuantity(String),
    SubmitAdd,

    /// Open the edit dialog seeded from a listed row.
    OpenEdit(InventoryItem),
    CloseEdit,
    SetEditName(String),
    SetEditQuantity(String),
    SubmitEdit,

    RemoveOne(ItemName),
    RemoveAll(ItemName),
}

/// Store work requested by the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Re-list the collection.
    Refresh,
    /// Run a command; the repository re-lists afterwards.
    Mutate(InventoryCommand),
}
