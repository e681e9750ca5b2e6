use serde::{Deserialize, Serialize};

use pantry_core::{DomainError, ItemName, Quantity};
use pantry_inventory::InventoryItem;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub name: String,
    pub quantity: i64,
}

/// Body of `PUT /inventory/items/:name`. Omitting `name` keeps the current one.
#[derive(Debug, Deserialize)]
pub struct ModifyItemRequest {
    pub name: Option<String>,
    pub quantity: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListItemsQuery {
    pub search: Option<String>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub name: String,
    pub display_name: String,
    pub quantity: u32,
}

impl From<&InventoryItem> for ItemResponse {
    fn from(item: &InventoryItem) -> Self {
        Self {
            name: item.name.as_str().to_string(),
            display_name: item.display_name(),
            quantity: item.quantity.get(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ItemsResponse {
    pub items: Vec<ItemResponse>,
}

impl ItemsResponse {
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a InventoryItem>) -> Self {
        Self {
            items: items.into_iter().map(ItemResponse::from).collect(),
        }
    }
}

// -------------------------
// Parsing helpers
// -------------------------

pub fn parse_name(raw: &str) -> Result<ItemName, DomainError> {
    ItemName::parse(raw)
}

pub fn parse_quantity(raw: i64) -> Result<Quantity, DomainError> {
    Quantity::try_from(raw)
}
