//! Serializable page state.

use chrono::{DateTime, Utc};
use pantry_core::ItemName;
use pantry_inventory::{InventoryItem, matches_search};
use serde::{Deserialize, Serialize};

/// "Add Item" dialog. Fields hold raw text as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddDialog {
    pub open: bool,
    pub name: String,
    pub quantity: String,
}

/// "Modify Item" dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditDialog {
    pub open: bool,
    /// Name of the row being edited (the rename source).
    pub selected: Option<ItemName>,
    pub name: String,
    pub quantity: String,
}

/// Non-blocking failure indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl Notice {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            raised_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    /// Last successfully loaded list, in store order.
    pub items: Vec<InventoryItem>,
    pub add: AddDialog,
    pub edit: EditDialog,
    pub search: String,
    /// A store round trip is in flight.
    pub loading: bool,
    pub notice: Option<Notice>,
}

impl ViewState {
    /// Items whose name contains the search text, ignoring case.
    ///
    /// Derived from `items` on every call; nothing is cached.
    pub fn visible_items(&self) -> Vec<&InventoryItem> {
        self.items
            .iter()
            .filter(|item| matches_search(&item.name, &self.search))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pantry_core::Quantity;

    fn item(name: &str, q: u32) -> InventoryItem {
        InventoryItem::new(ItemName::parse(name).unwrap(), Quantity::new(q))
    }

    #[test]
    fn search_filters_visible_items() {
        let mut state = ViewState {
            items: vec![item("apple", 1), item("banana", 2), item("grape", 3)],
            ..ViewState::default()
        };
        assert_eq!(state.visible_items().len(), 3);

        state.search = "an".to_string();
        let visible: Vec<&str> = state.visible_items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(visible, vec!["banana"]);

        state.search = "APP".to_string();
        let visible: Vec<&str> = state.visible_items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(visible, vec!["apple"]);
    }

    #[test]
    fn state_serializes_for_the_front_end() {
        let state = ViewState {
            items: vec![item("apple", 3)],
            ..ViewState::default()
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["items"][0]["name"], "apple");
        assert_eq!(json["items"][0]["quantity"], 3);
        assert_eq!(json["add"]["open"], false);
        assert!(json["notice"].is_null());
    }
}
