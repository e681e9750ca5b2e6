use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use pantry_core::{DomainError, DomainResult, ItemName, Quantity};

/// An inventory record as listed: a name bound to a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub name: ItemName,
    pub quantity: Quantity,
}

impl InventoryItem {
    pub fn new(name: ItemName, quantity: Quantity) -> Self {
        Self { name, quantity }
    }

    pub fn display_name(&self) -> String {
        self.name.display_name()
    }
}

/// Stored document body for one item (`{ "quantity": n }`).
///
/// The quantity is kept as a signed 64-bit integer because that is what the
/// store holds; other clients may have written values outside `Quantity`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDocument {
    pub quantity: i64,
}

impl ItemDocument {
    pub fn new(quantity: Quantity) -> Self {
        Self {
            quantity: quantity.into(),
        }
    }

    /// Interpret the stored value. Zero is tolerated here so `remove` can
    /// clean up a zero record written by another client.
    pub fn quantity(&self) -> DomainResult<Quantity> {
        Quantity::try_from(self.quantity)
    }
}

/// What `modify` does when the new name already holds a record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenamePolicy {
    /// The record under the new name is replaced; its old quantity is lost.
    #[default]
    Overwrite,
    /// The new quantity is added to the record under the new name.
    Merge,
}

impl core::str::FromStr for RenamePolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overwrite" => Ok(RenamePolicy::Overwrite),
            "merge" => Ok(RenamePolicy::Merge),
            other => Err(DomainError::invalid_input(format!(
                "unknown rename policy '{other}' (expected overwrite or merge)"
            ))),
        }
    }
}

/// Command: AddItem (merge-on-add).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddItem {
    pub name: ItemName,
    pub quantity: Quantity,
}

/// Command: RemoveOne (one unit, deleting at zero).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveOne {
    pub name: ItemName,
}

/// Command: RemoveAll (unconditional delete).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveAll {
    pub name: ItemName,
}

/// Command: ModifyItem (requantify, optionally under a new name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyItem {
    pub old_name: ItemName,
    pub new_name: ItemName,
    pub quantity: Quantity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryCommand {
    Add(AddItem),
    RemoveOne(RemoveOne),
    RemoveAll(RemoveAll),
    Modify(ModifyItem),
}

impl InventoryCommand {
    pub fn kind(&self) -> &'static str {
        match self {
            InventoryCommand::Add(_) => "inventory.add",
            InventoryCommand::RemoveOne(_) => "inventory.remove_one",
            InventoryCommand::RemoveAll(_) => "inventory.remove_all",
            InventoryCommand::Modify(_) => "inventory.modify",
        }
    }

    /// Records that must be fetched before the command can be decided.
    ///
    /// `RemoveAll` and an in-place `Modify` write blind; a rename reads the
    /// old record, and also the new one when the policy merges.
    pub fn reads(&self, policy: RenamePolicy) -> Vec<&ItemName> {
        match self {
            InventoryCommand::Add(cmd) => vec![&cmd.name],
            InventoryCommand::RemoveOne(cmd) => vec![&cmd.name],
            InventoryCommand::RemoveAll(_) => vec![],
            InventoryCommand::Modify(cmd) if cmd.old_name == cmd.new_name => vec![],
            InventoryCommand::Modify(cmd) => match policy {
                RenamePolicy::Overwrite => vec![&cmd.old_name],
                RenamePolicy::Merge => vec![&cmd.old_name, &cmd.new_name],
            },
        }
    }
}

/// A single write against the store, produced by deciding a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreWrite {
    /// Full replace of the record under `name`.
    Upsert { name: ItemName, quantity: Quantity },
    /// Delete the record under `name` (absent is a no-op).
    Delete { name: ItemName },
}

impl StoreWrite {
    pub fn name(&self) -> &ItemName {
        match self {
            StoreWrite::Upsert { name, .. } | StoreWrite::Delete { name } => name,
        }
    }
}

/// The records a command read, keyed by name.
///
/// Holds only what was fetched; a name missing from the snapshot is treated
/// as absent from the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockSnapshot {
    records: BTreeMap<ItemName, Quantity>,
}

impl StockSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: impl IntoIterator<Item = InventoryItem>) -> Self {
        Self {
            records: items.into_iter().map(|i| (i.name, i.quantity)).collect(),
        }
    }

    pub fn insert(&mut self, name: ItemName, quantity: Quantity) {
        self.records.insert(name, quantity);
    }

    pub fn quantity(&self, name: &ItemName) -> Option<Quantity> {
        self.records.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn items(&self) -> Vec<InventoryItem> {
        self.records
            .iter()
            .map(|(name, quantity)| InventoryItem::new(name.clone(), *quantity))
            .collect()
    }

    /// Evolve the snapshot as the store would after `write`.
    pub fn apply(&mut self, write: &StoreWrite) {
        match write {
            StoreWrite::Upsert { name, quantity } => {
                self.records.insert(name.clone(), *quantity);
            }
            StoreWrite::Delete { name } => {
                self.records.remove(name);
            }
        }
    }

    /// Decide the writes for `command` (pure; does not mutate the snapshot).
    pub fn handle(
        &self,
        command: &InventoryCommand,
        policy: RenamePolicy,
    ) -> DomainResult<Vec<StoreWrite>> {
        match command {
            InventoryCommand::Add(cmd) => self.handle_add(cmd),
            InventoryCommand::RemoveOne(cmd) => Ok(self.handle_remove_one(cmd)),
            InventoryCommand::RemoveAll(cmd) => Ok(vec![StoreWrite::Delete {
                name: cmd.name.clone(),
            }]),
            InventoryCommand::Modify(cmd) => self.handle_modify(cmd, policy),
        }
    }

    fn handle_add(&self, cmd: &AddItem) -> DomainResult<Vec<StoreWrite>> {
        if cmd.quantity.is_zero() {
            return Err(DomainError::invalid_input("quantity to add must be at least 1"));
        }
        let quantity = match self.quantity(&cmd.name) {
            Some(existing) => existing.checked_add(cmd.quantity)?,
            None => cmd.quantity,
        };
        Ok(vec![StoreWrite::Upsert {
            name: cmd.name.clone(),
            quantity,
        }])
    }

    fn handle_remove_one(&self, cmd: &RemoveOne) -> Vec<StoreWrite> {
        let Some(existing) = self.quantity(&cmd.name) else {
            return vec![];
        };
        let remaining = existing.decrement();
        if remaining.is_zero() {
            vec![StoreWrite::Delete {
                name: cmd.name.clone(),
            }]
        } else {
            vec![StoreWrite::Upsert {
                name: cmd.name.clone(),
                quantity: remaining,
            }]
        }
    }

    fn handle_modify(
        &self,
        cmd: &ModifyItem,
        policy: RenamePolicy,
    ) -> DomainResult<Vec<StoreWrite>> {
        if cmd.old_name == cmd.new_name {
            if cmd.quantity.is_zero() {
                return Ok(vec![StoreWrite::Delete {
                    name: cmd.old_name.clone(),
                }]);
            }
            return Ok(vec![StoreWrite::Upsert {
                name: cmd.old_name.clone(),
                quantity: cmd.quantity,
            }]);
        }

        if self.quantity(&cmd.old_name).is_none() {
            return Ok(vec![]);
        }

        let mut writes = Vec::with_capacity(2);
        if !cmd.quantity.is_zero() {
            let quantity = match (policy, self.quantity(&cmd.new_name)) {
                (RenamePolicy::Merge, Some(existing)) => existing.checked_add(cmd.quantity)?,
                _ => cmd.quantity,
            };
            writes.push(StoreWrite::Upsert {
                name: cmd.new_name.clone(),
                quantity,
            });
        }
        writes.push(StoreWrite::Delete {
            name: cmd.old_name.clone(),
        });
        Ok(writes)
    }
}
