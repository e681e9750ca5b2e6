//! The reducer.

use pantry_core::{DomainError, ItemName, Quantity};
use pantry_inventory::{AddItem, InventoryCommand, ModifyItem, RemoveAll, RemoveOne};

use crate::action::{Effect, ViewAction};
use crate::state::{AddDialog, EditDialog, Notice, ViewState};

/// Apply one action to the state and return the store work it needs, if any.
///
/// Never touches the store itself. Submitting a dialog always closes it; if
/// the form does not parse, a notice is raised and no effect is returned.
pub fn update(state: &mut ViewState, action: ViewAction) -> Option<Effect> {
    match action {
        ViewAction::Mount | ViewAction::Refresh => {
            state.loading = true;
            Some(Effect::Refresh)
        }
        ViewAction::Loaded(items) => {
            state.items = items;
            state.loading = false;
            state.notice = None;
            None
        }
        ViewAction::Failed(message) => {
            state.loading = false;
            state.notice = Some(Notice::new(message));
            None
        }
        ViewAction::DismissNotice => {
            state.notice = None;
            None
        }
        ViewAction::SetSearch(search) => {
            state.search = search;
            None
        }

        ViewAction::OpenAdd => {
            state.add.open = true;
            None
        }
        ViewAction::CloseAdd => {
            state.add = AddDialog::default();
            None
        }
        ViewAction::SetAddName(name) => {
            state.add.name = name;
            None
        }
        ViewAction::SetAddQuantity(quantity) => {
            state.add.quantity = quantity;
            None
        }
        ViewAction::SubmitAdd => {
            let form = std::mem::take(&mut state.add);
            let parsed = parse_form(&form.name, &form.quantity)
                .map(|(name, quantity)| InventoryCommand::Add(AddItem { name, quantity }));
            mutate(state, "add item", parsed)
        }

        ViewAction::OpenEdit(item) => {
            state.edit = EditDialog {
                open: true,
                name: item.name.as_str().to_string(),
                quantity: item.quantity.to_string(),
                selected: Some(item.name),
            };
            None
        }
        ViewAction::CloseEdit => {
            state.edit = EditDialog::default();
            None
        }
        ViewAction::SetEditName(name) => {
            state.edit.name = name;
            None
        }
        ViewAction::SetEditQuantity(quantity) => {
            state.edit.quantity = quantity;
            None
        }
        ViewAction::SubmitEdit => {
            let form = std::mem::take(&mut state.edit);
            let Some(old_name) = form.selected else {
                return None;
            };
            let parsed = parse_form(&form.name, &form.quantity).map(|(new_name, quantity)| {
                InventoryCommand::Modify(ModifyItem {
                    old_name,
                    new_name,
                    quantity,
                })
            });
            mutate(state, "modify item", parsed)
        }

        ViewAction::RemoveOne(name) => {
            mutate(state, "remove item", Ok(InventoryCommand::RemoveOne(RemoveOne { name })))
        }
        ViewAction::RemoveAll(name) => {
            mutate(state, "remove item", Ok(InventoryCommand::RemoveAll(RemoveAll { name })))
        }
    }
}

fn parse_form(name: &str, quantity: &str) -> Result<(ItemName, Quantity), DomainError> {
    Ok((ItemName::parse(name)?, quantity.parse()?))
}

fn mutate(
    state: &mut ViewState,
    what: &str,
    command: Result<InventoryCommand, DomainError>,
) -> Option<Effect> {
    match command {
        Ok(command) => {
            state.loading = true;
            Some(Effect::Mutate(command))
        }
        Err(e) => {
            state.notice = Some(Notice::new(format!("Could not {what}: {e}")));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pantry_inventory::InventoryItem;

    fn name(s: &str) -> ItemName {
        ItemName::parse(s).unwrap()
    }

    fn item(n: &str, q: u32) -> InventoryItem {
        InventoryItem::new(name(n), Quantity::new(q))
    }

    #[test]
    fn mount_requests_a_listing() {
        let mut state = ViewState::default();
        assert_eq!(update(&mut state, ViewAction::Mount), Some(Effect::Refresh));
        assert!(state.loading);

        assert_eq!(update(&mut state, ViewAction::Loaded(vec![item("apple", 1)])), None);
        assert!(!state.loading);
        assert_eq!(state.items, vec![item("apple", 1)]);
    }

    #[test]
    fn submit_add_closes_dialog_and_dispatches() {
        let mut state = ViewState::default();
        update(&mut state, ViewAction::OpenAdd);
        update(&mut state, ViewAction::SetAddName("apple".to_string()));
        update(&mut state, ViewAction::SetAddQuantity("3".to_string()));

        let effect = update(&mut state, ViewAction::SubmitAdd);
        assert_eq!(
            effect,
            Some(Effect::Mutate(InventoryCommand::Add(AddItem {
                name: name("apple"),
                quantity: Quantity::new(3),
            })))
        );
        assert_eq!(state.add, AddDialog::default());
        assert!(state.loading);
    }

    #[test]
    fn unparseable_add_form_raises_notice_without_effect() {
        let mut state = ViewState::default();
        update(&mut state, ViewAction::OpenAdd);
        update(&mut state, ViewAction::SetAddName("apple".to_string()));
        update(&mut state, ViewAction::SetAddQuantity("lots".to_string()));

        assert_eq!(update(&mut state, ViewAction::SubmitAdd), None);
        assert!(!state.add.open);
        assert!(!state.loading);
        let notice = state.notice.as_ref().unwrap();
        assert!(notice.message.starts_with("Could not add item"));

        update(&mut state, ViewAction::OpenAdd);
        update(&mut state, ViewAction::SetAddQuantity("2".to_string()));
        assert_eq!(update(&mut state, ViewAction::SubmitAdd), None);
    }

    #[test]
    fn closing_dialogs_clears_fields() {
        let mut state = ViewState::default();
        update(&mut state, ViewAction::OpenAdd);
        update(&mut state, ViewAction::SetAddName("pear".to_string()));
        update(&mut state, ViewAction::CloseAdd);
        assert_eq!(state.add, AddDialog::default());

        update(&mut state, ViewAction::OpenEdit(item("apple", 4)));
        update(&mut state, ViewAction::SetEditName("banana".to_string()));
        update(&mut state, ViewAction::CloseEdit);
        assert_eq!(state.edit, EditDialog::default());
    }

    #[test]
    fn open_edit_seeds_from_row() {
        let mut state = ViewState::default();
        update(&mut state, ViewAction::OpenEdit(item("apple", 4)));
        assert_eq!(
            state.edit,
            EditDialog {
                open: true,
                selected: Some(name("apple")),
                name: "apple".to_string(),
                quantity: "4".to_string(),
            }
        );
    }

    #[test]
    fn submit_edit_dispatches_modify_from_selected_row() {
        let mut state = ViewState::default();
        update(&mut state, ViewAction::OpenEdit(item("apple", 4)));
        update(&mut state, ViewAction::SetEditName("banana".to_string()));
        update(&mut state, ViewAction::SetEditQuantity("10".to_string()));

        let effect = update(&mut state, ViewAction::SubmitEdit);
        assert_eq!(
            effect,
            Some(Effect::Mutate(InventoryCommand::Modify(ModifyItem {
                old_name: name("apple"),
                new_name: name("banana"),
                quantity: Quantity::new(10),
            })))
        );
        assert_eq!(state.edit, EditDialog::default());
    }

    #[test]
    fn submit_edit_without_selection_is_ignored() {
        let mut state = ViewState::default();
        assert_eq!(update(&mut state, ViewAction::SubmitEdit), None);
        assert!(state.notice.is_none());
    }

    #[test]
    fn row_buttons_dispatch_removals() {
        let mut state = ViewState::default();
        assert_eq!(
            update(&mut state, ViewAction::RemoveOne(name("apple"))),
            Some(Effect::Mutate(InventoryCommand::RemoveOne(RemoveOne { name: name("apple") })))
        );
        assert_eq!(
            update(&mut state, ViewAction::RemoveAll(name("apple"))),
            Some(Effect::Mutate(InventoryCommand::RemoveAll(RemoveAll { name: name("apple") })))
        );
    }

    #[test]
    fn failure_keeps_items_and_success_clears_notice() {
        let mut state = ViewState::default();
        update(&mut state, ViewAction::Loaded(vec![item("apple", 2)]));
        update(&mut state, ViewAction::RemoveOne(name("apple")));
        update(&mut state, ViewAction::Failed("store unavailable: timeout".to_string()));

        assert_eq!(state.items, vec![item("apple", 2)]);
        assert!(!state.loading);
        assert_eq!(state.notice.as_ref().unwrap().message, "store unavailable: timeout");

        update(&mut state, ViewAction::DismissNotice);
        assert!(state.notice.is_none());

        update(&mut state, ViewAction::Failed("again".to_string()));
        update(&mut state, ViewAction::Loaded(vec![item("apple", 1)]));
        assert!(state.notice.is_none());
    }
}
