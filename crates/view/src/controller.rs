//! Async driver tying the reducer to the repository.

use pantry_infra::InventoryRepository;
use pantry_infra::document_store::DocumentStore;
use pantry_inventory::InventoryItem;
use tracing::instrument;

use crate::action::{Effect, ViewAction};
use crate::state::ViewState;
use crate::update::update;

/// Owns the page state and runs the effects the reducer asks for.
///
/// Every effect ends in a fresh listing (`Loaded`) or a notice (`Failed`);
/// there is no optimistic update and no retry.
pub struct ViewController<S> {
    repository: InventoryRepository<S>,
    state: ViewState,
}

impl<S> ViewController<S>
where
    S: DocumentStore,
{
    pub fn new(repository: InventoryRepository<S>) -> Self {
        Self {
            repository,
            state: ViewState::default(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn visible_items(&self) -> Vec<&InventoryItem> {
        self.state.visible_items()
    }

    /// Initial load.
    pub async fn mount(&mut self) {
        self.dispatch(ViewAction::Mount).await;
    }

    /// Feed an action through the reducer, running any effect to completion.
    #[instrument(skip(self))]
    pub async fn dispatch(&mut self, action: ViewAction) {
        let mut next = Some(action);
        while let Some(action) = next.take() {
            if let Some(effect) = update(&mut self.state, action) {
                next = Some(self.run(effect).await);
            }
        }
    }

    async fn run(&self, effect: Effect) -> ViewAction {
        let result = match effect {
            Effect::Refresh => self.repository.list().await,
            Effect::Mutate(command) => self.repository.execute(command).await,
        };
        match result {
            Ok(items) => ViewAction::Loaded(items),
            Err(e) => {
                tracing::warn!(error = %e, "inventory request failed");
                ViewAction::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use pantry_core::{ItemName, Quantity};
    use pantry_infra::document_store::{
        Document, InMemoryDocumentStore, StoreError, StoredDocument,
    };

    use super::*;

    /// In-memory store that can be switched to fail every call.
    #[derive(Default)]
    struct FlakyStore {
        inner: InMemoryDocumentStore,
        down: AtomicBool,
    }

    impl FlakyStore {
        fn check(&self) -> Result<(), StoreError> {
            if self.down.load(Ordering::SeqCst) {
                Err(StoreError::Unavailable("network unreachable".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait::async_trait]
    impl DocumentStore for FlakyStore {
        async fn list(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
            self.check()?;
            self.inner.list(collection).await
        }

        async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, StoreError> {
            self.check()?;
            self.inner.get(collection, key).await
        }

        async fn upsert(
            &self,
            collection: &str,
            key: &str,
            body: Document,
        ) -> Result<(), StoreError> {
            self.check()?;
            self.inner.upsert(collection, key, body).await
        }

        async fn delete(&self, collection: &str, key: &str) -> Result<(), StoreError> {
            self.check()?;
            self.inner.delete(collection, key).await
        }
    }

    fn name(s: &str) -> ItemName {
        ItemName::parse(s).unwrap()
    }

    fn item(n: &str, q: u32) -> InventoryItem {
        InventoryItem::new(name(n), Quantity::new(q))
    }

    async fn seeded() -> (Arc<FlakyStore>, ViewController<Arc<FlakyStore>>) {
        let store = Arc::new(FlakyStore::default());
        let repo = InventoryRepository::new(store.clone());
        repo.add(name("apple"), Quantity::new(1)).await.unwrap();
        repo.add(name("banana"), Quantity::new(2)).await.unwrap();
        repo.add(name("grape"), Quantity::new(3)).await.unwrap();
        (store, ViewController::new(repo))
    }

    #[tokio::test]
    async fn mount_loads_items() {
        let (_, mut controller) = seeded().await;
        controller.mount().await;

        let state = controller.state();
        assert!(!state.loading);
        assert_eq!(
            state.items,
            vec![item("apple", 1), item("banana", 2), item("grape", 3)]
        );
    }

    #[tokio::test]
    async fn search_narrows_visible_items() {
        let (_, mut controller) = seeded().await;
        controller.mount().await;
        controller.dispatch(ViewAction::SetSearch("an".to_string())).await;

        assert_eq!(controller.visible_items(), vec![&item("banana", 2)]);
        assert_eq!(controller.state().items.len(), 3);
    }

    #[tokio::test]
    async fn add_through_dialog_refreshes_list() {
        let (_, mut controller) = seeded().await;
        controller.mount().await;

        controller.dispatch(ViewAction::OpenAdd).await;
        controller.dispatch(ViewAction::SetAddName("apple".to_string())).await;
        controller.dispatch(ViewAction::SetAddQuantity("4".to_string())).await;
        controller.dispatch(ViewAction::SubmitAdd).await;

        let state = controller.state();
        assert!(!state.add.open);
        assert_eq!(state.items[0], item("apple", 5));
    }

    #[tokio::test]
    async fn edit_renames_row() {
        let (_, mut controller) = seeded().await;
        controller.mount().await;

        controller.dispatch(ViewAction::OpenEdit(item("grape", 3))).await;
        controller.dispatch(ViewAction::SetEditName("kiwi".to_string())).await;
        controller.dispatch(ViewAction::SubmitEdit).await;

        assert_eq!(
            controller.state().items,
            vec![item("apple", 1), item("banana", 2), item("kiwi", 3)]
        );
    }

    #[tokio::test]
    async fn remove_one_then_remove_all() {
        let (_, mut controller) = seeded().await;
        controller.mount().await;

        controller.dispatch(ViewAction::RemoveOne(name("apple"))).await;
        controller.dispatch(ViewAction::RemoveAll(name("grape"))).await;

        assert_eq!(controller.state().items, vec![item("banana", 2)]);
    }

    #[tokio::test]
    async fn store_failure_raises_notice_and_keeps_list() {
        let (store, mut controller) = seeded().await;
        controller.mount().await;

        store.down.store(true, Ordering::SeqCst);
        controller.dispatch(ViewAction::RemoveAll(name("apple"))).await;

        let state = controller.state();
        assert_eq!(state.items.len(), 3);
        assert!(!state.loading);
        let notice = state.notice.as_ref().unwrap();
        assert!(notice.message.contains("network unreachable"));

        store.down.store(false, Ordering::SeqCst);
        controller.dispatch(ViewAction::Refresh).await;
        assert!(controller.state().notice.is_none());
    }
}
