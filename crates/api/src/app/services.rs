use std::sync::Arc;

use pantry_infra::document_store::DocumentStore;
use pantry_infra::{InventoryRepository, StoreSettings};

/// Repository over whichever backend was configured at start-up.
pub type Inventory = InventoryRepository<Arc<dyn DocumentStore>>;

/// Shared state handed to every handler.
pub struct AppServices {
    pub inventory: Inventory,
}

impl AppServices {
    pub fn new(inventory: Inventory) -> Self {
        Self { inventory }
    }
}

pub async fn build_services(settings: &StoreSettings) -> anyhow::Result<AppServices> {
    let inventory = settings.repository().await?;
    tracing::info!(
        backend = settings.backend.name(),
        collection = inventory.collection(),
        rename_policy = ?inventory.rename_policy(),
        "inventory services ready"
    );
    Ok(AppServices::new(inventory))
}
