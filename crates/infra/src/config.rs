//! Store configuration loaded from environment variables.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `PANTRY_STORE` | `memory` | `memory`, `postgres` or `firestore` |
//! | `DATABASE_URL` | required for `postgres` | Postgres connection string |
//! | `FIRESTORE_PROJECT_ID` | required for `firestore` | GCP project |
//! | `FIRESTORE_DATABASE` | `(default)` | Firestore database id |
//! | `FIRESTORE_BASE_URL` | `https://firestore.googleapis.com` | REST endpoint or emulator |
//! | `FIRESTORE_TOKEN` | unset | OAuth bearer token |
//! | `PANTRY_COLLECTION` | `inventory` | Collection holding the records |
//! | `PANTRY_RENAME_POLICY` | `overwrite` | `overwrite` or `merge` |
//!
//! Empty values count as unset.

use std::sync::Arc;

use anyhow::Context;
use thiserror::Error;

use pantry_inventory::RenamePolicy;

use crate::document_store::{DocumentStore, InMemoryDocumentStore, PostgresDocumentStore};
use crate::repository::{DEFAULT_COLLECTION, InventoryRepository};

pub const DEFAULT_FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com";
pub const DEFAULT_FIRESTORE_DATABASE: &str = "(default)";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be set when PANTRY_STORE={backend}")]
    Missing {
        var: &'static str,
        backend: &'static str,
    },

    #[error("invalid {var}='{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("store backend '{0}' is not compiled in (enable the `{0}` feature)")]
    Unsupported(&'static str),
}

/// Connection settings for the Firestore REST adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirestoreSettings {
    pub project_id: String,
    pub database: String,
    pub base_url: String,
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Postgres { database_url: String },
    Firestore(FirestoreSettings),
}

impl StoreBackend {
    pub fn name(&self) -> &'static str {
        match self {
            StoreBackend::Memory => "memory",
            StoreBackend::Postgres { .. } => "postgres",
            StoreBackend::Firestore(_) => "firestore",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub backend: StoreBackend,
    pub collection: String,
    pub rename_policy: RenamePolicy,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            collection: DEFAULT_COLLECTION.to_string(),
            rename_policy: RenamePolicy::default(),
        }
    }
}

impl StoreSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build settings from an arbitrary variable source (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let backend = match get("PANTRY_STORE").as_deref() {
            None | Some("memory") => StoreBackend::Memory,
            Some("postgres") => StoreBackend::Postgres {
                database_url: get("DATABASE_URL").ok_or(ConfigError::Missing {
                    var: "DATABASE_URL",
                    backend: "postgres",
                })?,
            },
            Some("firestore") => StoreBackend::Firestore(FirestoreSettings {
                project_id: get("FIRESTORE_PROJECT_ID").ok_or(ConfigError::Missing {
                    var: "FIRESTORE_PROJECT_ID",
                    backend: "firestore",
                })?,
                database: get("FIRESTORE_DATABASE")
                    .unwrap_or_else(|| DEFAULT_FIRESTORE_DATABASE.to_string()),
                base_url: get("FIRESTORE_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_FIRESTORE_BASE_URL.to_string()),
                token: get("FIRESTORE_TOKEN"),
            }),
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "PANTRY_STORE",
                    value: other.to_string(),
                    reason: "expected memory, postgres or firestore".to_string(),
                });
            }
        };

        let collection = match get("PANTRY_COLLECTION") {
            None => DEFAULT_COLLECTION.to_string(),
            Some(c) if c.contains('/') => {
                return Err(ConfigError::Invalid {
                    var: "PANTRY_COLLECTION",
                    value: c,
                    reason: "must not contain '/'".to_string(),
                });
            }
            Some(c) => c,
        };

        let rename_policy = match get("PANTRY_RENAME_POLICY") {
            None => RenamePolicy::default(),
            Some(raw) => raw
                .parse::<RenamePolicy>()
                .map_err(|e| ConfigError::Invalid {
                    var: "PANTRY_RENAME_POLICY",
                    value: raw.clone(),
                    reason: e.to_string(),
                })?,
        };

        Ok(Self {
            backend,
            collection,
            rename_policy,
        })
    }

    /// Open the configured backend.
    pub async fn connect(&self) -> anyhow::Result<Arc<dyn DocumentStore>> {
        tracing::info!(
            backend = self.backend.name(),
            collection = %self.collection,
            "connecting document store"
        );
        match &self.backend {
            StoreBackend::Memory => Ok(Arc::new(InMemoryDocumentStore::new())),
            StoreBackend::Postgres { database_url } => {
                let store = PostgresDocumentStore::connect(database_url)
                    .await
                    .context("failed to connect to postgres")?;
                Ok(Arc::new(store))
            }
            StoreBackend::Firestore(settings) => connect_firestore(settings),
        }
    }

    /// Open the backend and wrap it in a repository with these settings.
    pub async fn repository(&self) -> anyhow::Result<InventoryRepository<Arc<dyn DocumentStore>>> {
        let store = self.connect().await?;
        Ok(InventoryRepository::new(store)
            .with_collection(self.collection.clone())
            .with_rename_policy(self.rename_policy))
    }
}

#[cfg(feature = "firestore")]
fn connect_firestore(settings: &FirestoreSettings) -> anyhow::Result<Arc<dyn DocumentStore>> {
    use crate::document_store::{FirestoreConfig, FirestoreDocumentStore};

    let mut config = FirestoreConfig::new(settings.project_id.clone());
    config.database = settings.database.clone();
    config.base_url = settings.base_url.clone();
    config.token = settings.token.clone();
    let store = FirestoreDocumentStore::new(config).context("failed to build firestore client")?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "firestore"))]
fn connect_firestore(_settings: &FirestoreSettings) -> anyhow::Result<Arc<dyn DocumentStore>> {
    Err(ConfigError::Unsupported("firestore").into())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings(vars: &[(&str, &str)]) -> Result<StoreSettings, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        StoreSettings::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_to_memory_store() {
        assert_eq!(settings(&[]).unwrap(), StoreSettings::default());
        assert_eq!(settings(&[("PANTRY_STORE", "  ")]).unwrap(), StoreSettings::default());
    }

    #[test]
    fn postgres_requires_database_url() {
        assert_eq!(
            settings(&[("PANTRY_STORE", "postgres")]),
            Err(ConfigError::Missing {
                var: "DATABASE_URL",
                backend: "postgres"
            })
        );

        let s = settings(&[
            ("PANTRY_STORE", "postgres"),
            ("DATABASE_URL", "postgres://localhost/pantry"),
        ])
        .unwrap();
        assert_eq!(
            s.backend,
            StoreBackend::Postgres {
                database_url: "postgres://localhost/pantry".to_string()
            }
        );
    }

    #[test]
    fn firestore_fills_defaults() {
        let s = settings(&[
            ("PANTRY_STORE", "firestore"),
            ("FIRESTORE_PROJECT_ID", "pantry-dev"),
        ])
        .unwrap();
        assert_eq!(
            s.backend,
            StoreBackend::Firestore(FirestoreSettings {
                project_id: "pantry-dev".to_string(),
                database: DEFAULT_FIRESTORE_DATABASE.to_string(),
                base_url: DEFAULT_FIRESTORE_BASE_URL.to_string(),
                token: None,
            })
        );
    }

    #[test]
    fn rejects_unknown_values() {
        assert!(matches!(
            settings(&[("PANTRY_STORE", "sqlite")]),
            Err(ConfigError::Invalid { var: "PANTRY_STORE", .. })
        ));
        assert!(matches!(
            settings(&[("PANTRY_RENAME_POLICY", "sometimes")]),
            Err(ConfigError::Invalid { var: "PANTRY_RENAME_POLICY", .. })
        ));
        assert!(matches!(
            settings(&[("PANTRY_COLLECTION", "a/b")]),
            Err(ConfigError::Invalid { var: "PANTRY_COLLECTION", .. })
        ));
    }

    #[test]
    fn reads_collection_and_policy() {
        let s = settings(&[
            ("PANTRY_COLLECTION", "pantry"),
            ("PANTRY_RENAME_POLICY", "merge"),
        ])
        .unwrap();
        assert_eq!(s.collection, "pantry");
        assert_eq!(s.rename_policy, RenamePolicy::Merge);
    }

    #[tokio::test]
    async fn memory_repository_is_usable() {
        let repo = StoreSettings::default().repository().await.unwrap();
        assert!(repo.list().await.unwrap().is_empty());
    }
}
