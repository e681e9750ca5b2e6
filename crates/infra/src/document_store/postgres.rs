//! Postgres-backed document store implementation.
//!
//! Documents live in one table keyed by `(collection, key)` with a JSONB body.
//! Listing orders by key so iteration matches the other adapters.
//!
//! ## Error Mapping
//!
//! | SQLx Error | StoreError | Scenario |
//! |------------|------------|----------|
//! | Database (any code) | `Rejected` | Permission, constraint or quota errors |
//! | Io / Tls / PoolTimedOut / PoolClosed | `Unavailable` | Network or connection failures |
//! | ColumnDecode / Decode | `Decode` | Stored body is not a JSON object |
//! | Other | `Unavailable` | Anything else the driver reports |

use std::sync::Arc;

use serde_json::Value as JsonValue;
use sqlx::{PgPool, Row};
use tracing::instrument;

use super::r#trait::{Document, DocumentStore, StoreError, StoredDocument};

/// Postgres-backed document store.
///
/// Uses the SQLx connection pool, which is `Send + Sync` and cheap to share.
/// Each trait call is a single statement; nothing spans calls.
#[derive(Debug, Clone)]
pub struct PostgresDocumentStore {
    pool: Arc<PgPool>,
}

impl PostgresDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Connect to `database_url` and make sure the documents table exists.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Create the documents table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                collection  TEXT        NOT NULL,
                key         TEXT        NOT NULL,
                body        JSONB       NOT NULL,
                updated_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
                PRIMARY KEY (collection, key)
            )
            "#,
        )
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }
}

fn body_from_json(key: &str, value: JsonValue) -> Result<Document, StoreError> {
    match value {
        JsonValue::Object(map) => Ok(map),
        other => Err(StoreError::Decode(format!(
            "document '{key}' body is not an object: {other}"
        ))),
    }
}

#[async_trait::async_trait]
impl DocumentStore for PostgresDocumentStore {
    #[instrument(skip(self), fields(store = "postgres"))]
    async fn list(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT key, body
            FROM documents
            WHERE collection = $1
            ORDER BY key ASC
            "#,
        )
        .bind(collection)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list", e))?;

        let mut docs = Vec::with_capacity(rows.len());
        for row in rows {
            let key: String = row
                .try_get("key")
                .map_err(|e| map_sqlx_error("list", e))?;
            let body: JsonValue = row
                .try_get("body")
                .map_err(|e| map_sqlx_error("list", e))?;
            let body = body_from_json(&key, body)?;
            docs.push(StoredDocument::new(key, body));
        }
        Ok(docs)
    }

    #[instrument(skip(self), fields(store = "postgres"))]
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT body
            FROM documents
            WHERE collection = $1 AND key = $2
            "#,
        )
        .bind(collection)
        .bind(key)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get", e))?;

        match row {
            Some(row) => {
                let body: JsonValue = row
                    .try_get("body")
                    .map_err(|e| map_sqlx_error("get", e))?;
                Ok(Some(body_from_json(key, body)?))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self, body), fields(store = "postgres"))]
    async fn upsert(&self, collection: &str, key: &str, body: Document) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO documents (collection, key, body, updated_at)
            VALUES ($1, $2, $3, now())
            ON CONFLICT (collection, key)
            DO UPDATE SET body = EXCLUDED.body, updated_at = now()
            "#,
        )
        .bind(collection)
        .bind(key)
        .bind(JsonValue::Object(body))
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("upsert", e))?;
        Ok(())
    }

    #[instrument(skip(self), fields(store = "postgres"))]
    async fn delete(&self, collection: &str, key: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM documents WHERE collection = $1 AND key = $2")
            .bind(collection)
            .bind(key)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;
        Ok(())
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let code = db_err
                .code()
                .map(|c| c.into_owned())
                .unwrap_or_else(|| "database".to_string());
            StoreError::rejected(
                code,
                format!("database error in {}: {}", operation, db_err.message()),
            )
        }
        sqlx::Error::Io(e) => StoreError::Unavailable(format!("io error in {}: {}", operation, e)),
        sqlx::Error::Tls(e) => {
            StoreError::Unavailable(format!("tls error in {}: {}", operation, e))
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("connection pool timed out in {}", operation))
        }
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {}", operation))
        }
        sqlx::Error::ColumnDecode { index, source } => StoreError::Decode(format!(
            "column {} in {}: {}",
            index, operation, source
        )),
        sqlx::Error::Decode(e) => StoreError::Decode(format!("{} in {}", e, operation)),
        other => StoreError::Unavailable(format!("sqlx error in {}: {}", operation, other)),
    }
}
