use anyhow::Context;
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool, Row};

use crate::model::{Document, ResourceKind};
use crate::store::traits::DocumentStore;
use crate::store::{StoreError, StoreResult};

/// Document store backed by a single PostgreSQL table of JSONB bodies
#[derive(Debug, Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Create the documents table if it does not exist yet
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                kind TEXT NOT NULL,
                id TEXT NOT NULL,
                body JSONB NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                PRIMARY KEY (kind, id)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create documents table")?;

        Ok(())
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn put(&self, kind: ResourceKind, id: &str, record: Document) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO documents (kind, id, body, updated_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (kind, id) DO UPDATE SET
                body = EXCLUDED.body,
                updated_at = NOW()
            "#,
        )
        .bind(kind.as_str())
        .bind(id)
        .bind(Json(Value::Object(record)))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, kind: ResourceKind, id: &str) -> StoreResult<Option<Document>> {
        let row = sqlx::query("SELECT body FROM documents WHERE kind = $1 AND id = $2")
            .bind(kind.as_str())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let Json(body): Json<Value> = row.try_get("body")?;
        match body {
            Value::Object(record) => Ok(Some(record)),
            other => Err(StoreError::Malformed(format!(
                "{} {} is not a JSON object: {}",
                kind, id, other
            ))),
        }
    }

    async fn delete(&self, kind: ResourceKind, id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE kind = $1 AND id = $2")
            .bind(kind.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
