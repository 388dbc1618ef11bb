//! SQLite storage for annotations
//!
//! Each annotation is kept as a JSON document next to a few indexed columns
//! (owner, consumer, timestamps) used for filtering and ordering.

use std::collections::BTreeMap;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use uuid::Uuid;

use super::{AnnotationStore, Result, SearchQuery};
use crate::annotations::Annotation;
use crate::error::StoreError;

/// Annotation store backed by a SQLite pool
#[derive(Clone)]
pub struct SqliteAnnotationStore {
    pool: SqlitePool,
}

impl SqliteAnnotationStore {
    /// Open (creating if missing) the database at `database_url`
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    /// Private in-memory database, used by tests and throwaway instances
    ///
    /// Every SQLite connection to `:memory:` sees its own database, so the
    /// pool is pinned to a single connection that is never recycled.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        let store = Self { pool };
        store.init().await?;
        Ok(store)
    }

    /// Initialize the annotations table
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS annotations (
                id TEXT PRIMARY KEY,
                user_id TEXT,
                consumer TEXT,
                document TEXT NOT NULL,
                created TEXT NOT NULL,
                updated TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_annotations_user ON annotations(user_id);
            CREATE INDEX IF NOT EXISTS idx_annotations_consumer ON annotations(consumer);
            CREATE INDEX IF NOT EXISTS idx_annotations_updated ON annotations(updated);
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl AnnotationStore for SqliteAnnotationStore {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Annotation>> {
        let (conditions, binds) = where_clause(&query.filters);
        let sql = format!(
            "SELECT document FROM annotations{} ORDER BY updated DESC, id ASC LIMIT ? OFFSET ?",
            conditions
        );

        let mut q = sqlx::query_scalar::<_, String>(&sql);
        for value in binds {
            q = q.bind(value);
        }
        let documents = q
            .bind(query.effective_limit())
            .bind(query.effective_offset())
            .fetch_all(&self.pool)
            .await?;

        documents
            .iter()
            .map(|doc| serde_json::from_str(doc).map_err(StoreError::from))
            .collect()
    }

    async fn count(&self, query: &SearchQuery) -> Result<u64> {
        let (conditions, binds) = where_clause(&query.filters);
        let sql = format!("SELECT COUNT(*) FROM annotations{}", conditions);

        let mut q = sqlx::query_scalar::<_, i64>(&sql);
        for value in binds {
            q = q.bind(value);
        }
        let total = q.fetch_one(&self.pool).await?;

        Ok(total.max(0) as u64)
    }

    async fn fetch(&self, id: &str) -> Result<Option<Annotation>> {
        let document =
            sqlx::query_scalar::<_, String>("SELECT document FROM annotations WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        document
            .map(|doc| serde_json::from_str(&doc).map_err(StoreError::from))
            .transpose()
    }

    async fn save(&self, annotation: &mut Annotation) -> Result<()> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

        if annotation.id().is_none() {
            annotation.set_id(Uuid::new_v4().to_string());
        }
        if annotation.created().is_none() {
            annotation.insert("created", now.clone());
        }
        annotation.insert("updated", now.clone());

        let id = annotation.id().ok_or(StoreError::MissingId)?;
        let document = serde_json::to_string(&*annotation)?;

        sqlx::query(
            r#"
            INSERT INTO annotations (id, user_id, consumer, document, created, updated)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                user_id = excluded.user_id,
                consumer = excluded.consumer,
                document = excluded.document,
                updated = excluded.updated
            "#,
        )
        .bind(id)
        .bind(annotation.owner_id())
        .bind(annotation.consumer())
        .bind(&document)
        .bind(annotation.created().unwrap_or(&now))
        .bind(&now)
        .execute(&self.pool)
        .await?;

        tracing::debug!("Saved annotation {}", id);
        Ok(())
    }

    async fn delete(&self, annotation: &Annotation) -> Result<()> {
        let id = annotation.id().ok_or(StoreError::MissingId)?;

        sqlx::query("DELETE FROM annotations WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Deleted annotation {}", id);
        Ok(())
    }
}

/// SQL conditions and bind values for equality filters
///
/// `id`, `user` and `consumer` hit their columns; any other key is a dotted
/// path into the document, matching a scalar by its text form or any scalar
/// element of an array. Booleans compare as `true`/`false`.
fn where_clause(filters: &BTreeMap<String, String>) -> (String, Vec<String>) {
    let mut sql = String::from(" WHERE 1=1");
    let mut binds = Vec::new();

    for (key, value) in filters {
        match key.as_str() {
            "id" => sql.push_str(" AND id = ?"),
            "user" => sql.push_str(" AND user_id = ?"),
            "consumer" => sql.push_str(" AND consumer = ?"),
            _ => {
                // json_each yields a scalar as its only row; objects never match
                sql.push_str(
                    " AND EXISTS (SELECT 1 FROM json_each(annotations.document, ?) AS field \
                     WHERE json_type(annotations.document, ?) <> 'object' \
                     AND CASE field.type \
                         WHEN 'true' THEN 'true' \
                         WHEN 'false' THEN 'false' \
                         ELSE CAST(field.value AS TEXT) END = ?)",
                );
                let path = json_path(key);
                binds.push(path.clone());
                binds.push(path);
            }
        }
        binds.push(value.clone());
    }

    (sql, binds)
}

fn json_path(key: &str) -> String {
    let mut path = String::from("$");
    for segment in key.split('.') {
        path.push_str(".\"");
        path.push_str(&segment.replace('"', ""));
        path.push('"');
    }
    path
}
