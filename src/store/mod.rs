//! Annotation storage
//!
//! The HTTP layer only talks to storage through [`AnnotationStore`]; the
//! SQLite implementation is the default backend.

mod sqlite;

pub use sqlite::SqliteAnnotationStore;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::annotations::Annotation;
use crate::error::StoreError;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Page size when a search does not ask for one
pub const DEFAULT_LIMIT: i64 = 20;

/// Storage and search backend for annotations
#[async_trait]
pub trait AnnotationStore: Send + Sync {
    /// Annotations matching the query, one page at a time
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Annotation>>;

    /// Number of annotations matching the filters, ignoring paging
    async fn count(&self, query: &SearchQuery) -> Result<u64>;

    async fn fetch(&self, id: &str) -> Result<Option<Annotation>>;

    /// Insert or replace; assigns `id` and `created` on first save and
    /// refreshes `updated` every time
    async fn save(&self, annotation: &mut Annotation) -> Result<()>;

    async fn delete(&self, annotation: &Annotation) -> Result<()>;
}

/// Search criteria: equality filters plus paging
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub filters: BTreeMap<String, String>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a query from raw query-string pairs
    ///
    /// `offset` and `limit` never fail: unparsable values fall back to 0 and
    /// [`DEFAULT_LIMIT`]. For repeated keys the first value wins.
    pub fn from_params<I>(params: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::new();
        let mut seen = std::collections::HashSet::new();

        for (key, value) in params {
            if !seen.insert(key.clone()) {
                continue;
            }
            match key.as_str() {
                "offset" => query.offset = Some(quiet_int(&value, 0)),
                "limit" => query.limit = Some(quiet_int(&value, DEFAULT_LIMIT)),
                _ => {
                    query.filters.insert(key, value);
                }
            }
        }

        query
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn effective_offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    pub fn effective_limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).max(0)
    }
}

fn quiet_int(value: &str, default: i64) -> i64 {
    value.trim().parse().unwrap_or(default)
}
