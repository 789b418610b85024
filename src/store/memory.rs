use parking_lot::RwLock;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::model::{Document, ResourceKind};
use crate::store::traits::{DocumentStore, SearchIndex};
use crate::store::StoreResult;

type Key = (ResourceKind, String);

/// Document store kept in process memory, for development and tests
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    records: RwLock<BTreeMap<Key, Document>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn put(&self, kind: ResourceKind, id: &str, record: Document) -> StoreResult<()> {
        self.records.write().insert((kind, id.to_string()), record);
        Ok(())
    }

    async fn get(&self, kind: ResourceKind, id: &str) -> StoreResult<Option<Document>> {
        Ok(self.records.read().get(&(kind, id.to_string())).cloned())
    }

    async fn delete(&self, kind: ResourceKind, id: &str) -> StoreResult<bool> {
        Ok(self.records.write().remove(&(kind, id.to_string())).is_some())
    }
}

/// Search index kept in process memory.
///
/// Matching is case-insensitive on whole words of any string field; a
/// projection matches when any query tag matches.
#[derive(Debug, Default)]
pub struct MemorySearchIndex {
    entries: RwLock<BTreeMap<Key, Document>>,
}

impl MemorySearchIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_any(projection: &Document, tags: &[String]) -> bool {
    let words: Vec<String> = projection
        .values()
        .filter_map(Value::as_str)
        .flat_map(|s| s.split(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();

    tags.iter()
        .map(|t| t.to_lowercase())
        .any(|tag| words.iter().any(|w| *w == tag))
}

#[async_trait::async_trait]
impl SearchIndex for MemorySearchIndex {
    async fn put(&self, kind: ResourceKind, id: &str, projection: Document) -> StoreResult<()> {
        self.entries.write().insert((kind, id.to_string()), projection);
        Ok(())
    }

    async fn get(&self, kind: ResourceKind, id: &str) -> StoreResult<Option<Document>> {
        Ok(self.entries.read().get(&(kind, id.to_string())).cloned())
    }

    async fn query(&self, kind: ResourceKind, tags: &[String]) -> StoreResult<Vec<Document>> {
        let entries = self.entries.read();
        let found = entries
            .iter()
            .filter(|((k, _), _)| *k == kind)
            .filter(|(_, projection)| tags.is_empty() || matches_any(projection, tags))
            .map(|(_, projection)| projection.clone())
            .collect();
        Ok(found)
    }

    async fn delete(&self, kind: ResourceKind, id: &str) -> StoreResult<bool> {
        Ok(self.entries.write().remove(&(kind, id.to_string())).is_some())
    }
}
