use crate::model::{Document, ResourceKind};
use crate::store::StoreResult;

/// Durable key/value record storage, keyed by kind and id
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert or replace the record
    async fn put(&self, kind: ResourceKind, id: &str, record: Document) -> StoreResult<()>;
    async fn get(&self, kind: ResourceKind, id: &str) -> StoreResult<Option<Document>>;
    /// Returns false when nothing was stored under the key
    async fn delete(&self, kind: ResourceKind, id: &str) -> StoreResult<bool>;
}

/// Full-text search service holding the queryable projection of each resource
#[async_trait::async_trait]
pub trait SearchIndex: Send + Sync {
    /// Index or re-index a projection
    async fn put(&self, kind: ResourceKind, id: &str, projection: Document) -> StoreResult<()>;
    async fn get(&self, kind: ResourceKind, id: &str) -> StoreResult<Option<Document>>;
    /// Projections matching any of `tags`; every projection of the kind when empty
    async fn query(&self, kind: ResourceKind, tags: &[String]) -> StoreResult<Vec<Document>>;
    async fn delete(&self, kind: ResourceKind, id: &str) -> StoreResult<bool>;
}
