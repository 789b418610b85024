use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{optional_string_or_number, Document, Id, Resource};
use crate::store::{DocumentStore, SearchIndex, StoreError};

/// Result of one side of a dual write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteOutcome {
    Ok,
    /// The service answered with an error
    Rejected,
    /// The service could not be reached
    Unreachable,
    /// Not attempted because the preceding write failed
    Skipped,
}

impl WriteOutcome {
    pub fn code(&self) -> u8 {
        match self {
            WriteOutcome::Ok => 0,
            WriteOutcome::Rejected => 1,
            WriteOutcome::Unreachable | WriteOutcome::Skipped => 2,
        }
    }

    fn from_result<T>(result: &Result<T, StoreError>) -> Self {
        match result {
            Ok(_) => WriteOutcome::Ok,
            Err(StoreError::Unreachable(_)) => WriteOutcome::Unreachable,
            Err(_) => WriteOutcome::Rejected,
        }
    }
}

/// Outcome of writing (or deleting) both the index projection and the record.
///
/// There is no rollback: an index write that succeeds followed by a failed
/// record write leaves the projection visible in search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DualWriteStatus {
    pub index: WriteOutcome,
    pub record: WriteOutcome,
}

impl DualWriteStatus {
    /// `index + 10 * record`; zero on full success
    pub fn code(&self) -> u8 {
        self.index.code() + 10 * self.record.code()
    }

    pub fn is_success(&self) -> bool {
        self.code() == 0
    }

    /// Exactly one side was applied
    pub fn is_partial(&self) -> bool {
        (self.index == WriteOutcome::Ok) != (self.record == WriteOutcome::Ok)
    }
}

/// Result of reading a resource back from both services
#[derive(Debug)]
pub enum ReadOutcome<R> {
    Found(R),
    IndexMissing,
    RecordMissing,
    Failed(StoreError),
}

impl<R> ReadOutcome<R> {
    pub fn found(self) -> Option<R> {
        match self {
            ReadOutcome::Found(r) => Some(r),
            _ => None,
        }
    }
}

/// The parts of a durable record the ownership gate needs
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExistingRecord {
    #[serde(rename = "userId", default, deserialize_with = "optional_string_or_number")]
    pub owner_id: Option<Id>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Keeps a resource's search projection and durable record in step
pub struct DualWriter<'a> {
    index: &'a dyn SearchIndex,
    store: &'a dyn DocumentStore,
}

impl<'a> DualWriter<'a> {
    pub fn new(index: &'a dyn SearchIndex, store: &'a dyn DocumentStore) -> Self {
        Self { index, store }
    }

    /// Index first; the record is written only if indexing succeeded
    pub async fn save<R: Resource>(&self, resource: &R) -> Result<DualWriteStatus, StoreError> {
        let (projection, record) = resource.split()?;
        let id = resource.id();

        let indexed = self.index.put(R::KIND, id, projection).await;
        let index = WriteOutcome::from_result(&indexed);
        let record = if index == WriteOutcome::Ok {
            let stored = self.store.put(R::KIND, id, record).await;
            WriteOutcome::from_result(&stored)
        } else {
            WriteOutcome::Skipped
        };

        let status = DualWriteStatus { index, record };
        if status.is_success() {
            log::info!("saved {} {}", R::KIND, id);
        } else {
            log::warn!(
                "dual write of {} {} incomplete (status {}): index {:?}, record {:?}",
                R::KIND,
                id,
                status.code(),
                indexed.err(),
                status.record
            );
        }
        Ok(status)
    }

    /// Fetch the projection, then the record, and merge them
    pub async fn load<R: Resource>(&self, id: &str) -> ReadOutcome<R> {
        let projection = match self.index.get(R::KIND, id).await {
            Ok(Some(projection)) => projection,
            Ok(None) => return ReadOutcome::IndexMissing,
            Err(e) => return ReadOutcome::Failed(e),
        };
        let record = match self.store.get(R::KIND, id).await {
            Ok(Some(record)) => record,
            Ok(None) => return ReadOutcome::RecordMissing,
            Err(e) => return ReadOutcome::Failed(e),
        };

        match R::merge(projection, record) {
            Ok(resource) => ReadOutcome::Found(resource),
            Err(e) => ReadOutcome::Failed(e.into()),
        }
    }

    /// Remove the projection first so the resource leaves search results,
    /// then the record
    pub async fn remove<R: Resource>(&self, id: &str) -> DualWriteStatus {
        let removed = self.index.delete(R::KIND, id).await;
        let index = WriteOutcome::from_result(&removed);
        let record = if index == WriteOutcome::Ok {
            WriteOutcome::from_result(&self.store.delete(R::KIND, id).await)
        } else {
            WriteOutcome::Skipped
        };

        let status = DualWriteStatus { index, record };
        if status.is_success() {
            log::info!("deleted {} {}", R::KIND, id);
        } else {
            log::warn!(
                "delete of {} {} incomplete (status {})",
                R::KIND,
                id,
                status.code()
            );
        }
        status
    }

    /// Projections of kind `R` matching any tag
    pub async fn search<R: Resource>(&self, tags: &[String]) -> Result<Vec<Document>, StoreError> {
        self.index.query(R::KIND, tags).await
    }

    /// Owner and creation time of the stored record, if one exists
    pub async fn existing<R: Resource>(&self, id: &str) -> Result<Option<ExistingRecord>, StoreError> {
        match self.store.get(R::KIND, id).await? {
            Some(record) => Ok(Some(serde_json::from_value(serde_json::Value::Object(
                record,
            ))?)),
            None => Ok(None),
        }
    }
}
