use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::model::{Document, ResourceKind};

/// A searchable entity that is split between the search index (projection)
/// and the document store (durable record).
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: ResourceKind;
    /// JSON key holding the id; present in both halves
    const ID_FIELD: &'static str;
    /// JSON keys that make up the index projection
    const INDEX_FIELDS: &'static [&'static str];

    fn id(&self) -> &str;
    fn owner_id(&self) -> Option<&str>;
    fn set_owner(&mut self, owner_id: String);
    fn stamp(&mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>);

    /// Split into (index projection, durable record)
    fn split(&self) -> serde_json::Result<(Document, Document)> {
        let Value::Object(fields) = serde_json::to_value(self)? else {
            return Err(serde::ser::Error::custom("resource must serialize to an object"));
        };

        let mut projection = Document::new();
        let mut record = Document::new();
        for (key, value) in fields {
            if key == Self::ID_FIELD {
                projection.insert(key.clone(), value.clone());
                record.insert(key, value);
            } else if Self::INDEX_FIELDS.contains(&key.as_str()) {
                projection.insert(key, value);
            } else {
                record.insert(key, value);
            }
        }
        Ok((projection, record))
    }

    /// Rebuild from both halves; record fields win on collision
    fn merge(mut projection: Document, record: Document) -> serde_json::Result<Self> {
        projection.extend(record);
        serde_json::from_value(Value::Object(projection))
    }
}
