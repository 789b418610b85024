use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::model::{string_or_number, Id};

/// Output of running an algorithm against a dataset on behalf of a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    #[serde(rename = "resultSetId")]
    pub result_set_id: Id,
    #[serde(rename = "userId", deserialize_with = "string_or_number")]
    pub user_id: Id,
    #[serde(rename = "algorithmId")]
    pub algorithm_id: Id,
    #[serde(rename = "datasetId")]
    pub dataset_id: Id,
    #[serde(rename = "resultBLOB")]
    pub payload: serde_json::Value,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl ResultSet {
    pub fn new(user_id: Id, algorithm_id: Id, dataset_id: Id, payload: serde_json::Value) -> Self {
        Self {
            result_set_id: result_set_id(&user_id, &algorithm_id, &dataset_id),
            user_id,
            algorithm_id,
            dataset_id,
            payload,
            created_at: Utc::now(),
        }
    }
}

/// Deterministic result-set id: hex SHA-256 over the three ids, each
/// prefixed with its byte length so no content can shift a boundary.
pub fn result_set_id(user_id: &str, algorithm_id: &str, dataset_id: &str) -> Id {
    let mut hasher = Sha256::new();
    for part in [user_id, algorithm_id, dataset_id] {
        hasher.update((part.len() as u64).to_be_bytes());
        hasher.update(part.as_bytes());
    }
    hex::encode(hasher.finalize())
}
