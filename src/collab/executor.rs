use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::model::{Algorithm, Dataset};
use crate::store::StoreResult;

/// Payload produced by running an algorithm against a dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionOutput {
    pub payload: serde_json::Value,
}

#[async_trait::async_trait]
pub trait Executor: Send + Sync {
    async fn execute(&self, algorithm: &Algorithm, dataset: &Dataset) -> StoreResult<ExecutionOutput>;
}

/// Stand-in executor: completes immediately with a digest of both payloads
#[derive(Debug, Clone, Default)]
pub struct MockExecutor;

#[async_trait::async_trait]
impl Executor for MockExecutor {
    async fn execute(&self, algorithm: &Algorithm, dataset: &Dataset) -> StoreResult<ExecutionOutput> {
        let mut hasher = Sha256::new();
        hasher.update(algorithm.blob.as_bytes());
        hasher.update(dataset.blob.as_bytes());
        let digest = hex::encode(hasher.finalize());

        log::info!(
            "executing algorithm {} on dataset {}",
            algorithm.algorithm_id,
            dataset.dataset_id
        );

        Ok(ExecutionOutput {
            payload: serde_json::json!({
                "status": "completed",
                "algorithmId": algorithm.algorithm_id,
                "datasetId": dataset.dataset_id,
                "digest": digest,
            }),
        })
    }
}
