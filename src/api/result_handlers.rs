use axum::{
    extract::{Path, State},
    response::Json,
};

use crate::api::error::{forbidden, invalid, not_found, unavailable, ApiError};
use crate::api::user_handlers::to_document;
use crate::app::{AppContext, AppState};
use crate::logic::{validate_id, ReadOutcome};
use crate::model::{result_set_id, Algorithm, Caller, Dataset, Resource, ResourceKind, ResultSet};
use crate::store::StoreError;

async fn load_or_404<R: Resource>(ctx: &AppContext, id: &str) -> Result<R, ApiError> {
    match ctx.writer().load::<R>(id).await {
        ReadOutcome::Found(resource) => Ok(resource),
        ReadOutcome::IndexMissing | ReadOutcome::RecordMissing => Err(not_found(R::ID_FIELD)),
        ReadOutcome::Failed(e) => Err(unavailable(R::KIND.as_str(), &e)),
    }
}

async fn fetch_result_set(ctx: &AppContext, id: &str) -> Result<ResultSet, ApiError> {
    match ctx.store.get(ResourceKind::ResultSet, id).await {
        Ok(Some(record)) => serde_json::from_value(serde_json::Value::Object(record))
            .map_err(|e| unavailable("resultSetId", &StoreError::from(e))),
        Ok(None) => Err(not_found("resultSetId")),
        Err(e) => Err(unavailable("resultSetId", &e)),
    }
}

/// POST /results/{algorithm_id}/{dataset_id}
/// Run the algorithm on the dataset and store the caller's result set
pub async fn execute(
    State(ctx): State<AppState>,
    caller: Caller,
    Path((algorithm_id, dataset_id)): Path<(String, String)>,
) -> Result<Json<ResultSet>, ApiError> {
    let algorithm_id = validate_id("algorithmId", &algorithm_id).map_err(invalid)?;
    let dataset_id = validate_id("datasetId", &dataset_id).map_err(invalid)?;

    let algorithm: Algorithm = load_or_404(&ctx, algorithm_id).await?;
    let dataset: Dataset = load_or_404(&ctx, dataset_id).await?;

    let output = ctx
        .executor
        .execute(&algorithm, &dataset)
        .await
        .map_err(|e| unavailable("executor", &e))?;

    let result_set = ResultSet::new(
        caller.user_id().to_string(),
        algorithm.algorithm_id,
        dataset.dataset_id,
        output.payload,
    );
    let record = to_document(&result_set).map_err(|e| unavailable("resultSetId", &e))?;
    ctx.store
        .put(ResourceKind::ResultSet, &result_set.result_set_id, record)
        .await
        .map_err(|e| unavailable("resultSetId", &e))?;

    log::info!(
        "stored result set {} for user {}",
        result_set.result_set_id,
        caller.user_id()
    );
    Ok(Json(result_set))
}

/// GET /results/{algorithm_id}/{dataset_id}
/// The caller's latest result for this pair
pub async fn get_result_for_pair(
    State(ctx): State<AppState>,
    caller: Caller,
    Path((algorithm_id, dataset_id)): Path<(String, String)>,
) -> Result<Json<ResultSet>, ApiError> {
    let algorithm_id = validate_id("algorithmId", &algorithm_id).map_err(invalid)?;
    let dataset_id = validate_id("datasetId", &dataset_id).map_err(invalid)?;

    let id = result_set_id(caller.user_id(), algorithm_id, dataset_id);
    fetch_result_set(&ctx, &id).await.map(Json)
}

/// GET /results/{result_set_id}
pub async fn get_result(
    State(ctx): State<AppState>,
    caller: Caller,
    Path(result_set_id): Path<String>,
) -> Result<Json<ResultSet>, ApiError> {
    let id = validate_id("resultSetId", &result_set_id).map_err(invalid)?;

    let result_set = fetch_result_set(&ctx, id).await?;
    if !caller.owns(Some(result_set.user_id.as_str())) {
        log::warn!("user {} may not read result set {}", caller.user_id(), id);
        return Err(forbidden("resultSetId"));
    }
    Ok(Json(result_set))
}
