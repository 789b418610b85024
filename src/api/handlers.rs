use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};

use crate::api::error::{
    forbidden, incomplete_write, invalid, malformed, not_found, unavailable, ApiError,
};
use crate::app::AppState;
use crate::logic::{check_mutation, parse_tags, validate_id, Access, ReadOutcome};
use crate::model::{Caller, Document, Resource};

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub tags: Option<String>,
}

/// GET /algorithms/ and /datasets/
/// Search the index projections, optionally by a comma separated tag list
pub async fn search_resources<R: Resource>(
    State(ctx): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let tags = parse_tags(query.tags.as_deref().unwrap_or_default()).map_err(invalid)?;

    match ctx.writer().search::<R>(&tags).await {
        Ok(found) => Ok(Json(found)),
        Err(e) => Err(unavailable(R::KIND.as_str(), &e)),
    }
}

/// GET /algorithms/{id} and /datasets/{id}
pub async fn get_resource<R: Resource>(
    State(ctx): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<R>, ApiError> {
    let id = validate_id(R::ID_FIELD, &id).map_err(invalid)?;

    match ctx.writer().load::<R>(id).await {
        ReadOutcome::Found(resource) => Ok(Json(resource)),
        ReadOutcome::IndexMissing | ReadOutcome::RecordMissing => Err(not_found(R::ID_FIELD)),
        ReadOutcome::Failed(e) => Err(unavailable(R::KIND.as_str(), &e)),
    }
}

/// POST /algorithms/ and /datasets/
/// Create or wholesale replace a resource owned by the caller
pub async fn upsert_resource<R: Resource>(
    State(ctx): State<AppState>,
    caller: Caller,
    body: Result<Json<R>, JsonRejection>,
) -> Result<Json<R>, ApiError> {
    let Json(mut resource) = body.map_err(|rejection| {
        log::debug!("rejected {} body: {}", R::KIND, rejection);
        malformed(R::KIND.as_str())
    })?;
    validate_id(R::ID_FIELD, resource.id()).map_err(invalid)?;

    let writer = ctx.writer();
    let existing = writer
        .existing::<R>(resource.id())
        .await
        .map_err(|e| unavailable(R::KIND.as_str(), &e))?;

    if check_mutation(&caller, existing.as_ref()) == Access::Forbidden {
        log::warn!(
            "user {} may not replace {} {}",
            caller.user_id(),
            R::KIND,
            resource.id()
        );
        return Err(forbidden(R::ID_FIELD));
    }

    let now = chrono::Utc::now();
    let created_at = existing.and_then(|e| e.created_at).unwrap_or(now);
    resource.set_owner(caller.user_id().to_string());
    resource.stamp(created_at, now);

    let status = writer
        .save(&resource)
        .await
        .map_err(|e| unavailable(R::KIND.as_str(), &e))?;
    if !status.is_success() {
        return Err(incomplete_write(R::KIND.as_str(), status));
    }

    Ok(Json(resource))
}

/// DELETE /algorithms/{id} and /datasets/{id}
pub async fn delete_resource<R: Resource>(
    State(ctx): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = validate_id(R::ID_FIELD, &id).map_err(invalid)?;

    let writer = ctx.writer();
    let existing = writer
        .existing::<R>(id)
        .await
        .map_err(|e| unavailable(R::KIND.as_str(), &e))?;

    match check_mutation(&caller, existing.as_ref()) {
        Access::Create => return Err(not_found(R::ID_FIELD)),
        Access::Forbidden => {
            log::warn!("user {} may not delete {} {}", caller.user_id(), R::KIND, id);
            return Err(forbidden(R::ID_FIELD));
        }
        Access::Owner => {}
    }

    let status = writer.remove::<R>(id).await;
    if !status.is_success() {
        return Err(incomplete_write(R::KIND.as_str(), status));
    }

    Ok(StatusCode::NO_CONTENT)
}
