use axum::{body::Bytes, extract::State, http::StatusCode, response::Json};

use crate::api::error::{malformed, unavailable, ApiError};
use crate::app::AppState;
use crate::model::{Caller, Document, ResourceKind, Subject, User, UserUpdate};
use crate::store::StoreError;

/// GET /user/
/// The caller's own user record
pub async fn get_user(caller: Caller) -> Json<User> {
    Json(caller.user)
}

/// POST /user/
/// Register the token subject, or replace its record. The id always comes
/// from the token, never from the body.
pub async fn upsert_user(
    State(ctx): State<AppState>,
    subject: Subject,
    body: Bytes,
) -> Result<Json<User>, ApiError> {
    let update: UserUpdate = if body.is_empty() {
        UserUpdate::default()
    } else {
        serde_json::from_slice(&body).map_err(|_| malformed("user"))?
    };

    let existing: Option<User> = match ctx.store.get(ResourceKind::User, &subject.user_id).await {
        Ok(Some(record)) => Some(
            serde_json::from_value(serde_json::Value::Object(record))
                .map_err(|e| unavailable("user", &StoreError::from(e)))?,
        ),
        Ok(None) => None,
        Err(e) => return Err(unavailable("user", &e)),
    };

    let now = chrono::Utc::now();
    let mut user = existing.unwrap_or_else(|| User::new(subject.user_id.clone()));
    if let Some(status) = update.user_status {
        user.user_status = status;
    }
    user.created_at = user.created_at.or(Some(now));
    user.updated_at = Some(now);

    let record = to_document(&user).map_err(|e| unavailable("user", &e))?;
    ctx.store
        .put(ResourceKind::User, &user.user_id, record)
        .await
        .map_err(|e| unavailable("user", &e))?;

    log::info!("registered user {}", user.user_id);
    Ok(Json(user))
}

/// DELETE /user/
/// Remove the caller's record; resources they own are left in place
pub async fn delete_user(
    State(ctx): State<AppState>,
    caller: Caller,
) -> Result<StatusCode, ApiError> {
    ctx.store
        .delete(ResourceKind::User, caller.user_id())
        .await
        .map_err(|e| unavailable("user", &e))?;

    log::info!("deleted user {}", caller.user_id());
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) fn to_document<T: serde::Serialize>(value: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(value)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(StoreError::Malformed(format!("expected an object, got {}", other))),
    }
}
