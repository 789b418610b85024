use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::api::error::{unauthorized, unavailable, ApiError};
use crate::app::AppState;
use crate::model::{Caller, ResourceKind, Subject, User};
use crate::store::StoreError;

/// Axum extractor for the verified token subject.
///
/// Requires `Authorization: Bearer <token>` and a token the identity
/// collaborator accepts; anything else is 401.
#[async_trait]
impl FromRequestParts<AppState> for Subject {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(&parts.headers) else {
            log::debug!("request without bearer token");
            return Err(unauthorized("Missing bearer token"));
        };

        match state.identity.verify(&token).await {
            Ok(Some(subject)) => Ok(Subject::new(subject)),
            Ok(None) => Err(unauthorized("Invalid identity token")),
            Err(e) => {
                log::warn!("identity verifier unavailable: {}", e);
                Err(unauthorized("Identity could not be verified"))
            }
        }
    }
}

/// Axum extractor for a subject that is also a registered user
#[async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let subject = Subject::from_request_parts(parts, state).await?;

        match state.store.get(ResourceKind::User, &subject.user_id).await {
            Ok(Some(record)) => {
                let user: User = serde_json::from_value(serde_json::Value::Object(record))
                    .map_err(|e| unavailable("user", &StoreError::from(e)))?;
                Ok(Caller::new(user))
            }
            Ok(None) => {
                log::warn!("token subject {} has no user record", subject.user_id);
                Err(unauthorized("Unknown user"))
            }
            Err(e) => Err(unavailable("user", &e)),
        }
    }
}

/// Token from an `Authorization: Bearer <token>` header
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = extract_header_value(headers, AUTHORIZATION.as_str())?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// Extract header value as string
fn extract_header_value(headers: &HeaderMap, header_name: &str) -> Option<String> {
    headers
        .get(header_name)
        .and_then(|value| value.to_str().ok())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(auth: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(auth));
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")), Some("abc.def".to_string()));
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&headers("bearerabc")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
