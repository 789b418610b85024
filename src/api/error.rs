use axum::{http::StatusCode, response::Json};
use serde::Serialize;

use crate::logic::{DualWriteStatus, ValidationError};
use crate::store::StoreError;

/// JSON error envelope returned by every failing endpoint
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub fields: String,
    pub message: String,
    #[serde(rename = "writeStatus", skip_serializing_if = "Option::is_none")]
    pub write_status: Option<u8>,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

impl ErrorResponse {
    pub fn new(status: StatusCode, fields: &str, message: &str) -> Self {
        Self {
            code: status.as_u16(),
            fields: fields.to_string(),
            message: message.to_string(),
            write_status: None,
        }
    }
}

pub fn api_error(status: StatusCode, fields: &str, message: &str) -> ApiError {
    (status, Json(ErrorResponse::new(status, fields, message)))
}

pub fn malformed(fields: &str) -> ApiError {
    api_error(StatusCode::BAD_REQUEST, fields, "Malformed Data")
}

pub fn invalid(err: ValidationError) -> ApiError {
    api_error(StatusCode::BAD_REQUEST, err.field(), &err.to_string())
}

pub fn unauthorized(message: &str) -> ApiError {
    api_error(StatusCode::UNAUTHORIZED, "Authorization", message)
}

pub fn forbidden(fields: &str) -> ApiError {
    api_error(StatusCode::FORBIDDEN, fields, "Forbidden")
}

pub fn not_found(fields: &str) -> ApiError {
    api_error(StatusCode::NOT_FOUND, fields, "Not Found")
}

pub fn unavailable(fields: &str, err: &StoreError) -> ApiError {
    log::error!("collaborator failure on {}: {}", fields, err);
    api_error(StatusCode::SERVICE_UNAVAILABLE, fields, &err.to_string())
}

/// A dual write or delete that did not complete on both sides
pub fn incomplete_write(fields: &str, status: DualWriteStatus) -> ApiError {
    let mut body = ErrorResponse::new(
        StatusCode::SERVICE_UNAVAILABLE,
        fields,
        &format!(
            "write incomplete: index {:?}, record {:?}",
            status.index, status.record
        ),
    );
    body.write_status = Some(status.code());
    (StatusCode::SERVICE_UNAVAILABLE, Json(body))
}
