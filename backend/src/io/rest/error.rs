//! Translation of domain errors to HTTP responses.
//!
//! Every failure body is a `shared::ErrorResponse`: `{ "kind", "detail" }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::{ErrorKind, ErrorResponse};

use crate::domain::AnimalServiceError;

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::InvalidFileType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        ErrorKind::MalformedInput => StatusCode::BAD_REQUEST,
        ErrorKind::SchemaViolation | ErrorKind::ValidationError => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::BulkInsertFailure
        | ErrorKind::UploadPersistFailure
        | ErrorKind::StorageFailure => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn error_response(kind: ErrorKind, detail: impl Into<String>) -> Response {
    (status_for(kind), Json(ErrorResponse::new(kind, detail))).into_response()
}

/// A request that failed before reaching the domain: bad JSON, path or query
pub fn validation_error(detail: impl Into<String>) -> Response {
    error_response(ErrorKind::ValidationError, detail)
}

impl IntoResponse for AnimalServiceError {
    fn into_response(self) -> Response {
        error_response(self.kind(), self.to_string())
    }
}
