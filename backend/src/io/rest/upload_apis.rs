//! # REST API for CSV Upload
//!
//! `POST /upload-csv/` takes a multipart form whose `file` field holds a CSV
//! of outcome records. All rows are inserted in one transaction.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::post,
    Router,
};
use shared::{ErrorKind, ErrorResponse, UploadCsvResponse};
use tracing::{debug, error, info};

use crate::domain::commands::uploads::CsvUploadCommand;
use crate::io::rest::error::{error_response, validation_error};
use crate::AppState;

const FILE_FIELD: &str = "file";

pub fn router() -> Router<AppState> {
    Router::new().route("/upload-csv/", post(upload_csv))
}

pub async fn upload_csv(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    info!("POST /upload-csv/");

    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => return validation_error(rejection.body_text()),
    };

    let upload = match read_file_field(&mut multipart).await {
        Ok(Some(upload)) => upload,
        Ok(None) => {
            return validation_error(format!("multipart field '{}' is required", FILE_FIELD))
        }
        Err(e) => {
            error!("Failed to read multipart body: {}", e);
            return multipart_error_response(&e);
        }
    };

    match state.animal_service.import_csv(upload).await {
        Ok(result) => {
            let response = UploadCsvResponse {
                message: "CSV uploaded successfully".to_string(),
                inserted_count: result.inserted_count,
                file_path: result.storage_path.display().to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to import CSV: {}", e);
            e.into_response()
        }
    }
}

/// Read the first `file` field, skipping any other form fields
async fn read_file_field(
    multipart: &mut Multipart,
) -> Result<Option<CsvUploadCommand>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            debug!("Skipping multipart field {:?}", field.name());
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;
        debug!(
            "Received file {:?} ({:?}, {} bytes)",
            file_name,
            content_type,
            bytes.len()
        );

        return Ok(Some(CsvUploadCommand {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        }));
    }
    Ok(None)
}

/// An oversized body keeps its 413; any other multipart failure is a 400.
fn multipart_error_response(e: &MultipartError) -> Response {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        let body = ErrorResponse::new(ErrorKind::MalformedInput, e.body_text());
        return (StatusCode::PAYLOAD_TOO_LARGE, Json(body)).into_response();
    }
    error_response(ErrorKind::MalformedInput, e.body_text())
}
