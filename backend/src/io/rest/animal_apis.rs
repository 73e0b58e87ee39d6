//! # REST API for Animal Outcome Records
//!
//! CRUD endpoints plus the filtered listing under `/animals/`.

use std::str::FromStr;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, RawQuery, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use tracing::{error, info};
use url::form_urlencoded;

use crate::io::rest::error::validation_error;
use crate::io::rest::mappers::AnimalMapper;
use crate::AppState;
use shared::{AnimalListRequest, AnimalRequest, DeleteAnimalResponse};

/// Create a router for animal record APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/animals/", get(list_animals).post(create_animal))
        .route(
            "/animals/:id",
            get(get_animal).put(update_animal).delete(delete_animal),
        )
}

/// Create a new record
pub async fn create_animal(
    State(state): State<AppState>,
    body: Result<Json<AnimalRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return validation_error(rejection.body_text()),
    };
    info!("POST /animals/ - animal_id: {}", request.animal_id);

    match state.animal_service.create_animal(AnimalMapper::to_domain(request)).await {
        Ok(record) => (StatusCode::CREATED, Json(AnimalMapper::to_dto(record))).into_response(),
        Err(e) => {
            error!("Failed to create animal: {}", e);
            e.into_response()
        }
    }
}

pub async fn get_animal(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Response {
    let Path(id) = match id {
        Ok(id) => id,
        Err(rejection) => return validation_error(rejection.body_text()),
    };
    info!("GET /animals/{}", id);

    match state.animal_service.get_animal(id).await {
        Ok(record) => (StatusCode::OK, Json(AnimalMapper::to_dto(record))).into_response(),
        Err(e) => {
            error!("Failed to get animal {}: {}", id, e);
            e.into_response()
        }
    }
}

/// List records matching the query string filters, paginated
pub async fn list_animals(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    info!("GET /animals/ - query: {:?}", query);

    let request = match parse_list_request(query.as_deref()) {
        Ok(request) => request,
        Err(detail) => return validation_error(detail),
    };

    match state
        .animal_service
        .list_animals(AnimalMapper::to_list_query(request))
        .await
    {
        Ok(records) => (StatusCode::OK, Json(AnimalMapper::to_dto_list(records))).into_response(),
        Err(e) => {
            error!("Failed to list animals: {}", e);
            e.into_response()
        }
    }
}

/// Replace an existing record
pub async fn update_animal(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<AnimalRequest>, JsonRejection>,
) -> Response {
    let Path(id) = match id {
        Ok(id) => id,
        Err(rejection) => return validation_error(rejection.body_text()),
    };
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return validation_error(rejection.body_text()),
    };
    info!("PUT /animals/{} - animal_id: {}", id, request.animal_id);

    match state
        .animal_service
        .update_animal(id, AnimalMapper::to_domain(request))
        .await
    {
        Ok(record) => (StatusCode::OK, Json(AnimalMapper::to_dto(record))).into_response(),
        Err(e) => {
            error!("Failed to update animal {}: {}", id, e);
            e.into_response()
        }
    }
}

pub async fn delete_animal(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Response {
    let Path(id) = match id {
        Ok(id) => id,
        Err(rejection) => return validation_error(rejection.body_text()),
    };
    info!("DELETE /animals/{}", id);

    match state.animal_service.delete_animal(id).await {
        Ok(()) => {
            let response = DeleteAnimalResponse {
                message: "Animal deleted successfully".to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to delete animal {}: {}", id, e);
            e.into_response()
        }
    }
}

/// Parse the listing query string. `breed` may repeat; blank values and
/// unknown keys are ignored.
fn parse_list_request(query: Option<&str>) -> Result<AnimalListRequest, String> {
    let mut request = AnimalListRequest::default();
    let Some(query) = query else {
        return Ok(request);
    };

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match key.as_ref() {
            "skip" => request.skip = Some(parse_count(&key, value)?),
            "limit" => request.limit = Some(parse_count(&key, value)?),
            "animal_type" => request.animal_type = Some(value.to_string()),
            "breed" => request.breed.push(value.to_string()),
            "sex_upon_outcome" => request.sex_upon_outcome = Some(value.to_string()),
            "min_age" => request.min_age = Some(i64::from(parse_count::<u32>(&key, value)?)),
            "max_age" => request.max_age = Some(i64::from(parse_count::<u32>(&key, value)?)),
            _ => {}
        }
    }
    Ok(request)
}

fn parse_count<T: FromStr>(key: &str, value: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("{} must be a non-negative integer, got '{}'", key, value))
}
