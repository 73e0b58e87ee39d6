use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An animal outcome record as returned by the API.
///
/// Field names follow the columns of the `animals` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animal {
    /// Record number assigned by the store
    pub rec_num: i64,
    /// Shelter-assigned animal identifier (e.g. "A123456")
    pub animal_id: String,
    pub animal_type: String,
    pub breed: String,
    pub color: String,
    /// ISO date (YYYY-MM-DD)
    pub date_of_birth: NaiveDate,
    /// ISO date (YYYY-MM-DD) of the outcome event
    pub date_of_outcome: NaiveDate,
    pub name: Option<String>,
    pub outcome_subtype: Option<String>,
    pub outcome_type: Option<String>,
    pub sex_upon_outcome: String,
    pub location_lat: f64,
    pub location_long: f64,
    /// Human readable age, e.g. "2 years" or "3 months"
    pub age_upon_outcome: Option<String>,
    /// Whole weeks between birth and outcome
    pub age_upon_outcome_in_weeks: Option<i64>,
}

/// Body of `POST /animals/` and `PUT /animals/{id}`.
///
/// Updates are full replacements, so both operations share one shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalRequest {
    pub animal_id: String,
    pub animal_type: String,
    pub breed: String,
    pub color: String,
    pub date_of_birth: NaiveDate,
    pub date_of_outcome: NaiveDate,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub outcome_subtype: Option<String>,
    #[serde(default)]
    pub outcome_type: Option<String>,
    pub sex_upon_outcome: String,
    pub location_lat: f64,
    pub location_long: f64,
}

/// Filters and pagination for `GET /animals/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimalListRequest {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    pub animal_type: Option<String>,
    /// Any of these breeds matches; empty means no breed filter
    #[serde(default)]
    pub breed: Vec<String>,
    pub sex_upon_outcome: Option<String>,
    /// Inclusive lower bound on `age_upon_outcome_in_weeks`
    pub min_age: Option<i64>,
    /// Inclusive upper bound on `age_upon_outcome_in_weeks`
    pub max_age: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteAnimalResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadCsvResponse {
    pub message: String,
    #[serde(rename = "insertedCount")]
    pub inserted_count: usize,
    pub file_path: String,
}

/// Machine readable error category carried in every error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    NotFound,
    InvalidFileType,
    MalformedInput,
    SchemaViolation,
    BulkInsertFailure,
    ValidationError,
    UploadPersistFailure,
    StorageFailure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::NotFound => "NotFound",
            ErrorKind::InvalidFileType => "InvalidFileType",
            ErrorKind::MalformedInput => "MalformedInput",
            ErrorKind::SchemaViolation => "SchemaViolation",
            ErrorKind::BulkInsertFailure => "BulkInsertFailure",
            ErrorKind::ValidationError => "ValidationError",
            ErrorKind::UploadPersistFailure => "UploadPersistFailure",
            ErrorKind::StorageFailure => "StorageFailure",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub kind: ErrorKind,
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}
