//! Bulk import of outcome records from an uploaded CSV file.
//!
//! The pipeline is: content type check, UTF-8 + CSV parse, header check,
//! row conversion, one atomic batch insert, and finally saving the uploaded
//! bytes. The file is written only once the batch has been committed.

use anyhow::anyhow;
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashMap;
use tracing::{debug, error, info};

use crate::domain::commands::uploads::{CsvImportResult, CsvUploadCommand};
use crate::domain::error::AnimalServiceError;
use crate::domain::models::AnimalDetails;
use crate::storage::{AnimalStorage, UploadStore};

pub const CSV_MEDIA_TYPE: &str = "text/csv";

pub const REQUIRED_COLUMNS: [&str; 9] = [
    "animal_id",
    "animal_type",
    "breed",
    "color",
    "date_of_birth",
    "date_of_outcome",
    "sex_upon_outcome",
    "location_lat",
    "location_long",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone)]
pub struct CsvImporter<S: AnimalStorage + Clone> {
    repository: S,
    uploads: UploadStore,
}

impl<S: AnimalStorage + Clone> CsvImporter<S> {
    pub fn new(repository: S, uploads: UploadStore) -> Self {
        Self { repository, uploads }
    }

    pub async fn import(
        &self,
        upload: CsvUploadCommand,
    ) -> Result<CsvImportResult, AnimalServiceError> {
        check_content_type(upload.content_type.as_deref())?;

        let records = parse_animals(&upload.bytes)?;
        info!(
            "Parsed {} records from {:?}, inserting as one batch",
            records.len(),
            upload.file_name
        );

        let inserted_count = self
            .repository
            .insert_animals_atomically(&records)
            .await
            .map_err(AnimalServiceError::BulkInsertFailure)?;

        let storage_path = self
            .uploads
            .save(upload.file_name.as_deref(), &upload.bytes)
            .await
            .map_err(|source| {
                error!(
                    "{} records committed but the upload could not be saved: {:#}",
                    inserted_count, source
                );
                AnimalServiceError::UploadPersistFailure {
                    inserted_count,
                    source,
                }
            })?;

        Ok(CsvImportResult {
            inserted_count,
            storage_path,
        })
    }
}

/// Accept `text/csv` with any parameters, compared case-insensitively.
fn check_content_type(content_type: Option<&str>) -> Result<(), AnimalServiceError> {
    let declared = content_type.unwrap_or("").trim();
    let essence = declared.split(';').next().unwrap_or("").trim();
    if essence.eq_ignore_ascii_case(CSV_MEDIA_TYPE) {
        Ok(())
    } else {
        Err(AnimalServiceError::InvalidFileType(declared.to_string()))
    }
}

/// Parse and convert the whole file. Nothing is persisted here, so any error
/// leaves the store untouched.
pub fn parse_animals(bytes: &[u8]) -> Result<Vec<AnimalDetails>, AnimalServiceError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| {
            AnimalServiceError::MalformedInput(format!("file is not valid UTF-8: {}", e))
        })?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AnimalServiceError::MalformedInput(e.to_string()))?
        .clone();
    let rows = reader
        .records()
        .collect::<Result<Vec<StringRecord>, csv::Error>>()
        .map_err(|e| AnimalServiceError::MalformedInput(e.to_string()))?;

    let columns = ColumnIndex::new(&headers)?;

    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            columns
                .convert(row)
                .map_err(|e| anyhow!("row {}: {}", index + 1, e))
        })
        .collect::<anyhow::Result<Vec<_>>>()
        .map_err(|e| {
            debug!("Rejecting CSV batch: {:#}", e);
            AnimalServiceError::BulkInsertFailure(e)
        })
}

/// Header name to position lookup for one file.
struct ColumnIndex {
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    fn new(headers: &StringRecord) -> Result<Self, AnimalServiceError> {
        let positions: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(position, name)| (name.to_string(), position))
            .collect();

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|column| !positions.contains_key(**column))
            .map(|column| column.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(AnimalServiceError::SchemaViolation(missing));
        }

        Ok(Self { positions })
    }

    fn value<'r>(&self, row: &'r StringRecord, column: &str) -> Option<&'r str> {
        self.positions.get(column).and_then(|&position| row.get(position))
    }

    fn required(&self, row: &StringRecord, column: &str) -> anyhow::Result<String> {
        self.value(row, column)
            .map(str::to_string)
            .ok_or_else(|| anyhow!("missing value for {}", column))
    }

    fn optional(&self, row: &StringRecord, column: &str) -> Option<String> {
        self.value(row, column)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    fn date(&self, row: &StringRecord, column: &str) -> anyhow::Result<NaiveDate> {
        let value = self.required(row, column)?;
        NaiveDate::parse_from_str(&value, DATE_FORMAT)
            .map_err(|_| anyhow!("invalid {} '{}', expected YYYY-MM-DD", column, value))
    }

    fn float(&self, row: &StringRecord, column: &str) -> anyhow::Result<f64> {
        let value = self.required(row, column)?;
        value
            .parse::<f64>()
            .map_err(|_| anyhow!("invalid {} '{}', expected a number", column, value))
    }

    fn convert(&self, row: &StringRecord) -> anyhow::Result<AnimalDetails> {
        let details = AnimalDetails {
            external_id: self.required(row, "animal_id")?,
            animal_type: self.required(row, "animal_type")?,
            breed: self.required(row, "breed")?,
            color: self.required(row, "color")?,
            date_of_birth: self.date(row, "date_of_birth")?,
            date_of_outcome: self.date(row, "date_of_outcome")?,
            name: self.optional(row, "name"),
            outcome_subtype: self.optional(row, "outcome_subtype"),
            outcome_type: self.optional(row, "outcome_type"),
            sex_upon_outcome: self.required(row, "sex_upon_outcome")?,
            latitude: self.float(row, "location_lat")?,
            longitude: self.float(row, "location_long")?,
        };
        details.validate()?;
        Ok(details)
    }
}
