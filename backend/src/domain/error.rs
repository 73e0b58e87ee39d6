//! Errors surfaced by the domain services.
use shared::ErrorKind;

use crate::domain::models::AnimalValidationError;

#[derive(Debug, thiserror::Error)]
pub enum AnimalServiceError {
    #[error("Animal not found: {0}")]
    NotFound(i64),

    #[error("Invalid file type '{0}', expected text/csv")]
    InvalidFileType(String),

    #[error("Malformed CSV: {0}")]
    MalformedInput(String),

    #[error("CSV is missing required columns: {}", .0.join(", "))]
    SchemaViolation(Vec<String>),

    /// Nothing from the batch was persisted
    #[error("Bulk insert failed, no records were saved: {0:#}")]
    BulkInsertFailure(#[source] anyhow::Error),

    #[error("Invalid request: {0}")]
    ValidationError(String),

    /// The records were committed but the uploaded file could not be saved
    #[error("Inserted {inserted_count} records but failed to save the uploaded file: {source:#}")]
    UploadPersistFailure {
        inserted_count: usize,
        #[source]
        source: anyhow::Error,
    },

    #[error("Storage error: {0:#}")]
    StorageFailure(#[from] anyhow::Error),
}

impl AnimalServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnimalServiceError::NotFound(_) => ErrorKind::NotFound,
            AnimalServiceError::InvalidFileType(_) => ErrorKind::InvalidFileType,
            AnimalServiceError::MalformedInput(_) => ErrorKind::MalformedInput,
            AnimalServiceError::SchemaViolation(_) => ErrorKind::SchemaViolation,
            AnimalServiceError::BulkInsertFailure(_) => ErrorKind::BulkInsertFailure,
            AnimalServiceError::ValidationError(_) => ErrorKind::ValidationError,
            AnimalServiceError::UploadPersistFailure { .. } => ErrorKind::UploadPersistFailure,
            AnimalServiceError::StorageFailure(_) => ErrorKind::StorageFailure,
        }
    }
}

impl From<AnimalValidationError> for AnimalServiceError {
    fn from(error: AnimalValidationError) -> Self {
        AnimalServiceError::ValidationError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_and_kinds() {
        let err = AnimalServiceError::SchemaViolation(vec!["color".to_string(), "breed".to_string()]);
        assert_eq!(err.to_string(), "CSV is missing required columns: color, breed");
        assert_eq!(err.kind(), ErrorKind::SchemaViolation);

        let err: AnimalServiceError = AnimalValidationError::EmptyField("animal_id").into();
        assert_eq!(err.kind(), ErrorKind::ValidationError);
        assert_eq!(err.to_string(), "Invalid request: animal_id cannot be empty");
    }

    #[test]
    fn test_bulk_failure_shows_cause_chain() {
        let cause = anyhow::anyhow!("UNIQUE constraint failed").context("Failed to insert row 3");
        let err = AnimalServiceError::BulkInsertFailure(cause);
        assert_eq!(err.kind(), ErrorKind::BulkInsertFailure);
        assert!(err.to_string().contains("Failed to insert row 3: UNIQUE constraint failed"));
    }
}
