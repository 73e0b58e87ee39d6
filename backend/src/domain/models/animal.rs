//! Domain model for an animal outcome record.
use chrono::{Datelike, NaiveDate};

use crate::domain::age::{compute_age, AgeUponOutcome};

/// Mutable attributes of an outcome record. Everything except the record id.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimalDetails {
    pub external_id: String,
    pub animal_type: String,
    pub breed: String,
    pub color: String,
    pub date_of_birth: NaiveDate,
    pub date_of_outcome: NaiveDate,
    pub name: Option<String>,
    pub outcome_subtype: Option<String>,
    pub outcome_type: Option<String>,
    pub sex_upon_outcome: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Years outside this range have no `YYYY-MM-DD` form and SQLite's date
/// functions cannot read them.
pub const SUPPORTED_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

/// A stored outcome record. `record_id` is assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimalRecord {
    pub record_id: i64,
    pub details: AnimalDetails,
}

impl AnimalRecord {
    pub fn new(record_id: i64, details: AnimalDetails) -> Self {
        Self { record_id, details }
    }

    /// Derived age fields, recomputed from the stored dates on every call.
    pub fn age_upon_outcome(&self) -> AgeUponOutcome {
        compute_age(
            Some(self.details.date_of_birth),
            Some(self.details.date_of_outcome),
        )
    }
}

impl AnimalDetails {
    /// Check the invariants every stored record must satisfy.
    ///
    /// Outcome dates before the birth date are accepted; the age fields then
    /// come out negative (weeks) or as "0 years".
    pub fn validate(&self) -> Result<(), AnimalValidationError> {
        if self.external_id.trim().is_empty() {
            return Err(AnimalValidationError::EmptyField("animal_id"));
        }
        if self.animal_type.trim().is_empty() {
            return Err(AnimalValidationError::EmptyField("animal_type"));
        }
        for (field, date) in [
            ("date_of_birth", self.date_of_birth),
            ("date_of_outcome", self.date_of_outcome),
        ] {
            if !SUPPORTED_YEARS.contains(&date.year()) {
                return Err(AnimalValidationError::DateOutOfRange(field, date));
            }
        }
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(AnimalValidationError::LatitudeOutOfRange(self.latitude));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(AnimalValidationError::LongitudeOutOfRange(self.longitude));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnimalValidationError {
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),
    #[error("{0} must be between 0000-01-01 and 9999-12-31, got {1}")]
    DateOutOfRange(&'static str, NaiveDate),
    #[error("location_lat must be between -90 and 90, got {0}")]
    LatitudeOutOfRange(f64),
    #[error("location_long must be between -180 and 180, got {0}")]
    LongitudeOutOfRange(f64),
}
