//! # Domain Layer
//!
//! Business rules for animal outcome records:
//! - **age**: derived age fields computed from birth and outcome dates
//! - **query_filter**: listing criteria and pagination
//! - **csv_import**: parsing and atomic bulk import of uploaded CSV files
//! - **animal_service**: the operations the REST layer exposes
//!
//! Services depend on the storage traits only, never on a concrete database.

pub mod age;
pub mod animal_service;
pub mod commands;
pub mod csv_import;
pub mod error;
pub mod models;
pub mod query_filter;

pub use animal_service::AnimalService;
pub use error::AnimalServiceError;
