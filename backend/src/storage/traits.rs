//! # Storage Traits
//!
//! Storage abstraction the domain layer is written against. The SQLite
//! repository is the only implementation shipped, but services only see
//! these traits.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::{AnimalDetails, AnimalRecord};
use crate::domain::query_filter::{AnimalFilter, Pagination};

/// Persistence operations for outcome records.
#[async_trait]
pub trait AnimalStorage: Send + Sync {
    /// Insert a record and return the id the store assigned to it
    async fn insert_animal(&self, details: &AnimalDetails) -> Result<i64>;

    /// Fetch one record by id
    async fn get_animal(&self, record_id: i64) -> Result<Option<AnimalRecord>>;

    /// Records matching `filter`, in insertion order, windowed by `page`.
    /// Filtering happens before the window is applied.
    async fn query_animals(
        &self,
        filter: &AnimalFilter,
        page: Pagination,
    ) -> Result<Vec<AnimalRecord>>;

    /// Replace every mutable field of a record.
    /// Returns false if no record has this id.
    async fn replace_animal(&self, record_id: i64, details: &AnimalDetails) -> Result<bool>;

    /// Delete a record. Returns false if no record has this id.
    async fn delete_animal(&self, record_id: i64) -> Result<bool>;

    /// Insert all records in one transaction. Either every record is stored
    /// and the count is returned, or nothing is stored and an error is returned.
    async fn insert_animals_atomically(&self, batch: &[AnimalDetails]) -> Result<usize>;
}

/// Factory for repositories bound to one storage backend.
pub trait Connection: Send + Sync + Clone {
    type AnimalRepository: AnimalStorage + Clone;

    fn create_animal_repository(&self) -> Self::AnimalRepository;
}
