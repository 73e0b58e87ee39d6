//! Animal outcome service: CRUD, filtered listing and CSV import.
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::{
    commands::{
        animals::AnimalListQuery,
        uploads::{CsvImportResult, CsvUploadCommand},
    },
    csv_import::CsvImporter,
    error::AnimalServiceError,
    models::{AnimalDetails, AnimalRecord},
};
use crate::storage::{AnimalStorage, Connection, UploadStore};

#[derive(Clone)]
pub struct AnimalService<C: Connection> {
    animal_repository: C::AnimalRepository,
    csv_importer: CsvImporter<C::AnimalRepository>,
}

impl<C: Connection> AnimalService<C> {
    pub fn new(connection: Arc<C>, uploads: UploadStore) -> Self {
        let animal_repository = connection.create_animal_repository();
        let csv_importer = CsvImporter::new(animal_repository.clone(), uploads);
        Self {
            animal_repository,
            csv_importer,
        }
    }

    pub async fn create_animal(
        &self,
        details: AnimalDetails,
    ) -> Result<AnimalRecord, AnimalServiceError> {
        details.validate()?;

        let record_id = self.animal_repository.insert_animal(&details).await?;
        info!("Created animal record {} ({})", record_id, details.external_id);

        Ok(AnimalRecord::new(record_id, details))
    }

    pub async fn get_animal(&self, record_id: i64) -> Result<AnimalRecord, AnimalServiceError> {
        self.animal_repository
            .get_animal(record_id)
            .await?
            .ok_or(AnimalServiceError::NotFound(record_id))
    }

    pub async fn list_animals(
        &self,
        query: AnimalListQuery,
    ) -> Result<Vec<AnimalRecord>, AnimalServiceError> {
        if query.filter.is_empty() {
            debug!(
                "Listing all animals, skip {} limit {}",
                query.page.skip, query.page.limit
            );
        }
        if let (Some(min), Some(max)) = (query.filter.min_age_weeks, query.filter.max_age_weeks) {
            if min > max {
                warn!("min_age {} is greater than max_age {}, no record can match", min, max);
            }
        }

        let records = self
            .animal_repository
            .query_animals(&query.filter, query.page)
            .await?;
        Ok(records)
    }

    /// Replace every mutable field of an existing record
    pub async fn update_animal(
        &self,
        record_id: i64,
        details: AnimalDetails,
    ) -> Result<AnimalRecord, AnimalServiceError> {
        details.validate()?;

        if !self.animal_repository.replace_animal(record_id, &details).await? {
            return Err(AnimalServiceError::NotFound(record_id));
        }
        info!("Updated animal record {}", record_id);

        Ok(AnimalRecord::new(record_id, details))
    }

    pub async fn delete_animal(&self, record_id: i64) -> Result<(), AnimalServiceError> {
        if !self.animal_repository.delete_animal(record_id).await? {
            return Err(AnimalServiceError::NotFound(record_id));
        }
        info!("Deleted animal record {}", record_id);
        Ok(())
    }

    pub async fn import_csv(
        &self,
        upload: CsvUploadCommand,
    ) -> Result<CsvImportResult, AnimalServiceError> {
        let result = self.csv_importer.import(upload).await?;
        info!(
            "Imported {} animal records, file saved to {}",
            result.inserted_count,
            result.storage_path.display()
        );
        Ok(result)
    }
}
