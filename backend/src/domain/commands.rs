//! Domain-level command and query types
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer maps the public DTOs defined
//! in the `shared` crate to these internal types.

pub mod animals {
    use crate::domain::query_filter::{AnimalFilter, Pagination};

    /// Query for listing outcome records.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct AnimalListQuery {
        pub filter: AnimalFilter,
        pub page: Pagination,
    }
}

pub mod uploads {
    use std::path::PathBuf;

    /// An uploaded CSV file as received from the client.
    #[derive(Debug, Clone)]
    pub struct CsvUploadCommand {
        pub file_name: Option<String>,
        /// Declared media type, e.g. `text/csv; charset=utf-8`
        pub content_type: Option<String>,
        pub bytes: Vec<u8>,
    }

    /// Result of a successful import.
    #[derive(Debug, Clone, PartialEq)]
    pub struct CsvImportResult {
        pub inserted_count: usize,
        pub storage_path: PathBuf,
    }
}
