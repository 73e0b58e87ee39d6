// Repository modules
pub mod animal_repository;

// Re-export repository types
pub use animal_repository::{AnimalRepository, AGE_IN_WEEKS_SQL};
