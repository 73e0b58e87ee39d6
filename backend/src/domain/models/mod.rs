pub mod animal;

pub use animal::{AnimalDetails, AnimalRecord, AnimalValidationError};
