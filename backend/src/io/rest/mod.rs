//! # REST API Interface Layer
//!
//! HTTP endpoints over the animal service. Handlers only translate:
//! request DTOs to domain types, domain results to response DTOs, and
//! `AnimalServiceError` kinds to status codes with a JSON error body.

pub mod animal_apis;
pub mod error;
pub mod mappers;
pub mod upload_apis;
