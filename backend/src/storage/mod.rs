//! # Storage Module
//!
//! Handles all data persistence for the animal outcomes backend.
//!
//! The domain layer talks to storage only through the traits in [`traits`].
//! The shipped implementation is SQLite via SQLx:
//!
//! - **connection**: pool ownership and schema setup
//! - **repositories**: the outcome record repository, including the SQL twin
//!   of the age-in-weeks calculation used for filtering
//! - **uploads**: name-addressed storage for uploaded CSV files
//!
//! Every operation borrows a pooled connection for its own duration. Batch
//! inserts run inside a single transaction that rolls back when dropped
//! uncommitted.

pub mod connection;
pub mod repositories;
pub mod traits;
pub mod uploads;

// Re-export the main types that other modules need
pub use connection::DbConnection;
pub use repositories::AnimalRepository;
pub use traits::{AnimalStorage, Connection};
pub use uploads::UploadStore;
