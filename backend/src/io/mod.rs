//! IO layer: the HTTP interface over the domain services.

pub mod rest;

pub use rest::*;
