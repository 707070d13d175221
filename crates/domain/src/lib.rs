//! Domain layer for the weather station service
//!
//! Contains the reading entity, value objects, unit conversions, and domain
//! errors. This layer has no I/O and defines the ubiquitous language.

pub mod entities;
pub mod errors;
pub mod units;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
