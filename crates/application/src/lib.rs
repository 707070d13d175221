//! Application layer - Use cases and orchestration
//!
//! Turns raw station payloads into readings, defines the storage ports the
//! infrastructure layer implements, and exposes the ingest/query use cases.

pub mod error;
pub mod form_fields;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use form_fields::FormFields;
pub use ports::*;
pub use services::*;
