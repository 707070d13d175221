//! HTTP middleware components

pub mod request_id;

pub use request_id::{MakeRequestUuid, REQUEST_ID_HEADER, request_span};
