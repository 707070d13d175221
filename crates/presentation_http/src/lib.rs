//! Weather station HTTP presentation layer
//!
//! Axum router, handlers and error mapping for the station API.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod shutdown;
pub mod state;

pub use error::{ApiError, set_expose_internal_errors};
pub use routes::create_router;
pub use state::AppState;
