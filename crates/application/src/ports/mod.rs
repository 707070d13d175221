//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod database_health_port;
mod reading_store;

pub use database_health_port::{DatabaseHealth, DatabaseHealthPort};
#[cfg(test)]
pub use reading_store::MockReadingStorePort;
pub use reading_store::ReadingStorePort;
