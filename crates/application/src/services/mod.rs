//! Application services - Use case implementations

pub mod reading_normalizer;
mod station_service;

pub use reading_normalizer::{normalize, normalize_at};
pub use station_service::{NO_READINGS_MESSAGE, StationService, StationStatus, format_uptime};
