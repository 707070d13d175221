//! Value Objects - Immutable, identity-less domain primitives

mod reading_id;

pub use reading_id::ReadingId;
