//! Aggregation engine over the parsed transfer records.

pub mod queries;

pub use queries::*;
