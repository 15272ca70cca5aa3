//! Cache Module
//!
//! Typed cache facade and its statistics collector.

mod facade;
mod stats;


// Re-export public types
pub use facade::Cache;
pub use stats::{Stats, SyncStats};
