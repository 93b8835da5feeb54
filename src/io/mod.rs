//! Input helpers.
//!
//! - CSV ingest + daily aggregation (`ingest`)
//! - memoized dataset (`cache`)

pub mod cache;
pub mod ingest;

pub use cache::*;
pub use ingest::*;
