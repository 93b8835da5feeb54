//! Data sources other than the CSV inputs.

pub mod sample;

pub use sample::{generate_demo, MAX_DEMO_DAYS};
