//! Reporting utilities: formatted terminal output for every page.

pub mod format;

pub use format::*;
