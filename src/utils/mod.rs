//! Utility functions shared by the summary engine and reports.
//!
//! - [`ratio`] - Division helpers that map non-finite results to missing values

mod ratio;

pub use ratio::{percent_change, percent_of, ratio};
