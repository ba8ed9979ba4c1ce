pub mod config;
pub mod data;
pub mod models;
pub mod report;
pub mod summary;
pub mod utils;

pub use config::Settings;
pub use report::WeeklyReport;
pub use summary::{Summarizer, SummaryError, SummaryTable};
