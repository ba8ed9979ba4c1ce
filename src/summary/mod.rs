//! Time-series summarization engine.
//!
//! A [`Summarizer`] owns one augmented snapshot table and memoizes the
//! comparison tables (`diff`, `pct_change`) requested against it.

mod derive;
mod error;
mod summarizer;
mod table;
mod transform;

pub use error::{Result, SummaryError};
pub use summarizer::{Summarizer, SummaryKey};
pub use table::{Comparison, SummaryTable, TableExport, Values};
