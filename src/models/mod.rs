mod metric;
mod snapshot;

pub use metric::{Column, Locale, Metric, MetricColumn, SummaryFunc};
pub use snapshot::{Post, Profile, Snapshot};
