//! Reports built on top of the summary engine.
//!
//! - [`weekly`] - Week-over-week report for one account: headline metrics, best/worst movers, top posts
//! - [`week`] - Week labels, date formatting and the weekly report calendar

mod week;
mod weekly;

pub use week::{first_monday, format_date, last_report_date, report_dates, week_label, Trend};
pub use weekly::{
    latest_rows, rows_by_rank, AccountFigure, MetricSection, ReportError, TopPost, WeeklyReport,
};
