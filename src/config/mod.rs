mod config;

pub use self::config::{DataSettings, RatioPair, ReportSettings, Settings, SummarySettings};
