use chrono::NaiveDate;
use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

use crate::models::{Locale, Metric};

/// Location of the materialized snapshot and post tables.
///
/// Both files hold JSON arrays produced by the collector; the engine never
/// talks to the collector's database directly.
#[derive(Debug, Deserialize, Clone)]
pub struct DataSettings {
    pub snapshots: String,
    #[serde(default)]
    pub posts: Option<String>,
}

/// A numerator/denominator pair that becomes a `{a}_{b}_ratio` column.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct RatioPair {
    pub numerator: Metric,
    pub denominator: Metric,
}

/// Derived columns added to every snapshot table.
#[derive(Debug, Deserialize, Clone)]
pub struct SummarySettings {
    #[serde(default = "default_ratios")]
    pub ratios: Vec<RatioPair>,
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            ratios: default_ratios(),
        }
    }
}

fn default_ratios() -> Vec<RatioPair> {
    vec![
        RatioPair {
            numerator: Metric::Like,
            denominator: Metric::Media,
        },
        RatioPair {
            numerator: Metric::Comments,
            denominator: Metric::Media,
        },
    ]
}

/// Weekly report configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ReportSettings {
    /// Account the report is written for
    pub target_account: String,
    /// Lookback in snapshots (one per day) - default 7
    #[serde(default = "default_period_days")]
    pub period_days: usize,
    /// Number of posts in the top-posts sections - default 3
    #[serde(default = "default_top_posts")]
    pub top_posts: usize,
    /// Report date; the last calendar date on or before the latest snapshot when unset
    #[serde(default)]
    pub report_date: Option<NaiveDate>,
    /// First date of the weekly report calendar; the first Monday of the data when unset
    #[serde(default)]
    pub first_report: Option<NaiveDate>,
    #[serde(default)]
    pub locale: Locale,
}

fn default_period_days() -> usize {
    7
}

fn default_top_posts() -> usize {
    3
}

/// Root application configuration.
///
/// Loaded from `config.yaml` at startup, with `IGTRACK__SECTION__KEY`
/// environment variables taking precedence.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub data: DataSettings,
    #[serde(default)]
    pub summary: SummarySettings,
    pub report: ReportSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::build(
            Config::builder()
                .add_source(File::with_name("config"))
                .add_source(Environment::with_prefix("IGTRACK").separator("__")),
        )
    }

    /// Settings from an in-memory YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Self::build(Config::builder().add_source(File::from_str(yaml, FileFormat::Yaml)))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let s = builder.build()?;

        let settings: Settings = s.try_deserialize()?;

        Ok(settings)
    }
}
