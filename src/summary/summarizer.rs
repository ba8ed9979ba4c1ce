use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use log::{debug, info};
use moka::sync::Cache;
use rustc_hash::FxHashSet;

use crate::config::{RatioPair, SummarySettings};
use crate::models::{Column, Metric, MetricColumn, Snapshot, SummaryFunc};

use super::derive::{competition_rank, count_ratio, engagement_rate};
use super::error::{Result, SummaryError};
use super::table::{Comparison, SummaryTable, Values};
use super::transform::{compare, orient, SeriesIndex};

/// Cache key for one comparison table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SummaryKey {
    pub func: SummaryFunc,
    pub period: usize,
}

/// Time-series summarization engine for one loaded snapshot table.
///
/// Built once per data load. Construction augments the table with rank, ratio
/// and engagement-rate columns; comparison tables are computed lazily and
/// memoized per (function, period) for the lifetime of the value.
///
/// The cache coalesces concurrent initializations of the same key, so a
/// summarizer shared across threads still computes each pair at most once.
pub struct Summarizer {
    base: SummaryTable,
    value_columns: Vec<MetricColumn>,
    series: SeriesIndex,
    distinct_dates: usize,
    cache: Cache<SummaryKey, Arc<Comparison>>,
    computations: AtomicUsize,
}

impl Summarizer {
    /// Builds a summarizer with the default like/media and comments/media ratios.
    pub fn new(snapshots: Vec<Snapshot>) -> Result<Self> {
        Self::with_settings(snapshots, &SummarySettings::default())
    }

    pub fn with_settings(mut snapshots: Vec<Snapshot>, settings: &SummarySettings) -> Result<Self> {
        if snapshots.is_empty() {
            return Err(SummaryError::EmptyTable);
        }

        // Stable: rows sharing a date keep the caller's order
        snapshots.sort_by_key(|row| row.date);
        check_unique(&snapshots)?;

        let series = SeriesIndex::build(&snapshots);

        let mut value_columns: Vec<MetricColumn> =
            Metric::ALL.iter().copied().map(MetricColumn::Count).collect();
        let mut values: Vec<Values> = Metric::ALL
            .iter()
            .map(|&metric| {
                snapshots
                    .iter()
                    .map(|row| Some(row.count(metric) as f64))
                    .collect()
            })
            .collect();

        value_columns.push(MetricColumn::Rank);
        values.push(competition_rank(&snapshots));

        value_columns.push(MetricColumn::EngagementRate);
        values.push(engagement_rate(&snapshots));

        for RatioPair {
            numerator,
            denominator,
        } in dedup_ratios(&settings.ratios)
        {
            value_columns.push(MetricColumn::Ratio {
                numerator,
                denominator,
            });
            values.push(count_ratio(&snapshots, numerator, denominator));
        }

        let rows = Arc::new(snapshots);
        let base = SummaryTable::new(
            rows,
            value_columns
                .iter()
                .map(|&c| Column::Value(c))
                .zip(values)
                .collect(),
        );
        let distinct_dates = base.distinct_dates();

        info!(
            "Summarizer ready: {} rows, {} accounts, {} dates, {} value columns",
            base.len(),
            series.accounts(),
            distinct_dates,
            value_columns.len()
        );

        Ok(Self {
            base,
            value_columns,
            series,
            distinct_dates,
            cache: Cache::builder().build(),
            computations: AtomicUsize::new(0),
        })
    }

    /// The augmented snapshot table without any comparison columns.
    pub fn table(&self) -> &SummaryTable {
        &self.base
    }

    /// Columns that comparisons are computed over, in output order.
    pub fn value_columns(&self) -> &[MetricColumn] {
        &self.value_columns
    }

    pub fn distinct_dates(&self) -> usize {
        self.distinct_dates
    }

    /// Augmented table joined with the comparison columns of every requested
    /// (function, period) pair, in call order.
    ///
    /// Each pair is computed at most once per summarizer. With `fill_missing`
    /// rows that have no snapshot `period` steps back in their account's
    /// history read `0.0`. Values that are undefined for other reasons, such
    /// as growth from zero, stay missing. The cached tables are never filled.
    pub fn get_summaries(
        &self,
        functions: &[SummaryFunc],
        periods: &[usize],
        fill_missing: bool,
    ) -> Result<SummaryTable> {
        self.check_request(functions, periods)?;

        let mut seen: FxHashSet<SummaryKey> = FxHashSet::default();
        let mut table = self.base.clone();
        for &func in functions {
            for &period in periods {
                let key = SummaryKey { func, period };
                if !seen.insert(key) {
                    continue;
                }
                let comparison = self.summarize(key);
                for (column, values) in comparison.columns.iter() {
                    let values = if fill_missing {
                        values
                            .iter()
                            .zip(&comparison.boundary)
                            .map(|(&v, &edge)| if edge { v.or(Some(0.0)) } else { v })
                            .collect()
                    } else {
                        values.clone()
                    };
                    table.push(*column, values);
                }
            }
        }
        Ok(table)
    }

    /// Whether the comparison for `func` over `period` has been computed.
    pub fn is_cached(&self, func: SummaryFunc, period: usize) -> bool {
        self.cache.contains_key(&SummaryKey { func, period })
    }

    /// Number of comparison tables computed so far.
    pub fn computations(&self) -> usize {
        self.computations.load(Ordering::Relaxed)
    }

    fn check_request(&self, functions: &[SummaryFunc], periods: &[usize]) -> Result<()> {
        if functions.is_empty() {
            return Err(SummaryError::InvalidArgument(
                "at least one summary function is required".to_string(),
            ));
        }
        if periods.is_empty() {
            return Err(SummaryError::InvalidArgument(
                "at least one period is required".to_string(),
            ));
        }
        for &period in periods {
            if period == 0 {
                return Err(SummaryError::InvalidArgument(
                    "period must be a positive number of snapshots".to_string(),
                ));
            }
            if period >= self.distinct_dates {
                return Err(SummaryError::InvalidArgument(format!(
                    "period {} needs more than {} distinct dates",
                    period, self.distinct_dates
                )));
            }
        }
        Ok(())
    }

    fn summarize(&self, key: SummaryKey) -> Arc<Comparison> {
        if let Some(cached) = self.cache.get(&key) {
            debug!("Summary cache hit for {}({})", key.func, key.period);
            return cached;
        }
        self.cache.get_with(key, || Arc::new(self.compute(key)))
    }

    fn compute(&self, SummaryKey { func, period }: SummaryKey) -> Comparison {
        let start = Instant::now();

        let columns = self
            .base
            .entries()
            .filter_map(|(column, values)| match *column {
                Column::Value(base) => Some((base, values)),
                _ => None,
            })
            .map(|(base, values)| {
                let mut compared = compare(func, values, &self.series, period);
                orient(base, func, &mut compared);
                (Column::Comparison { base, func, period }, compared)
            })
            .collect();
        let boundary = (0..self.base.len())
            .map(|row| self.series.lagged(row, period).is_none())
            .collect();

        self.computations.fetch_add(1, Ordering::Relaxed);
        info!(
            "Computed {}({}) comparison in {:?} ({} rows)",
            func,
            period,
            start.elapsed(),
            self.base.len()
        );
        Comparison { columns, boundary }
    }
}

fn check_unique(rows: &[Snapshot]) -> Result<()> {
    let mut seen = FxHashSet::default();
    for row in rows {
        if !seen.insert((row.name.as_str(), row.date)) {
            return Err(SummaryError::DuplicateSnapshot {
                name: row.name.clone(),
                date: row.date,
            });
        }
    }
    Ok(())
}

fn dedup_ratios(ratios: &[RatioPair]) -> Vec<RatioPair> {
    let mut unique = Vec::with_capacity(ratios.len());
    for pair in ratios {
        if !unique.contains(pair) {
            unique.push(*pair);
        }
    }
    unique
}
