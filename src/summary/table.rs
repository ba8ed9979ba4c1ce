use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::{Column, Locale, MetricColumn, Snapshot};

/// Values of one column, aligned with the table rows. `None` marks a missing value.
pub type Values = Vec<Option<f64>>;

/// Comparison columns for one (function, period) pair, as stored in the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub columns: Vec<(Column, Values)>,
    /// Rows with no snapshot `period` steps earlier in their account's series.
    pub boundary: Vec<bool>,
}

/// Rows of a table in a fixed column order, ready for CSV or JSON export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableExport {
    pub header: Vec<String>,
    pub labels: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// Snapshot rows joined column-wise with derived and comparison columns.
///
/// Rows are in date order (stable within a date). Every value column has
/// exactly one entry per row.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTable {
    rows: Arc<Vec<Snapshot>>,
    columns: Vec<(Column, Values)>,
}

impl SummaryTable {
    pub(crate) fn new(rows: Arc<Vec<Snapshot>>, columns: Vec<(Column, Values)>) -> Self {
        Self { rows, columns }
    }

    pub(crate) fn push(&mut self, column: Column, values: Values) {
        debug_assert_eq!(values.len(), self.rows.len());
        self.columns.push((column, values));
    }

    /// Numeric columns with their values, in output order.
    pub(crate) fn entries(&self) -> impl Iterator<Item = (&Column, &Values)> {
        self.columns.iter().map(|(column, values)| (column, values))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Snapshot] {
        &self.rows
    }

    /// Numeric columns in output order.
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().map(|(column, _)| column)
    }

    pub fn column(&self, column: &Column) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, values)| values.as_slice())
    }

    /// Value of `column` at `row`; None when the column is absent or the value is missing.
    pub fn value(&self, row: usize, column: &Column) -> Option<f64> {
        self.column(column)?.get(row).copied().flatten()
    }

    /// Most recent snapshot date.
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.rows.iter().map(|row| row.date).max()
    }

    /// Number of distinct snapshot dates.
    pub fn distinct_dates(&self) -> usize {
        let mut dates: Vec<NaiveDate> = self.rows.iter().map(|row| row.date).collect();
        dates.dedup();
        dates.len()
    }

    /// Row indices on `date`, in table order.
    pub fn rows_on(&self, date: NaiveDate) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.date == date)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn row_of(&self, name: &str, date: NaiveDate) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| row.name == name && row.date == date)
    }

    /// Output column names, following the `{metric}_count` / `{stem}_{func}` contract.
    ///
    /// When one call requested several periods, comparison names that would
    /// repeat get a `_{period}` suffix.
    pub fn header(&self) -> Vec<String> {
        let mut names = vec![Column::Name.name(), Column::Date.name()];
        names.extend(self.columns.iter().map(|(column, _)| self.output_name(column)));
        names
    }

    fn output_name(&self, column: &Column) -> String {
        let Column::Comparison { period, .. } = column else {
            return column.name();
        };
        let repeated = self.columns.iter().any(|(other, _)| match other {
            Column::Comparison { period: p, .. } => p != period && other.name() == column.name(),
            _ => false,
        });
        if repeated {
            column.qualified_name()
        } else {
            column.name()
        }
    }

    /// The given rows, in the given order, as value lists aligned with [`header`](Self::header).
    pub fn export(&self, rows: &[usize], locale: Locale) -> TableExport {
        let mut labels = vec![Column::Name.label(locale), Column::Date.label(locale)];
        labels.extend(self.columns.iter().map(|(column, _)| column.label(locale)));

        let rows = rows
            .iter()
            .filter_map(|&i| {
                let row = self.rows.get(i)?;
                let mut cells = Vec::with_capacity(self.columns.len() + 2);
                cells.push(Value::from(row.name.clone()));
                cells.push(Value::from(row.date.format("%Y-%m-%d").to_string()));
                cells.extend(self.columns.iter().map(|(column, values)| cell(column, values[i])));
                Some(cells)
            })
            .collect();

        TableExport {
            header: self.header(),
            labels,
            rows,
        }
    }

    /// One JSON object per row, keyed by output column name, with profile metadata appended.
    ///
    /// Keys are not ordered; use [`export`](Self::export) when column order matters.
    pub fn to_records(&self) -> Vec<Map<String, Value>> {
        let names: Vec<String> = self
            .columns
            .iter()
            .map(|(column, _)| self.output_name(column))
            .collect();

        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let mut record = Map::new();
                record.insert(Column::Name.name(), Value::from(row.name.clone()));
                record.insert(
                    Column::Date.name(),
                    Value::from(row.date.format("%Y-%m-%d").to_string()),
                );
                for ((column, values), name) in self.columns.iter().zip(&names) {
                    record.insert(name.clone(), cell(column, values[i]));
                }
                if let Ok(Value::Object(profile)) = serde_json::to_value(&row.profile) {
                    for (key, value) in profile {
                        record.entry(key).or_insert(value);
                    }
                }
                record
            })
            .collect()
    }
}

fn cell(column: &Column, value: Option<f64>) -> Value {
    match (column, value) {
        (_, None) => Value::Null,
        (Column::Value(MetricColumn::Count(_)), Some(v))
        | (Column::Value(MetricColumn::Rank), Some(v)) => Value::from(v as u64),
        (_, Some(v)) => Value::from(v),
    }
}
