//! Lagged comparisons within each account's own date-ordered series.

use rustc_hash::FxHashMap;

use crate::models::{MetricColumn, Snapshot, SummaryFunc};
use crate::utils::percent_change;

/// Row positions grouped by account, in table order.
///
/// The table is sorted by date before the index is built, so each group lists
/// one account's rows chronologically.
#[derive(Debug, Clone)]
pub struct SeriesIndex {
    groups: Vec<Vec<usize>>,
    group_of: Vec<usize>,
    position: Vec<usize>,
}

impl SeriesIndex {
    pub fn build(rows: &[Snapshot]) -> Self {
        let mut ids: FxHashMap<&str, usize> = FxHashMap::default();
        let mut groups: Vec<Vec<usize>> = Vec::new();
        let mut group_of = Vec::with_capacity(rows.len());
        let mut position = Vec::with_capacity(rows.len());

        for (i, row) in rows.iter().enumerate() {
            let id = *ids.entry(row.name.as_str()).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            position.push(groups[id].len());
            group_of.push(id);
            groups[id].push(i);
        }

        Self {
            groups,
            group_of,
            position,
        }
    }

    /// Row holding the same account's value `period` snapshots earlier.
    pub fn lagged(&self, row: usize, period: usize) -> Option<usize> {
        let pos = self.position[row];
        if pos < period {
            return None;
        }
        Some(self.groups[self.group_of[row]][pos - period])
    }

    pub fn accounts(&self) -> usize {
        self.groups.len()
    }
}

/// Compare every row of `values` against the same account's row `period` snapshots earlier.
pub fn compare(
    func: SummaryFunc,
    values: &[Option<f64>],
    index: &SeriesIndex,
    period: usize,
) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|row| {
            let past = values[index.lagged(row, period)?]?;
            let current = values[row]?;
            match func {
                SummaryFunc::Diff => Some(current - past),
                SummaryFunc::PctChange => percent_change(current, past),
            }
        })
        .collect()
}

/// Rank 1 is the best position, so a falling rank number is reported as a gain.
pub fn orient(column: MetricColumn, func: SummaryFunc, values: &mut [Option<f64>]) {
    if column != MetricColumn::Rank || func != SummaryFunc::Diff {
        return;
    }
    for value in values.iter_mut().flatten() {
        if *value != 0.0 {
            *value = -*value;
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn rows(names: &[&str]) -> Vec<Snapshot> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let date = NaiveDate::from_ymd_opt(2022, 10, 1).unwrap()
                    + chrono::Duration::days(i as i64);
                Snapshot::new(*name, date, 0, 0, 0, 0, 0)
            })
            .collect()
    }

    #[test]
    fn test_lag_stays_within_account() {
        let index = SeriesIndex::build(&rows(&["a", "b", "a", "b", "a"]));
        assert_eq!(index.accounts(), 2);
        assert_eq!(index.lagged(0, 1), None);
        assert_eq!(index.lagged(2, 1), Some(0));
        assert_eq!(index.lagged(4, 2), Some(0));
        assert_eq!(index.lagged(3, 1), Some(1));
        assert_eq!(index.lagged(3, 2), None);
    }

    #[test]
    fn test_diff_and_pct_change() {
        let index = SeriesIndex::build(&rows(&["a", "a", "a"]));
        let followers = vec![Some(100.0), Some(110.0), Some(105.0)];

        let diff = compare(SummaryFunc::Diff, &followers, &index, 1);
        assert_eq!(diff, vec![None, Some(10.0), Some(-5.0)]);

        let pct = compare(SummaryFunc::PctChange, &followers, &index, 1);
        assert_eq!(pct[0], None);
        assert_eq!(pct[1], Some(10.0));
        assert!((pct[2].unwrap() + 4.545454545454546).abs() < 1e-9);
    }

    #[test]
    fn test_missing_input_propagates() {
        let index = SeriesIndex::build(&rows(&["a", "a", "a"]));
        let ratio = vec![Some(2.0), None, Some(3.0)];
        assert_eq!(
            compare(SummaryFunc::Diff, &ratio, &index, 1),
            vec![None, None, None]
        );
        assert_eq!(
            compare(SummaryFunc::Diff, &ratio, &index, 2),
            vec![None, None, Some(1.0)]
        );
    }

    #[test]
    fn test_rank_diff_is_negated() {
        let mut values = vec![None, Some(-2.0), Some(0.0), Some(1.0)];
        orient(MetricColumn::Rank, SummaryFunc::Diff, &mut values);
        assert_eq!(values, vec![None, Some(2.0), Some(0.0), Some(-1.0)]);

        let mut pct = vec![Some(-50.0)];
        orient(MetricColumn::Rank, SummaryFunc::PctChange, &mut pct);
        assert_eq!(pct, vec![Some(-50.0)]);
    }
}
