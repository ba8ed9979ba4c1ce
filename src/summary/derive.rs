//! Per-row derived columns added when a summarizer is built.
//!
//! - rank: competition rank by followers within each date
//! - `{a}_{b}_ratio`: counter a over counter b
//! - engagementrate: likes plus comments as a percentage of followers

use chrono::NaiveDate;
use rustc_hash::FxHashMap;

use crate::models::{Metric, Snapshot};
use crate::utils::{percent_of, ratio};

/// Rank accounts by followers, descending, within each date.
///
/// Standard competition ranking: an account's rank is one plus the number of
/// accounts with strictly more followers on the same date, so ties share the
/// lowest rank (1, 2, 2, 4).
pub fn competition_rank(rows: &[Snapshot]) -> Vec<Option<f64>> {
    let mut by_date: FxHashMap<NaiveDate, Vec<u64>> = FxHashMap::default();
    for row in rows {
        by_date.entry(row.date).or_default().push(row.followers_count);
    }
    for followers in by_date.values_mut() {
        followers.sort_unstable_by(|a, b| b.cmp(a));
    }

    rows.iter()
        .map(|row| {
            let followers = &by_date[&row.date];
            let ahead = followers.partition_point(|&f| f > row.followers_count);
            Some((ahead + 1) as f64)
        })
        .collect()
}

/// `numerator_count / denominator_count` per row, missing when the denominator is zero.
pub fn count_ratio(rows: &[Snapshot], numerator: Metric, denominator: Metric) -> Vec<Option<f64>> {
    rows.iter()
        .map(|row| ratio(row.count(numerator) as f64, row.count(denominator) as f64))
        .collect()
}

/// `100 * (like_count + comments_count) / followers_count` per row.
pub fn engagement_rate(rows: &[Snapshot]) -> Vec<Option<f64>> {
    rows.iter()
        .map(|row| {
            percent_of(
                row.like_count.saturating_add(row.comments_count) as f64,
                row.followers_count as f64,
            )
        })
        .collect()
}
