use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::summary::SummaryError;

/// Raw counters tracked for every account on every snapshot date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Followers,
    Follows,
    Media,
    Like,
    Comments,
}

impl Metric {
    /// All counters in output column order.
    pub const ALL: [Metric; 5] = [
        Metric::Followers,
        Metric::Follows,
        Metric::Media,
        Metric::Like,
        Metric::Comments,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Followers => "followers",
            Metric::Follows => "follows",
            Metric::Media => "media",
            Metric::Like => "like",
            Metric::Comments => "comments",
        }
    }

    /// Column name of the raw counter, e.g. `followers_count`.
    pub fn column_name(&self) -> String {
        format!("{}_count", self.as_str())
    }

    fn label(&self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::Ko, Metric::Followers) => "팔로워",
            (Locale::Ko, Metric::Follows) => "팔로우",
            (Locale::Ko, Metric::Media) => "게시물",
            (Locale::Ko, Metric::Like) => "좋아요",
            (Locale::Ko, Metric::Comments) => "댓글",
            (Locale::En, Metric::Followers) => "Followers",
            (Locale::En, Metric::Follows) => "Follows",
            (Locale::En, Metric::Media) => "Posts",
            (Locale::En, Metric::Like) => "Likes",
            (Locale::En, Metric::Comments) => "Comments",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison applied to a value column over a lookback period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryFunc {
    Diff,
    PctChange,
}

impl SummaryFunc {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryFunc::Diff => "diff",
            SummaryFunc::PctChange => "pct_change",
        }
    }

    fn label(&self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::Ko, SummaryFunc::Diff) => "증감(수)",
            (Locale::Ko, SummaryFunc::PctChange) => "증감(%)",
            (Locale::En, SummaryFunc::Diff) => "change",
            (Locale::En, SummaryFunc::PctChange) => "change (%)",
        }
    }
}

impl fmt::Display for SummaryFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SummaryFunc {
    type Err = SummaryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "diff" => Ok(SummaryFunc::Diff),
            "pct_change" => Ok(SummaryFunc::PctChange),
            other => Err(SummaryError::InvalidArgument(format!(
                "unsupported summary function '{}' (expected 'diff' or 'pct_change')",
                other
            ))),
        }
    }
}

/// Language used when rendering column labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    Ko,
    En,
}

/// A numeric column that comparisons are computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricColumn {
    Count(Metric),
    Ratio {
        numerator: Metric,
        denominator: Metric,
    },
    EngagementRate,
    Rank,
}

impl MetricColumn {
    /// Column name in the output table.
    pub fn name(&self) -> String {
        match self {
            MetricColumn::Count(metric) => metric.column_name(),
            MetricColumn::Ratio {
                numerator,
                denominator,
            } => format!("{}_{}_ratio", numerator, denominator),
            MetricColumn::EngagementRate => "engagementrate".to_string(),
            MetricColumn::Rank => "rank".to_string(),
        }
    }

    /// Prefix used by comparison columns: the name without `_count`.
    pub fn stem(&self) -> String {
        match self {
            MetricColumn::Count(metric) => metric.as_str().to_string(),
            other => other.name(),
        }
    }

    pub fn label(&self, locale: Locale) -> String {
        match (locale, self) {
            (Locale::Ko, MetricColumn::Count(metric)) => format!("{} 수", metric.label(locale)),
            (Locale::En, MetricColumn::Count(metric)) => metric.label(locale).to_string(),
            (
                Locale::Ko,
                MetricColumn::Ratio {
                    numerator,
                    denominator,
                },
            ) => format!("{} 당 {}", denominator.label(locale), numerator.label(locale)),
            (
                Locale::En,
                MetricColumn::Ratio {
                    numerator,
                    denominator,
                },
            ) => format!(
                "{} per {}",
                numerator.label(locale),
                denominator.label(locale).trim_end_matches('s').to_lowercase()
            ),
            (Locale::Ko, MetricColumn::EngagementRate) => "참여도".to_string(),
            (Locale::En, MetricColumn::EngagementRate) => "Engagement rate".to_string(),
            (Locale::Ko, MetricColumn::Rank) => "순위".to_string(),
            (Locale::En, MetricColumn::Rank) => "Rank".to_string(),
        }
    }

    /// Label without the "count" word, used as the head of comparison labels.
    fn short_label(&self, locale: Locale) -> String {
        match self {
            MetricColumn::Count(metric) => metric.label(locale).to_string(),
            other => other.label(locale),
        }
    }
}

/// Every column a summary table can carry.
///
/// Renderers key on these descriptors instead of pattern-matching names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Name,
    Date,
    Value(MetricColumn),
    Comparison {
        base: MetricColumn,
        func: SummaryFunc,
        period: usize,
    },
}

impl Column {
    pub fn name(&self) -> String {
        match self {
            Column::Name => "name".to_string(),
            Column::Date => "date".to_string(),
            Column::Value(column) => column.name(),
            Column::Comparison { base, func, .. } => format!("{}_{}", base.stem(), func),
        }
    }

    /// Name including the lookback period, e.g. `followers_diff_7`.
    pub fn qualified_name(&self) -> String {
        match self {
            Column::Comparison { period, .. } => format!("{}_{}", self.name(), period),
            other => other.name(),
        }
    }

    pub fn label(&self, locale: Locale) -> String {
        match (locale, self) {
            (Locale::Ko, Column::Name) => "이름".to_string(),
            (Locale::Ko, Column::Date) => "날짜".to_string(),
            (Locale::En, Column::Name) => "Name".to_string(),
            (Locale::En, Column::Date) => "Date".to_string(),
            (_, Column::Value(column)) => column.label(locale),
            (_, Column::Comparison { base, func, .. }) => {
                format!("{} {}", base.short_label(locale), func.label(locale))
            }
        }
    }

    pub fn is_comparison(&self) -> bool {
        matches!(self, Column::Comparison { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn like_per_post() -> MetricColumn {
        MetricColumn::Ratio {
            numerator: Metric::Like,
            denominator: Metric::Media,
        }
    }

    #[test]
    fn test_column_names_follow_contract() {
        assert_eq!(Column::Value(MetricColumn::Count(Metric::Followers)).name(), "followers_count");
        assert_eq!(Column::Value(like_per_post()).name(), "like_media_ratio");
        assert_eq!(Column::Value(MetricColumn::EngagementRate).name(), "engagementrate");

        let followers_diff = Column::Comparison {
            base: MetricColumn::Count(Metric::Followers),
            func: SummaryFunc::Diff,
            period: 1,
        };
        assert_eq!(followers_diff.name(), "followers_diff");
        assert_eq!(followers_diff.qualified_name(), "followers_diff_1");

        let ratio_pct = Column::Comparison {
            base: like_per_post(),
            func: SummaryFunc::PctChange,
            period: 7,
        };
        assert_eq!(ratio_pct.name(), "like_media_ratio_pct_change");

        let rank_diff = Column::Comparison {
            base: MetricColumn::Rank,
            func: SummaryFunc::Diff,
            period: 7,
        };
        assert_eq!(rank_diff.name(), "rank_diff");
    }

    #[test]
    fn test_korean_labels() {
        assert_eq!(
            Column::Value(MetricColumn::Count(Metric::Followers)).label(Locale::Ko),
            "팔로워 수"
        );
        assert_eq!(Column::Value(like_per_post()).label(Locale::Ko), "게시물 당 좋아요");
        assert_eq!(
            Column::Comparison {
                base: MetricColumn::Count(Metric::Media),
                func: SummaryFunc::PctChange,
                period: 7,
            }
            .label(Locale::Ko),
            "게시물 증감(%)"
        );
        assert_eq!(
            Column::Comparison {
                base: MetricColumn::EngagementRate,
                func: SummaryFunc::Diff,
                period: 7,
            }
            .label(Locale::Ko),
            "참여도 증감(수)"
        );
        assert_eq!(
            Column::Comparison {
                base: like_per_post(),
                func: SummaryFunc::Diff,
                period: 1,
            }
            .label(Locale::Ko),
            "게시물 당 좋아요 증감(수)"
        );
    }

    #[test]
    fn test_english_labels() {
        assert_eq!(Column::Value(like_per_post()).label(Locale::En), "Likes per post");
        assert_eq!(
            Column::Comparison {
                base: MetricColumn::Count(Metric::Followers),
                func: SummaryFunc::PctChange,
                period: 1,
            }
            .label(Locale::En),
            "Followers change (%)"
        );
    }

    #[test]
    fn test_summary_func_parsing() {
        assert_eq!("diff".parse::<SummaryFunc>().unwrap(), SummaryFunc::Diff);
        assert_eq!("pct_change".parse::<SummaryFunc>().unwrap(), SummaryFunc::PctChange);
        assert!(matches!(
            "rolling_mean".parse::<SummaryFunc>(),
            Err(SummaryError::InvalidArgument(_))
        ));
    }
}
