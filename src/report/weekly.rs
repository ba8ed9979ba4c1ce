use std::cmp::Ordering;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use log::{info, warn};
use serde::Serialize;
use thiserror::Error;

use crate::config::ReportSettings;
use crate::models::{Column, Locale, Metric, MetricColumn, Post, SummaryFunc};
use crate::summary::{Summarizer, SummaryError, SummaryTable, TableExport};
use crate::utils::percent_of;

use super::week::{first_monday, last_report_date, week_label, Trend};

/// Errors that can occur while building a report
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("no snapshots on report date {0}")]
    NoData(NaiveDate),

    #[error("account '{name}' has no snapshot on {date}")]
    UnknownAccount { name: String, date: NaiveDate },

    #[error(transparent)]
    Summary(#[from] SummaryError),
}

/// Metrics that get a headline section, in report order.
const HEADLINES: [MetricColumn; 3] = [
    MetricColumn::Count(Metric::Followers),
    MetricColumn::EngagementRate,
    MetricColumn::Count(Metric::Media),
];

/// One account's value and change over the report period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountFigure {
    pub name: String,
    pub value: Option<f64>,
    pub diff: Option<f64>,
    pub pct_change: Option<f64>,
    pub trend: Option<Trend>,
}

/// Headline section: the target account next to the week's best and worst movers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSection {
    pub column: String,
    pub label: String,
    pub target: AccountFigure,
    /// One-line description of the target's change, e.g. for a report email
    pub sentence: Option<String>,
    pub best: Option<AccountFigure>,
    pub worst: Option<AccountFigure>,
}

/// A post ranked by engagement relative to its account's followers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPost {
    pub rank: usize,
    pub name: String,
    pub timestamp: DateTime<Utc>,
    pub media_type: Option<String>,
    pub permalink: Option<String>,
    pub caption: Option<String>,
    pub like_count: u64,
    pub comments_count: u64,
    pub engagement: u64,
    pub engagement_rate: Option<f64>,
}

/// Week-over-week report for one target account.
#[derive(Debug, Clone, Serialize)]
pub struct WeeklyReport {
    pub target_account: String,
    pub week: String,
    pub period_start: NaiveDate,
    pub report_date: NaiveDate,
    pub sections: Vec<MetricSection>,
    pub top_posts: Vec<TopPost>,
    pub target_top_posts: Vec<TopPost>,
    /// Every account on the report date, by rank
    pub summary: TableExport,
    /// Every post in the report window, by engagement rate
    pub posts: Vec<TopPost>,
}

impl WeeklyReport {
    /// Builds the report for `settings.report_date`, or the most recent date of
    /// the weekly report calendar.
    ///
    /// The calendar runs every seven days from `settings.first_report` (the
    /// first Monday in the data when unset). When it has no date on or before
    /// the latest snapshot, the latest snapshot date is used.
    ///
    /// Comparisons use `settings.period_days` snapshots of lookback; posts are
    /// taken from the same window, `(report_date - period_days, report_date]`.
    pub fn build(
        summarizer: &Summarizer,
        posts: &[Post],
        settings: &ReportSettings,
    ) -> Result<Self, ReportError> {
        let period = settings.period_days;
        let table = summarizer.get_summaries(
            &[SummaryFunc::Diff, SummaryFunc::PctChange],
            &[period],
            false,
        )?;

        let report_date = match settings.report_date {
            Some(date) => date,
            None => calendar_date(&table, settings.first_report)?,
        };
        let rows = table.rows_on(report_date);
        if rows.is_empty() {
            return Err(ReportError::NoData(report_date));
        }
        let target_row = table
            .row_of(&settings.target_account, report_date)
            .ok_or_else(|| ReportError::UnknownAccount {
                name: settings.target_account.clone(),
                date: report_date,
            })?;

        let sections = HEADLINES
            .iter()
            .map(|&base| {
                let figures = Figures {
                    table: &table,
                    base,
                    period,
                };
                let label = Column::Value(base).label(settings.locale);
                let target = figures.of(target_row);
                MetricSection {
                    column: base.name(),
                    sentence: sentence(&target, &label, base, settings.locale),
                    label,
                    target,
                    best: figures.extreme(&rows, Ordering::Greater),
                    worst: figures.extreme(&rows, Ordering::Less),
                }
            })
            .collect();

        let period_start = report_date - Duration::days(period as i64);
        let ranked = rank_posts(&table, posts, period_start, report_date);
        let top_posts = top(&ranked, |_| true, settings.top_posts);
        let target_top_posts = top(
            &ranked,
            |post| post.name == settings.target_account,
            settings.top_posts,
        );
        if ranked.is_empty() {
            warn!("No posts between {} and {}", period_start, report_date);
        }
        let summary = table.export(&rows_by_rank(&table, report_date), settings.locale);

        info!(
            "Built weekly report for {} on {} ({} accounts, {} posts)",
            settings.target_account,
            report_date,
            rows.len(),
            ranked.len()
        );

        Ok(Self {
            target_account: settings.target_account.clone(),
            week: week_label(report_date),
            period_start,
            report_date,
            sections,
            top_posts,
            target_top_posts,
            summary,
            posts: top(&ranked, |_| true, ranked.len()),
        })
    }
}

/// Last report-calendar date on or before the latest snapshot.
fn calendar_date(
    table: &SummaryTable,
    first: Option<NaiveDate>,
) -> Result<NaiveDate, ReportError> {
    // rows are date-ordered
    let earliest = table.rows().first().map(|row| row.date);
    let (Some(earliest), Some(latest)) = (earliest, table.latest_date()) else {
        return Err(SummaryError::EmptyTable.into());
    };
    let first = first.unwrap_or_else(|| first_monday(earliest));
    match last_report_date(first, latest) {
        Some(date) => Ok(date),
        None => {
            warn!(
                "Report calendar starts {} after the latest snapshot {}; using the latest snapshot",
                first, latest
            );
            Ok(latest)
        }
    }
}

/// Rows on the latest date, ordered by rank and then name.
pub fn latest_rows(table: &SummaryTable) -> Vec<usize> {
    match table.latest_date() {
        Some(date) => rows_by_rank(table, date),
        None => Vec::new(),
    }
}

/// Rows on `date`, ordered by rank and then name.
pub fn rows_by_rank(table: &SummaryTable, date: NaiveDate) -> Vec<usize> {
    let rank = Column::Value(MetricColumn::Rank);
    let mut rows = table.rows_on(date);
    rows.sort_by(|&a, &b| {
        let ra = table.value(a, &rank).unwrap_or(f64::MAX);
        let rb = table.value(b, &rank).unwrap_or(f64::MAX);
        ra.total_cmp(&rb)
            .then_with(|| table.rows()[a].name.cmp(&table.rows()[b].name))
    });
    rows
}

struct Figures<'a> {
    table: &'a SummaryTable,
    base: MetricColumn,
    period: usize,
}

impl Figures<'_> {
    fn comparison(&self, func: SummaryFunc) -> Column {
        Column::Comparison {
            base: self.base,
            func,
            period: self.period,
        }
    }

    fn of(&self, row: usize) -> AccountFigure {
        let diff = self.table.value(row, &self.comparison(SummaryFunc::Diff));
        AccountFigure {
            name: self.table.rows()[row].name.clone(),
            value: self.table.value(row, &Column::Value(self.base)),
            diff,
            pct_change: self.table.value(row, &self.comparison(SummaryFunc::PctChange)),
            trend: diff.map(Trend::of),
        }
    }

    /// Account with the highest (`Greater`) or lowest (`Less`) percentage
    /// change; the first in table order wins ties.
    fn extreme(&self, rows: &[usize], wanted: Ordering) -> Option<AccountFigure> {
        let pct = self.comparison(SummaryFunc::PctChange);
        let mut best: Option<(usize, f64)> = None;
        for &row in rows {
            let Some(value) = self.table.value(row, &pct) else {
                continue;
            };
            match best {
                Some((_, current)) if value.total_cmp(&current) != wanted => {}
                _ => best = Some((row, value)),
            }
        }
        best.map(|(row, _)| self.of(row))
    }
}

/// Report sentence for one account, e.g.
/// `target의 팔로워 수(1150)는 전주 대비 70(6.48%) 증가하였습니다.`
fn sentence(
    figure: &AccountFigure,
    label: &str,
    base: MetricColumn,
    locale: Locale,
) -> Option<String> {
    let (value, diff, trend) = (figure.value?, figure.diff?, figure.trend?);
    let digits = match base {
        MetricColumn::Count(_) | MetricColumn::Rank => 0,
        _ => 2,
    };
    let change = match figure.pct_change {
        Some(pct) => format!("{:.*}({:.2}%)", digits, diff.abs(), pct.abs()),
        None => format!("{:.*}", digits, diff.abs()),
    };
    let name = &figure.name;
    let phrase = trend.phrase(locale);
    Some(match (locale, trend) {
        (Locale::Ko, Trend::Unchanged) => {
            format!("{}의 {}는 전주 대비 {:.*}{}", name, label, digits, value, phrase)
        }
        (Locale::Ko, _) => format!(
            "{}의 {}({:.*})는 전주 대비 {} {}",
            name, label, digits, value, change, phrase
        ),
        (Locale::En, Trend::Unchanged) => {
            format!("{}'s {} {} at {:.*}.", name, label, phrase, digits, value)
        }
        (Locale::En, _) => format!(
            "{}'s {} ({:.*}) {} by {} from last week.",
            name, label, digits, value, phrase, change
        ),
    })
}

/// Posts in `(start, end]` ranked by engagement over their account's followers on `end`.
///
/// Posts from accounts without a snapshot on `end` are dropped.
fn rank_posts(
    table: &SummaryTable,
    posts: &[Post],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<TopPost> {
    let mut ranked: Vec<TopPost> = posts
        .iter()
        .filter(|post| {
            let day = post.timestamp.date_naive();
            day > start && day <= end
        })
        .filter_map(|post| {
            let row = table.row_of(&post.name, end)?;
            let followers = table.rows()[row].followers_count;
            Some(TopPost {
                rank: 0,
                name: post.name.clone(),
                timestamp: post.timestamp,
                media_type: post.media_type.clone(),
                permalink: post.permalink.clone(),
                caption: post.caption.clone(),
                like_count: post.like_count,
                comments_count: post.comments_count,
                engagement: post.engagement(),
                engagement_rate: percent_of(post.engagement() as f64, followers as f64),
            })
        })
        .collect();

    ranked.sort_by(|a, b| match (a.engagement_rate, b.engagement_rate) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    ranked
}

fn top(ranked: &[TopPost], keep: impl Fn(&TopPost) -> bool, n: usize) -> Vec<TopPost> {
    ranked
        .iter()
        .filter(|post| keep(*post))
        .take(n)
        .enumerate()
        .map(|(i, post)| TopPost {
            rank: i + 1,
            ..post.clone()
        })
        .collect()
}
