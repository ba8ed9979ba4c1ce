//! Calendar helpers for weekly reports.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;

use crate::models::Locale;

/// Korean long date, e.g. `2022년 10월 03일`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y년 %m월 %d일").to_string()
}

/// Week-of-month label, e.g. `2022년 10월 2주차`.
///
/// Weeks start on Monday: the number is the count of Mondays from the first
/// day of the month through `date`, so days before the month's first Monday
/// belong to week 0.
pub fn week_label(date: NaiveDate) -> String {
    let mondays = (1..=date.day())
        .filter_map(|day| date.with_day(day))
        .filter(|d| d.weekday() == Weekday::Mon)
        .count();
    format!("{}년 {}월 {}주차", date.year(), date.month(), mondays)
}

/// Report dates every seven days from `start` through `end`, inclusive.
pub fn report_dates(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut date = start;
    while date <= end {
        dates.push(date);
        date += Duration::days(7);
    }
    dates
}

/// First Monday on or after `date`.
pub fn first_monday(date: NaiveDate) -> NaiveDate {
    let offset = (7 - date.weekday().num_days_from_monday()) % 7;
    date + Duration::days(offset as i64)
}

/// Most recent report date on the calendar starting at `first`, no later than `latest`.
pub fn last_report_date(first: NaiveDate, latest: NaiveDate) -> Option<NaiveDate> {
    report_dates(first, latest).last().copied()
}

/// Direction of a change, with the sentence ending used in report text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Increased,
    Decreased,
    Unchanged,
}

impl Trend {
    pub fn of(change: f64) -> Self {
        if change > 0.0 {
            Trend::Increased
        } else if change < 0.0 {
            Trend::Decreased
        } else {
            Trend::Unchanged
        }
    }

    pub fn phrase(&self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::Ko, Trend::Increased) => "증가하였습니다.",
            (Locale::Ko, Trend::Decreased) => "감소하였습니다.",
            (Locale::Ko, Trend::Unchanged) => "로 변동이 없었습니다.",
            (Locale::En, Trend::Increased) => "increased",
            (Locale::En, Trend::Decreased) => "decreased",
            (Locale::En, Trend::Unchanged) => "was unchanged",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_label_counts_mondays() {
        // 2022-10-03 is the first Monday of October
        assert_eq!(week_label(date(2022, 10, 3)), "2022년 10월 1주차");
        assert_eq!(week_label(date(2022, 10, 10)), "2022년 10월 2주차");
        assert_eq!(week_label(date(2022, 10, 16)), "2022년 10월 2주차");
        assert_eq!(week_label(date(2022, 10, 1)), "2022년 10월 0주차");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(date(2022, 10, 3)), "2022년 10월 03일");
    }

    #[test]
    fn test_report_dates_step_weekly() {
        assert_eq!(
            report_dates(date(2022, 10, 3), date(2022, 10, 20)),
            vec![date(2022, 10, 3), date(2022, 10, 10), date(2022, 10, 17)]
        );
        assert!(report_dates(date(2022, 10, 3), date(2022, 10, 2)).is_empty());
    }

    #[test]
    fn test_calendar_anchor() {
        // 2022-10-01 is a Saturday
        assert_eq!(first_monday(date(2022, 10, 1)), date(2022, 10, 3));
        assert_eq!(first_monday(date(2022, 10, 3)), date(2022, 10, 3));
        assert_eq!(
            last_report_date(date(2022, 10, 3), date(2022, 10, 15)),
            Some(date(2022, 10, 10))
        );
        assert_eq!(
            last_report_date(date(2022, 10, 3), date(2022, 10, 17)),
            Some(date(2022, 10, 17))
        );
        assert_eq!(last_report_date(date(2022, 10, 3), date(2022, 10, 1)), None);
    }

    #[test]
    fn test_trend() {
        assert_eq!(Trend::of(3.0), Trend::Increased);
        assert_eq!(Trend::of(-0.5), Trend::Decreased);
        assert_eq!(Trend::of(0.0).phrase(Locale::Ko), "로 변동이 없었습니다.");
        assert_eq!(Trend::of(-2.0).phrase(Locale::En), "decreased");
    }
}
