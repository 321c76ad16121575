//! Reporting windows.
//!
//! Every window resolves to an inclusive date range relative to a supplied
//! "today", so the same code paths are testable on fixed dates.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// A reporting period selectable on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportWindow {
    /// The calendar month containing today.
    ThisMonth,
    /// The calendar month before the one containing today.
    LastMonth,
    /// The calendar quarter containing today.
    ThisQuarter,
    /// The calendar year containing today.
    ThisYear,
    /// The calendar year before the one containing today.
    LastYear,
    /// An explicit inclusive range.
    Custom {
        /// First day of the range.
        start: NaiveDate,
        /// Last day of the range.
        end: NaiveDate,
    },
}

impl ReportWindow {
    /// Resolves the window to an inclusive `(start, end)` date range.
    #[must_use]
    pub fn bounds(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match *self {
            Self::ThisMonth => month_bounds(today.year(), today.month()),
            Self::LastMonth => {
                let (year, month) = if today.month() == 1 {
                    (today.year() - 1, 12)
                } else {
                    (today.year(), today.month() - 1)
                };
                month_bounds(year, month)
            }
            Self::ThisQuarter => {
                let first_month = ((today.month() - 1) / 3) * 3 + 1;
                let (start, _) = month_bounds(today.year(), first_month);
                let (_, end) = month_bounds(today.year(), first_month + 2);
                (start, end)
            }
            Self::ThisYear => year_bounds(today.year()),
            Self::LastYear => year_bounds(today.year() - 1),
            Self::Custom { start, end } => (start, end),
        }
    }

    /// True when `date` falls inside the window.
    #[must_use]
    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        let (start, end) = self.bounds(today);
        date >= start && date <= end
    }
}

fn month_bounds(year: i32, month: u32) -> (NaiveDate, NaiveDate) {
    // Both dates are constructible for any valid (year, month).
    let start = NaiveDate::from_ymd_opt(year, month, 1).unwrap_or_default();
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let end = next.unwrap_or_default() - Duration::days(1);
    (start, end)
}

fn year_bounds(year: i32) -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or_default(),
        NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(ReportWindow::ThisMonth, date(2026, 8, 1), date(2026, 8, 31))]
    #[case(ReportWindow::LastMonth, date(2026, 7, 1), date(2026, 7, 31))]
    #[case(ReportWindow::ThisQuarter, date(2026, 7, 1), date(2026, 9, 30))]
    #[case(ReportWindow::ThisYear, date(2026, 1, 1), date(2026, 12, 31))]
    #[case(ReportWindow::LastYear, date(2025, 1, 1), date(2025, 12, 31))]
    fn test_window_bounds(
        #[case] window: ReportWindow,
        #[case] start: NaiveDate,
        #[case] end: NaiveDate,
    ) {
        assert_eq!(window.bounds(date(2026, 8, 25)), (start, end));
    }

    #[test]
    fn test_last_month_across_year_boundary() {
        assert_eq!(
            ReportWindow::LastMonth.bounds(date(2026, 1, 10)),
            (date(2025, 12, 1), date(2025, 12, 31))
        );
    }

    #[test]
    fn test_february_leap_year_end() {
        assert_eq!(
            ReportWindow::ThisMonth.bounds(date(2028, 2, 10)),
            (date(2028, 2, 1), date(2028, 2, 29))
        );
    }

    #[test]
    fn test_custom_window_is_inclusive() {
        let window = ReportWindow::Custom {
            start: date(2026, 3, 1),
            end: date(2026, 3, 15),
        };
        let today = date(2026, 8, 25);
        assert!(window.contains(date(2026, 3, 1), today));
        assert!(window.contains(date(2026, 3, 15), today));
        assert!(!window.contains(date(2026, 3, 16), today));
    }
}
