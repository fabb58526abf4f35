use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::parser::types::Ticket;

/// Wide-open sentinel bounds returned for `AllTime`. The caller narrows
/// them to the dataset's real min/max before computing anything.
pub const SENTINEL_START: (i32, u32, u32) = (1970, 1, 1);
pub const SENTINEL_END: (i32, u32, u32) = (2100, 12, 31);

/// User-selected period specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum PeriodSpec {
    AllTime,
    Year { year: i32 },
    Month { year: i32, month: u32 },
    Range { start: NaiveDate, end: NaiveDate },
}

impl PeriodSpec {
    /// Concrete inclusive `[start, end]` interval for this selection.
    /// `AllTime` yields the sentinel range without inspecting any data.
    /// Invalid year/month values are clamped onto the sentinel bounds.
    pub fn resolve(&self) -> (NaiveDate, NaiveDate) {
        match *self {
            PeriodSpec::AllTime => (sentinel_start(), sentinel_end()),
            PeriodSpec::Year { year } => {
                let start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or_else(sentinel_start);
                let end = NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or_else(sentinel_end);
                (start, end)
            }
            PeriodSpec::Month { year, month } => {
                let Some(start) = NaiveDate::from_ymd_opt(year, month, 1) else {
                    return (sentinel_start(), sentinel_end());
                };
                // Last calendar day = first day of the next month minus one,
                // which handles the December → next-year rollover.
                let next_month_first = if month == 12 {
                    NaiveDate::from_ymd_opt(year + 1, 1, 1)
                } else {
                    NaiveDate::from_ymd_opt(year, month + 1, 1)
                };
                let end = next_month_first
                    .map(|d| d - Duration::days(1))
                    .unwrap_or_else(sentinel_end);
                (start, end)
            }
            PeriodSpec::Range { start, end } => (start, end),
        }
    }
}

fn sentinel_start() -> NaiveDate {
    let (y, m, d) = SENTINEL_START;
    NaiveDate::from_ymd_opt(y, m, d).expect("sentinel start")
}

fn sentinel_end() -> NaiveDate {
    let (y, m, d) = SENTINEL_END;
    NaiveDate::from_ymd_opt(y, m, d).expect("sentinel end")
}

/// Exact count of Monday–Friday dates in `[start, end]`. No holiday
/// calendar. Zero when the range is empty or inverted.
pub fn business_days(start: NaiveDate, end: NaiveDate) -> i64 {
    if start > end {
        return 0;
    }
    let total = (end - start).num_days() + 1;
    let full_weeks = total / 7;
    let mut count = full_weeks * 5;
    let mut day = start + Duration::days(full_weeks * 7);
    while day <= end {
        if day.weekday().num_days_from_monday() < 5 {
            count += 1;
        }
        day += Duration::days(1);
    }
    count
}

/// Aggregation denominator: business days floored at 1 so per-day rates
/// never divide by zero.
pub fn business_day_denominator(start: NaiveDate, end: NaiveDate) -> i64 {
    business_days(start, end).max(1)
}

fn in_range(date: Option<NaiveDate>, start: NaiveDate, end: NaiveDate) -> bool {
    date.map(|d| d >= start && d <= end).unwrap_or(false)
}

/// Union period filter: a row qualifies when its creation OR resolution
/// timestamp falls inside `[start, end]`. Rows with neither timestamp are
/// excluded. Produces a borrowed view; the base table is never touched.
pub fn filter_union<'a>(
    tickets: &'a [Ticket],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<&'a Ticket> {
    tickets
        .iter()
        .filter(|t| {
            in_range(t.created.map(|dt| dt.date()), start, end)
                || in_range(t.resolved.map(|dt| dt.date()), start, end)
        })
        .collect()
}
