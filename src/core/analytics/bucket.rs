//! Time bucketing for trend series
//!
//! Turns a [`DateRange`] selector and a reference instant into a
//! [`TimeWindow`]: the window start, the bucket boundaries that partition
//! the window, and the rule used to label both buckets and records.
//!
//! All arithmetic is done in UTC.

use crate::domain::{MedicodeError, Result};
use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Range selector for analytics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DateRange {
    #[serde(rename = "last7days")]
    Last7Days,
    #[serde(rename = "last30days")]
    Last30Days,
    #[serde(rename = "last3months")]
    Last3Months,
    #[default]
    #[serde(rename = "last6months")]
    Last6Months,
}

impl DateRange {
    pub const ALL: [DateRange; 4] = [
        DateRange::Last7Days,
        DateRange::Last30Days,
        DateRange::Last3Months,
        DateRange::Last6Months,
    ];

    /// Selector value as accepted on the command line and in config
    pub fn as_str(&self) -> &'static str {
        match self {
            DateRange::Last7Days => "last7days",
            DateRange::Last30Days => "last30days",
            DateRange::Last3Months => "last3months",
            DateRange::Last6Months => "last6months",
        }
    }

    /// Human readable name, e.g. "Last 30 Days"
    pub fn title(&self) -> &'static str {
        match self {
            DateRange::Last7Days => "Last 7 Days",
            DateRange::Last30Days => "Last 30 Days",
            DateRange::Last3Months => "Last 3 Months",
            DateRange::Last6Months => "Last 6 Months",
        }
    }

    pub fn granularity(&self) -> Granularity {
        match self {
            DateRange::Last7Days | DateRange::Last30Days => Granularity::Daily,
            DateRange::Last3Months => Granularity::Weekly,
            DateRange::Last6Months => Granularity::Monthly,
        }
    }

    pub fn label_format(&self) -> LabelFormat {
        match self {
            DateRange::Last6Months => LabelFormat::Month,
            _ => LabelFormat::MonthDay,
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateRange {
    type Err = MedicodeError;

    fn from_str(s: &str) -> Result<Self> {
        DateRange::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                MedicodeError::InvalidInput(format!(
                    "Unknown date range: {s}. Expected one of: last7days, last30days, last3months, last6months"
                ))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    Weekly,
    Monthly,
}

/// Label rendering for bucket starts and record timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LabelFormat {
    /// Abbreviated month and zero padded day, e.g. "Mar 04"
    MonthDay,
    /// Abbreviated month only, e.g. "Mar"
    Month,
}

impl LabelFormat {
    pub fn pattern(&self) -> &'static str {
        match self {
            LabelFormat::MonthDay => "%b %d",
            LabelFormat::Month => "%b",
        }
    }

    pub fn format(&self, instant: DateTime<Utc>) -> String {
        instant.format(self.pattern()).to_string()
    }
}

/// The analysed period and its bucket boundaries
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    pub range: DateRange,
    /// Inclusive lower bound for records
    pub start: DateTime<Utc>,
    /// The reference instant
    pub end: DateTime<Utc>,
    pub granularity: Granularity,
    pub label_format: LabelFormat,
    /// Ascending, one per day, Monday or first of month
    pub bucket_starts: Vec<DateTime<Utc>>,
}

impl TimeWindow {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start
    }

    /// Distinct bucket labels in bucket order
    ///
    /// Bucket starts that render to the same label share one entry.
    pub fn labels(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.bucket_starts
            .iter()
            .map(|start| self.label_format.format(*start))
            .filter(|label| seen.insert(label.clone()))
            .collect()
    }

    /// Label of the bucket a record visited at `instant` belongs to
    ///
    /// Weekly windows key by the Monday starting the visit's week.
    pub fn bucket_key(&self, instant: DateTime<Utc>) -> String {
        match self.granularity {
            Granularity::Weekly => self.label_format.format(start_of_iso_week(instant)),
            Granularity::Daily | Granularity::Monthly => self.label_format.format(instant),
        }
    }
}

/// Computes the window and bucket boundaries for `range` ending at `now`
///
/// | range       | window start                               | buckets  |
/// |-------------|--------------------------------------------|----------|
/// | last7days   | start of day, 6 days back                  | daily    |
/// | last30days  | start of day, 29 days back                 | daily    |
/// | last3months | Monday of the week 2 months back           | weekly   |
/// | last6months | start of day, 5 months back                | monthly  |
///
/// Month subtraction clamps to the last valid day of the target month.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use medicode::core::analytics::{compute_buckets, DateRange};
///
/// let now = Utc.with_ymd_and_hms(2025, 3, 15, 10, 0, 0).unwrap();
/// let window = compute_buckets(now, DateRange::Last7Days);
/// assert_eq!(window.bucket_starts.len(), 7);
/// assert_eq!(window.labels()[0], "Mar 09");
/// ```
pub fn compute_buckets(now: DateTime<Utc>, range: DateRange) -> TimeWindow {
    let today = now.date_naive();

    let start_date = match range {
        DateRange::Last7Days => today - Duration::days(6),
        DateRange::Last30Days => today - Duration::days(29),
        DateRange::Last3Months => monday_of(months_back(today, 2)),
        DateRange::Last6Months => months_back(today, 5),
    };

    let granularity = range.granularity();
    let bucket_starts = match granularity {
        Granularity::Daily => step_dates(start_date, today, |d| d + Duration::days(1)),
        Granularity::Weekly => step_dates(start_date, monday_of(today), |d| d + Duration::days(7)),
        Granularity::Monthly => step_dates(first_of_month(start_date), first_of_month(today), |d| {
            d.checked_add_months(Months::new(1)).unwrap_or(NaiveDate::MAX)
        }),
    };

    TimeWindow {
        range,
        start: midnight(start_date),
        end: now,
        granularity,
        label_format: range.label_format(),
        bucket_starts: bucket_starts.into_iter().map(midnight).collect(),
    }
}

/// Midnight UTC at the start of the Monday of `instant`'s week
pub fn start_of_iso_week(instant: DateTime<Utc>) -> DateTime<Utc> {
    midnight(monday_of(instant.date_naive()))
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

fn months_back(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn step_dates(
    first: NaiveDate,
    last: NaiveDate,
    next: impl Fn(NaiveDate) -> NaiveDate,
) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = first;
    while current <= last {
        dates.push(current);
        let following = next(current);
        if following <= current {
            break;
        }
        current = following;
    }
    dates
}
