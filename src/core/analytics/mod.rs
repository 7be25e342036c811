//! Analytics aggregation
//!
//! - [`bucket`] - range selectors, windows and bucket labels
//! - [`aggregate`] - code usage, status breakdown and trend series
//! - [`summary`] - overview statistics and report payloads
//!
//! ```rust
//! use chrono::Utc;
//! use medicode::core::analytics::{aggregate, compute_buckets, DateRange, OverviewStats};
//!
//! # fn example(records: &[medicode::domain::PatientRecord]) -> medicode::domain::Result<()> {
//! let window = compute_buckets(Utc::now(), DateRange::Last3Months);
//! let result = aggregate(records, &window)?;
//! let overview = OverviewStats::from_aggregate(&result);
//! println!("{:.1}% approved", overview.accuracy_rate);
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod bucket;
pub mod summary;

pub use aggregate::{aggregate, AggregateResult, CodeUsage, StatusCount, TrendPoint};
pub use bucket::{compute_buckets, DateRange, Granularity, LabelFormat, TimeWindow};
pub use summary::{
    generate_report, OverviewStats, Report, ReportData, ReportRange, ReportRequest, ReportType,
    ValidationSummary,
};
