//! Derived statistics and report payloads

use super::aggregate::AggregateResult;
use crate::domain::{CodeSystem, MedicodeError, PatientRecord, Result, ValidationStatus};
use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Headline numbers shown above the analytics tables
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewStats {
    pub total_validations: usize,
    /// Approved share of all in-range entries, as a percentage
    pub accuracy_rate: f64,
    pub pending_reviews: usize,
}

impl OverviewStats {
    pub fn from_aggregate(result: &AggregateResult) -> Self {
        let total = result.total_entry_count;
        let approved = result.count_of(ValidationStatus::Approved);
        Self {
            total_validations: total,
            accuracy_rate: percentage(approved, total),
            pending_reviews: result.count_of(ValidationStatus::Pending),
        }
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    Validation,
    Patient,
    CodeUsage,
}

impl ReportType {
    pub fn title(&self) -> &'static str {
        match self {
            ReportType::Validation => "Validation Summary",
            ReportType::Patient => "Patient Records",
            ReportType::CodeUsage => "Code Usage Analysis",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for ReportType {
    type Err = MedicodeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "validation" => Ok(Self::Validation),
            "patient" | "patients" => Ok(Self::Patient),
            "code_usage" => Ok(Self::CodeUsage),
            _ => Err(MedicodeError::InvalidInput(format!(
                "Unknown report type: {s}. Expected 'validation', 'patient' or 'code_usage'"
            ))),
        }
    }
}

/// Range selector for reports
///
/// Reports count whole days back from today rather than the calendar
/// buckets analytics uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ReportRange {
    #[serde(rename = "last7days")]
    Last7Days,
    #[default]
    #[serde(rename = "last30days")]
    Last30Days,
    #[serde(rename = "last3months")]
    Last3Months,
    #[serde(rename = "lastyear")]
    LastYear,
}

impl ReportRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportRange::Last7Days => "last7days",
            ReportRange::Last30Days => "last30days",
            ReportRange::Last3Months => "last3months",
            ReportRange::LastYear => "lastyear",
        }
    }

    /// Days between the window's first day and today
    pub fn days_back(&self) -> i64 {
        match self {
            ReportRange::Last7Days => 7,
            ReportRange::Last30Days => 30,
            ReportRange::Last3Months => 90,
            ReportRange::LastYear => 365,
        }
    }

    /// Inclusive bounds: midnight `days_back` days ago to the last instant of today
    pub fn window(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let today = now.date_naive();
        let first_day = today - Duration::days(self.days_back());
        let tomorrow = today + Duration::days(1);
        (
            Utc.from_utc_datetime(&first_day.and_time(NaiveTime::MIN)),
            Utc.from_utc_datetime(&tomorrow.and_time(NaiveTime::MIN)) - Duration::nanoseconds(1),
        )
    }
}

impl fmt::Display for ReportRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized selectors fall back to the last 30 days
impl FromStr for ReportRange {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let range = match s.trim().to_lowercase().as_str() {
            "last7days" => ReportRange::Last7Days,
            "last30days" => ReportRange::Last30Days,
            "last3months" => ReportRange::Last3Months,
            "lastyear" => ReportRange::LastYear,
            other => {
                tracing::warn!(range = other, "Unknown report range, using last30days");
                ReportRange::Last30Days
            }
        };
        Ok(range)
    }
}

/// What to report on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRequest {
    pub report_type: ReportType,
    pub range: ReportRange,
    /// `None` means all systems
    pub code_system: Option<CodeSystem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationSummary {
    pub total_codes: usize,
    pub approved: usize,
    pub rejected: usize,
    pub pending: usize,
    pub approval_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientReportRow {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub patient_id: String,
    pub last_visit: DateTime<Utc>,
    pub diagnoses_count: usize,
    pub treatments_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeUsageStat {
    pub count: usize,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportData {
    Validation(ValidationSummary),
    Patients(Vec<PatientReportRow>),
    /// Keyed `"CODE (SYSTEM)"`
    CodeUsage(BTreeMap<String, CodeUsageStat>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub name: String,
    pub report_type: ReportType,
    pub date_range: ReportRange,
    pub date_range_start: DateTime<Utc>,
    pub date_range_end: DateTime<Utc>,
    /// "all" or the system label
    pub code_system: String,
    pub generated_at: DateTime<Utc>,
    pub patient_count: usize,
    pub data: ReportData,
}

/// Builds a report over patients with validation activity in the range
///
/// A patient is included when any of their entries was validated inside the
/// range window and, when a code system is given, when any entry uses that
/// system. The report body then covers all of the patient's entries.
///
/// # Errors
///
/// Returns `InvalidInput` if any record is malformed.
pub fn generate_report(
    records: &[PatientRecord],
    request: &ReportRequest,
    now: DateTime<Utc>,
) -> Result<Report> {
    for record in records {
        record.validate()?;
    }

    let (start, end) = request.range.window(now);
    let selected: Vec<&PatientRecord> = records
        .iter()
        .filter(|p| {
            p.entries()
                .any(|e| e.validation_date >= start && e.validation_date <= end)
        })
        .filter(|p| match request.code_system {
            Some(system) => p.entries().any(|e| e.code_system == system),
            None => true,
        })
        .collect();

    let data = match request.report_type {
        ReportType::Validation => ReportData::Validation(validation_summary(&selected)),
        ReportType::Patient => ReportData::Patients(patient_rows(&selected)),
        ReportType::CodeUsage => ReportData::CodeUsage(code_usage(&selected)),
    };

    tracing::info!(
        report_type = %request.report_type,
        range = %request.range,
        patients = selected.len(),
        "Generated report"
    );

    Ok(Report {
        name: format!(
            "{} - {} to {}",
            request.report_type.title(),
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        ),
        report_type: request.report_type,
        date_range: request.range,
        date_range_start: start,
        date_range_end: end,
        code_system: request
            .code_system
            .map_or_else(|| "all".to_string(), |s| s.to_string()),
        generated_at: now,
        patient_count: selected.len(),
        data,
    })
}

fn validation_summary(patients: &[&PatientRecord]) -> ValidationSummary {
    let mut summary = ValidationSummary {
        total_codes: 0,
        approved: 0,
        rejected: 0,
        pending: 0,
        approval_rate: 0.0,
    };
    for entry in patients.iter().flat_map(|p| p.entries()) {
        summary.total_codes += 1;
        match entry.status {
            ValidationStatus::Approved => summary.approved += 1,
            ValidationStatus::Rejected => summary.rejected += 1,
            ValidationStatus::Pending => summary.pending += 1,
        }
    }
    summary.approval_rate = percentage(summary.approved, summary.total_codes);
    summary
}

fn patient_rows(patients: &[&PatientRecord]) -> Vec<PatientReportRow> {
    patients
        .iter()
        .map(|p| PatientReportRow {
            id: p.id.to_string(),
            name: p.name.clone(),
            age: p.age,
            gender: p.gender.as_str().to_string(),
            patient_id: p.patient_id.clone(),
            last_visit: p.last_visit,
            diagnoses_count: p.diagnoses.len(),
            treatments_count: p.treatments.len(),
        })
        .collect()
}

fn code_usage(patients: &[&PatientRecord]) -> BTreeMap<String, CodeUsageStat> {
    let mut usage: BTreeMap<String, CodeUsageStat> = BTreeMap::new();
    for entry in patients.iter().flat_map(|p| p.entries()) {
        usage
            .entry(format!("{} ({})", entry.code, entry.code_system))
            .or_insert_with(|| CodeUsageStat {
                count: 0,
                description: entry.description.clone(),
            })
            .count += 1;
    }
    usage
}
