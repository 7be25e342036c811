//! Folding patient records into analytics counters
//!
//! [`aggregate`] is pure and synchronous: the same records and window always
//! produce the same [`AggregateResult`].

use super::bucket::{DateRange, TimeWindow};
use crate::domain::{CodeSystem, PatientRecord, Result, ValidationStatus};
use serde::Serialize;
use std::collections::HashMap;

/// Number of in-range entries coded in one system
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeUsage {
    pub system: CodeSystem,
    pub count: usize,
}

/// Number of in-range entries in one validation status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: ValidationStatus,
    pub count: usize,
}

/// One bucket of the trend series
///
/// `total` is always `icd11 + namaste`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub label: String,
    pub icd11: usize,
    pub namaste: usize,
    pub total: usize,
}

impl TrendPoint {
    fn empty(label: String) -> Self {
        Self {
            label,
            icd11: 0,
            namaste: 0,
            total: 0,
        }
    }

    fn add(&mut self, icd11: usize, namaste: usize) {
        self.icd11 += icd11;
        self.namaste += namaste;
        self.total += icd11 + namaste;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    pub range: DateRange,
    /// ICD-11 first, then NAMASTE
    pub code_usage: Vec<CodeUsage>,
    /// Approved, rejected, pending
    pub status_breakdown: Vec<StatusCount>,
    pub trends: Vec<TrendPoint>,
    /// Diagnoses plus treatments of every in-range record
    pub total_entry_count: usize,
    /// Records whose last visit falls inside the window
    pub record_count: usize,
    /// In-range records whose visit label matched no bucket
    pub unbucketed_records: usize,
}

impl AggregateResult {
    pub fn usage_of(&self, system: CodeSystem) -> usize {
        self.code_usage
            .iter()
            .find(|u| u.system == system)
            .map_or(0, |u| u.count)
    }

    pub fn count_of(&self, status: ValidationStatus) -> usize {
        self.status_breakdown
            .iter()
            .find(|s| s.status == status)
            .map_or(0, |s| s.count)
    }
}

/// Aggregates records visited inside `window`
///
/// Every record is validated first; one malformed record fails the whole
/// call. Code usage and status counts cover all entries of in-range records.
/// Each in-range record then adds its own per-system entry counts to the
/// trend bucket its last visit maps to. Records whose label matches no
/// bucket are left out of the trend series only.
///
/// # Errors
///
/// Returns `InvalidInput` if any record is missing a required field.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use medicode::core::analytics::{aggregate, compute_buckets, DateRange};
///
/// let window = compute_buckets(Utc::now(), DateRange::Last30Days);
/// let result = aggregate(&[], &window).unwrap();
/// assert_eq!(result.total_entry_count, 0);
/// assert_eq!(result.trends.len(), 30);
/// ```
pub fn aggregate(records: &[PatientRecord], window: &TimeWindow) -> Result<AggregateResult> {
    for record in records {
        record.validate()?;
    }

    let in_range: Vec<&PatientRecord> = records
        .iter()
        .filter(|r| window.contains(r.last_visit))
        .collect();

    let mut system_counts: HashMap<CodeSystem, usize> = HashMap::new();
    let mut status_counts: HashMap<ValidationStatus, usize> = HashMap::new();
    let mut total_entry_count = 0;

    for entry in in_range.iter().flat_map(|r| r.entries()) {
        *system_counts.entry(entry.code_system).or_default() += 1;
        *status_counts.entry(entry.status).or_default() += 1;
        total_entry_count += 1;
    }

    let code_usage = CodeSystem::ALL
        .iter()
        .map(|system| CodeUsage {
            system: *system,
            count: system_counts.get(system).copied().unwrap_or(0),
        })
        .collect();

    let status_breakdown = ValidationStatus::BREAKDOWN_ORDER
        .iter()
        .map(|status| StatusCount {
            status: *status,
            count: status_counts.get(status).copied().unwrap_or(0),
        })
        .collect();

    let mut trends: Vec<TrendPoint> = window.labels().into_iter().map(TrendPoint::empty).collect();
    let slots: HashMap<String, usize> = trends
        .iter()
        .enumerate()
        .map(|(index, point)| (point.label.clone(), index))
        .collect();

    let mut unbucketed_records = 0;
    for record in &in_range {
        let key = window.bucket_key(record.last_visit);
        match slots.get(&key) {
            Some(&index) => trends[index].add(
                record.count_by_system(CodeSystem::Icd11),
                record.count_by_system(CodeSystem::Namaste),
            ),
            None => {
                unbucketed_records += 1;
                tracing::debug!(
                    patient_id = %record.id,
                    last_visit = %record.last_visit,
                    label = %key,
                    "Record visit matches no trend bucket"
                );
            }
        }
    }

    tracing::debug!(
        range = %window.range,
        records = records.len(),
        in_range = in_range.len(),
        entries = total_entry_count,
        buckets = trends.len(),
        unbucketed = unbucketed_records,
        "Aggregated analytics"
    );

    Ok(AggregateResult {
        range: window.range,
        code_usage,
        status_breakdown,
        trends,
        total_entry_count,
        record_count: in_range.len(),
        unbucketed_records,
    })
}
