//! Dashboard filtering and statistics

use crate::domain::{CodeSystem, PatientRecord, ValidationStatus};
use serde::Serialize;

/// Criteria for narrowing the patient list
///
/// Empty criteria match every patient.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientFilter {
    /// Case-insensitive match on name or hospital patient id
    pub search: Option<String>,
    /// Patients with at least one entry in this status
    pub status: Option<ValidationStatus>,
    /// Patients with at least one entry in this system
    pub code_system: Option<CodeSystem>,
}

impl PatientFilter {
    pub fn matches(&self, record: &PatientRecord) -> bool {
        let search_ok = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                record.name.to_lowercase().contains(&term)
                    || record.patient_id.to_lowercase().contains(&term)
            }
        };

        let status_ok = self
            .status
            .map_or(true, |status| record.entries().any(|e| e.status == status));

        let system_ok = self
            .code_system
            .map_or(true, |system| record.entries().any(|e| e.code_system == system));

        search_ok && status_ok && system_ok
    }

    /// Matching records, most recent visit first
    pub fn apply(&self, records: &[PatientRecord]) -> Vec<PatientRecord> {
        let mut matched: Vec<PatientRecord> = records
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.last_visit.cmp(&a.last_visit));
        matched
    }
}

/// Headline numbers over every loaded patient
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_patients: usize,
    pub approved: usize,
    pub rejected: usize,
    pub pending: usize,
}

impl DashboardStats {
    pub fn from_records(records: &[PatientRecord]) -> Self {
        records.iter().fold(
            Self {
                total_patients: records.len(),
                ..Default::default()
            },
            |mut stats, record| {
                stats.approved += record.count_by_status(ValidationStatus::Approved);
                stats.rejected += record.count_by_status(ValidationStatus::Rejected);
                stats.pending += record.count_by_status(ValidationStatus::Pending);
                stats
            },
        )
    }
}
