//! Rejected code listing

use crate::domain::{CodeSystem, EntryId, EntryKind, PatientRecord, ValidationStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A rejected entry together with the patient it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedCode {
    pub entry_id: EntryId,
    pub code: String,
    pub description: String,
    pub code_system: CodeSystem,
    pub kind: EntryKind,
    pub patient_name: String,
    pub patient_id: String,
    pub validated_by: String,
    pub rejected_at: DateTime<Utc>,
}

impl RejectedCode {
    fn matches(&self, term: &str) -> bool {
        [&self.code, &self.patient_name, &self.validated_by]
            .iter()
            .any(|field| field.to_lowercase().contains(term))
    }
}

/// Every rejected entry across `records`, newest rejection first
pub fn collect_rejected(records: &[PatientRecord]) -> Vec<RejectedCode> {
    let mut rejected: Vec<RejectedCode> = records
        .iter()
        .flat_map(|record| {
            record
                .entries_with_kind()
                .filter(|(_, e)| e.status == ValidationStatus::Rejected)
                .map(move |(kind, e)| RejectedCode {
                    entry_id: e.id.clone(),
                    code: e.code.clone(),
                    description: e.description.clone(),
                    code_system: e.code_system,
                    kind,
                    patient_name: record.name.clone(),
                    patient_id: record.patient_id.clone(),
                    validated_by: e.validated_by.clone(),
                    rejected_at: e.validation_date,
                })
        })
        .collect();
    rejected.sort_by(|a, b| b.rejected_at.cmp(&a.rejected_at));
    rejected
}

/// Case-insensitive search over code, patient name and validator
pub fn search_rejected(codes: &[RejectedCode], term: &str) -> Vec<RejectedCode> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return codes.to_vec();
    }
    codes.iter().filter(|c| c.matches(&term)).cloned().collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedStats {
    pub total: usize,
    /// Rejections dated on the same UTC calendar day as `now`
    pub today: usize,
}

impl RejectedStats {
    pub fn compute(codes: &[RejectedCode], now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        Self {
            total: codes.len(),
            today: codes
                .iter()
                .filter(|c| c.rejected_at.date_naive() == today)
                .count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CodeEntry;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap()
    }

    fn entry(id: &str, code: &str, status: ValidationStatus, at: DateTime<Utc>) -> CodeEntry {
        CodeEntry::builder()
            .id(id)
            .unwrap()
            .code(code)
            .description("desc")
            .code_system(CodeSystem::Icd11)
            .status(status)
            .validated_by("Dr. Evelyn Reed")
            .validation_date(at)
            .build()
            .unwrap()
    }

    fn records() -> Vec<PatientRecord> {
        vec![PatientRecord::builder()
            .id("p1")
            .unwrap()
            .name("Asha Verma")
            .patient_id("PT-1")
            .last_visit(now())
            .diagnosis(entry("d1", "1A00", ValidationStatus::Rejected, now() - Duration::days(3)))
            .diagnosis(entry("d2", "1B10", ValidationStatus::Approved, now()))
            .treatment(entry("t1", "NAM-7", ValidationStatus::Rejected, now()))
            .build()
            .unwrap()]
    }

    #[test]
    fn test_collect_only_rejected_newest_first() {
        let rejected = collect_rejected(&records());
        let codes: Vec<&str> = rejected.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["NAM-7", "1A00"]);
        assert_eq!(rejected[0].kind, EntryKind::Treatment);
        assert_eq!(rejected[0].patient_name, "Asha Verma");
    }

    #[test]
    fn test_search() {
        let rejected = collect_rejected(&records());
        assert_eq!(search_rejected(&rejected, "nam").len(), 1);
        assert_eq!(search_rejected(&rejected, "ASHA").len(), 2);
        assert_eq!(search_rejected(&rejected, "reed").len(), 2);
        assert_eq!(search_rejected(&rejected, "").len(), 2);
        assert!(search_rejected(&rejected, "zzz").is_empty());
    }

    #[test]
    fn test_stats() {
        let rejected = collect_rejected(&records());
        assert_eq!(
            RejectedStats::compute(&rejected, now()),
            RejectedStats { total: 2, today: 1 }
        );
    }
}
