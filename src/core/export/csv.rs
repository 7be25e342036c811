//! CSV rendering

use crate::core::rejected::RejectedCode;
use crate::domain::{CodeEntry, MedicodeError, PatientRecord, Result};
use csv::Writer;

pub const PATIENT_HEADER: [&str; 7] = [
    "Patient ID",
    "Name",
    "Age",
    "Gender",
    "Last Visit",
    "Diagnoses",
    "Treatments",
];

pub const REJECTED_HEADER: [&str; 7] = [
    "Code",
    "System",
    "Kind",
    "Patient",
    "Patient ID",
    "Validated By",
    "Date",
];

/// `CODE (SYSTEM)` pairs separated by `; `
fn code_list(entries: &[CodeEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{} ({})", e.code, e.code_system))
        .collect::<Vec<_>>()
        .join("; ")
}

fn finish(writer: Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| MedicodeError::Export(format!("CSV buffer error: {e}")))
}

/// One row per patient
pub fn patients_csv(records: &[PatientRecord]) -> Result<Vec<u8>> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(PATIENT_HEADER)?;

    for record in records {
        writer.write_record([
            record.patient_id.clone(),
            record.name.clone(),
            record.age.to_string(),
            record.gender.as_str().to_string(),
            record.last_visit.format("%Y-%m-%d").to_string(),
            code_list(&record.diagnoses),
            code_list(&record.treatments),
        ])?;
    }

    writer.flush()?;
    finish(writer)
}

/// One row per rejected code
pub fn rejected_csv(codes: &[RejectedCode]) -> Result<Vec<u8>> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(REJECTED_HEADER)?;

    for code in codes {
        let date = code.rejected_at.format("%Y-%m-%d %H:%M").to_string();
        writer.write_record([
            code.code.as_str(),
            code.code_system.as_str(),
            code.kind.as_str(),
            code.patient_name.as_str(),
            code.patient_id.as_str(),
            code.validated_by.as_str(),
            date.as_str(),
        ])?;
    }

    writer.flush()?;
    finish(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CodeSystem, Gender};
    use chrono::{TimeZone, Utc};

    fn record() -> PatientRecord {
        let entry = |id: &str, code: &str, system| {
            CodeEntry::builder()
                .id(id)
                .unwrap()
                .code(code)
                .description("desc")
                .code_system(system)
                .validation_date(Utc::now())
                .build()
                .unwrap()
        };
        PatientRecord::builder()
            .id("p1")
            .unwrap()
            .name("Verma, Asha")
            .age(42)
            .gender(Gender::Female)
            .patient_id("PT-1")
            .last_visit(Utc.with_ymd_and_hms(2025, 3, 2, 9, 30, 0).unwrap())
            .diagnosis(entry("d1", "1A00", CodeSystem::Icd11))
            .diagnosis(entry("d2", "NAM-7", CodeSystem::Namaste))
            .build()
            .unwrap()
    }

    #[test]
    fn test_patients_csv() {
        let bytes = patients_csv(&[record()]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Patient ID,Name,Age,Gender,Last Visit,Diagnoses,Treatments"
        );
        assert_eq!(
            lines.next().unwrap(),
            "PT-1,\"Verma, Asha\",42,female,2025-03-02,1A00 (ICD-11); NAM-7 (NAMASTE),"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_empty_rejected_has_header_only() {
        let text = String::from_utf8(rejected_csv(&[]).unwrap()).unwrap();
        assert_eq!(
            text.trim_end(),
            "Code,System,Kind,Patient,Patient ID,Validated By,Date"
        );
    }
}
