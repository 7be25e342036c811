//! JSON rendering

use crate::domain::Result;
use serde::Serialize;

/// Pretty-printed JSON with a trailing newline
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(value)?;
    bytes.push(b'\n');
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CodeEntry, CodeSystem, PatientRecord};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_records_are_camel_case() {
        let record = PatientRecord::builder()
            .id("p1")
            .unwrap()
            .name("Asha Verma")
            .patient_id("PT-1")
            .last_visit(Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 0).unwrap())
            .diagnosis(
                CodeEntry::builder()
                    .id("d1")
                    .unwrap()
                    .code("1A00")
                    .description("Cholera")
                    .code_system(CodeSystem::Icd11)
                    .validation_date(Utc::now())
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        let bytes = to_pretty_json(&[record]).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert!(value.is_array());
        assert_eq!(value[0]["patientId"], "PT-1");
        assert!(value[0].get("lastVisit").is_some());
        assert_eq!(value[0]["diagnoses"][0]["codeSystem"], "ICD-11");
        assert!(value[0]["diagnoses"][0].get("validatedBy").is_some());
        assert!(String::from_utf8(bytes).unwrap().contains("\n  "));
    }
}
