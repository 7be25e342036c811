//! Wire models for the MediCode REST API
//!
//! The backend speaks snake_case with string-typed enums and timestamps.
//! These structs mirror that payload exactly; `TryFrom` impls are the single
//! place it is converted into the validated domain shape.

use crate::domain::{
    CodeEntry, CodeSystem, EntryId, Gender, MedicodeError, PatientId, PatientRecord, Result,
    ValidationStatus,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A code entry as returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireCodeEntry {
    pub id: String,
    pub code: String,
    pub description: String,
    pub code_system: String,
    pub status: String,
    pub validation_date: String,
    #[serde(default)]
    pub validated_by: Option<String>,
    #[serde(default)]
    pub suggestions: Option<serde_json::Value>,
}

/// A patient as returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WirePatient {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub patient_id: String,
    pub last_visit: String,
    #[serde(default)]
    pub diagnoses: Option<Vec<WireCodeEntry>>,
    #[serde(default)]
    pub treatments: Option<Vec<WireCodeEntry>>,
}

/// Body of `POST /patients/{id}/add_diagnosis/` and `add_treatment/`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCodeRequest {
    pub code: String,
    pub description: String,
    pub code_system: CodeSystem,
    pub status: ValidationStatus,
    pub suggestions: Option<Vec<String>>,
}

impl NewCodeRequest {
    /// A pending code without suggestions
    pub fn pending(
        code: impl Into<String>,
        description: impl Into<String>,
        code_system: CodeSystem,
    ) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            code_system,
            status: ValidationStatus::Pending,
            suggestions: None,
        }
    }

    /// # Errors
    ///
    /// Returns `InvalidInput` when the code or description is blank.
    pub fn validate(&self) -> Result<()> {
        if self.code.trim().is_empty() {
            return Err(MedicodeError::InvalidInput("code cannot be empty".to_string()));
        }
        if self.description.trim().is_empty() {
            return Err(MedicodeError::InvalidInput(
                "description cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Body of `POST /patients/`
///
/// Patients are created without codes; codes are attached afterwards with
/// [`NewCodeRequest`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPatientRequest {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    /// Hospital number, `P` followed by five digits when generated
    pub patient_id: String,
    pub last_visit: DateTime<Utc>,
}

impl NewPatientRequest {
    /// A patient seen now; generates a hospital number when none is given
    pub fn new(
        name: impl Into<String>,
        age: u32,
        gender: Gender,
        patient_id: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            age,
            gender,
            patient_id: patient_id.unwrap_or_else(generate_patient_number),
            last_visit: Utc::now(),
        }
    }

    /// # Errors
    ///
    /// Returns `InvalidInput` when the name or hospital number is blank.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(MedicodeError::InvalidInput("name cannot be empty".to_string()));
        }
        if self.patient_id.trim().is_empty() {
            return Err(MedicodeError::InvalidInput(
                "patient_id cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// `P10000` to `P99999`
pub fn generate_patient_number() -> String {
    let n = Uuid::new_v4().as_u128() % 90_000 + 10_000;
    format!("P{n}")
}

/// Body of `POST /{diagnoses|treatments}/{id}/update_status/`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusUpdateRequest {
    pub status: ValidationStatus,
}

fn parse_timestamp(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| MedicodeError::InvalidInput(format!("invalid {field} '{value}': {e}")))
}

fn suggestion_list(value: Option<serde_json::Value>) -> Option<Vec<String>> {
    match value? {
        serde_json::Value::Array(items) => Some(
            items
                .into_iter()
                .map(|item| match item {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                })
                .collect(),
        ),
        serde_json::Value::Null => None,
        other => Some(vec![other.to_string()]),
    }
}

impl TryFrom<WireCodeEntry> for CodeEntry {
    type Error = MedicodeError;

    fn try_from(wire: WireCodeEntry) -> Result<Self> {
        let entry = CodeEntry {
            id: EntryId::new(wire.id).map_err(MedicodeError::InvalidInput)?,
            code: wire.code,
            description: wire.description,
            code_system: wire.code_system.parse()?,
            status: wire.status.parse()?,
            validation_date: parse_timestamp(&wire.validation_date, "validation_date")?,
            validated_by: wire
                .validated_by
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "N/A".to_string()),
            suggestions: suggestion_list(wire.suggestions),
        };
        entry.validate()?;
        Ok(entry)
    }
}

impl TryFrom<WirePatient> for PatientRecord {
    type Error = MedicodeError;

    fn try_from(wire: WirePatient) -> Result<Self> {
        let id = PatientId::new(wire.id).map_err(MedicodeError::InvalidInput)?;
        let map_entries = |entries: Option<Vec<WireCodeEntry>>| -> Result<Vec<CodeEntry>> {
            entries
                .unwrap_or_default()
                .into_iter()
                .map(CodeEntry::try_from)
                .collect()
        };

        let record = PatientRecord {
            name: wire.name,
            age: wire.age,
            gender: wire.gender.parse()?,
            patient_id: wire.patient_id,
            last_visit: parse_timestamp(&wire.last_visit, "last_visit")?,
            diagnoses: map_entries(wire.diagnoses)
                .map_err(|e| in_patient(&id, "diagnoses", e))?,
            treatments: map_entries(wire.treatments)
                .map_err(|e| in_patient(&id, "treatments", e))?,
            id,
        };
        record.validate()?;
        Ok(record)
    }
}

fn in_patient(id: &PatientId, list: &str, err: MedicodeError) -> MedicodeError {
    match err {
        MedicodeError::InvalidInput(msg) => {
            MedicodeError::InvalidInput(format!("patient {id} {list}: {msg}"))
        }
        other => other,
    }
}

/// Maps a `GET /patients/` payload to domain records
///
/// The mapping is total: every element must convert or the whole payload is
/// rejected.
///
/// # Errors
///
/// Returns `InvalidInput` if the payload is not an array or any element is
/// malformed; the message names the element index.
pub fn map_patient_payload(payload: serde_json::Value) -> Result<Vec<PatientRecord>> {
    let serde_json::Value::Array(items) = payload else {
        return Err(MedicodeError::InvalidInput(
            "expected a JSON array of patients".to_string(),
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let wire: WirePatient = serde_json::from_value(item).map_err(|e| {
                MedicodeError::InvalidInput(format!("patient at index {index}: {e}"))
            })?;
            PatientRecord::try_from(wire).map_err(|e| match e {
                MedicodeError::InvalidInput(msg) => {
                    MedicodeError::InvalidInput(format!("patient at index {index}: {msg}"))
                }
                other => other,
            })
        })
        .collect()
}

/// Maps a single patient payload (fetch-one and create responses)
///
/// # Errors
///
/// Returns `InvalidInput` if the object does not map to a valid record.
pub fn map_single_patient(payload: serde_json::Value) -> Result<PatientRecord> {
    map_patient_payload(serde_json::Value::Array(vec![payload]))?
        .pop()
        .ok_or_else(|| MedicodeError::InvalidInput("empty patient payload".to_string()))
}

/// Maps a single entry payload (add-code response)
pub fn map_entry_payload(payload: serde_json::Value) -> Result<CodeEntry> {
    let wire: WireCodeEntry = serde_json::from_value(payload)
        .map_err(|e| MedicodeError::InvalidInput(format!("code entry: {e}")))?;
    CodeEntry::try_from(wire)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wire_patient() -> serde_json::Value {
        json!({
            "id": "5b0f7c1e-2a7d-4f4e-9d1c-0d7d1c3e8a11",
            "name": "Asha Verma",
            "age": 42,
            "gender": "Female",
            "patient_id": "PT-0001",
            "last_visit": "2025-01-12T14:30:00Z",
            "diagnoses": [{
                "id": "d-1",
                "patient": "5b0f7c1e-2a7d-4f4e-9d1c-0d7d1c3e8a11",
                "code": "1A00",
                "description": "Cholera",
                "code_system": "ICD-11",
                "status": "approved",
                "validation_date": "2025-01-10T09:00:00+05:30",
                "validated_by": "reed",
                "suggestions": ["1A01", "1A02"]
            }],
            "treatments": null
        })
    }

    #[test]
    fn test_maps_wire_patient() {
        let records = map_patient_payload(json!([wire_patient()])).unwrap();
        assert_eq!(records.len(), 1);

        let patient = &records[0];
        assert_eq!(patient.gender, Gender::Female);
        assert_eq!(patient.patient_id, "PT-0001");
        assert!(patient.treatments.is_empty());

        let dx = &patient.diagnoses[0];
        assert_eq!(dx.code_system, CodeSystem::Icd11);
        assert_eq!(dx.status, ValidationStatus::Approved);
        assert_eq!(dx.validation_date.to_rfc3339(), "2025-01-10T03:30:00+00:00");
        assert_eq!(dx.suggestions.as_deref(), Some(&["1A01".to_string(), "1A02".to_string()][..]));
    }

    #[test]
    fn test_rejects_non_array_payload() {
        let err = map_patient_payload(json!({"patients": []})).unwrap_err();
        assert!(matches!(err, MedicodeError::InvalidInput(_)));
    }

    #[test]
    fn test_error_names_index() {
        let mut bad = wire_patient();
        bad["diagnoses"][0]["code_system"] = json!("SNOMED");
        let err = map_patient_payload(json!([wire_patient(), bad])).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("index 1"), "{msg}");
        assert!(msg.contains("SNOMED"), "{msg}");
    }

    #[test]
    fn test_missing_field_is_invalid_input() {
        let mut bad = wire_patient();
        bad.as_object_mut().unwrap().remove("last_visit");
        let err = map_patient_payload(json!([bad])).unwrap_err();
        assert!(matches!(err, MedicodeError::InvalidInput(_)));
    }

    #[test]
    fn test_bad_timestamp_is_invalid_input() {
        let mut bad = wire_patient();
        bad["last_visit"] = json!("yesterday");
        let err = map_patient_payload(json!([bad])).unwrap_err();
        assert!(err.to_string().contains("last_visit"));
    }

    #[test]
    fn test_blank_validator_becomes_na() {
        let entry = map_entry_payload(json!({
            "id": "t-9",
            "code": "NAM002",
            "description": "Yoga therapy for stress management",
            "code_system": "NAMASTE",
            "status": "pending",
            "validation_date": "2025-02-01T00:00:00Z",
            "validated_by": "",
            "suggestions": null
        }))
        .unwrap();
        assert_eq!(entry.validated_by, "N/A");
        assert!(entry.suggestions.is_none());
    }

    #[test]
    fn test_new_patient_request_serializes_wire_shape() {
        let mut body = NewPatientRequest::new("Meera Nair", 31, Gender::Female, Some("P12345".into()));
        body.last_visit = DateTime::parse_from_rfc3339("2025-03-15T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["gender"], "female");
        assert_eq!(json["patient_id"], "P12345");
        assert_eq!(json["age"], 31);
        assert_eq!(
            json["last_visit"].as_str().map(|s| s.starts_with("2025-03-15T12:00:00")),
            Some(true)
        );
    }

    #[test]
    fn test_generated_patient_number_shape() {
        for _ in 0..20 {
            let number = generate_patient_number();
            assert_eq!(number.len(), 6, "{number}");
            assert!(number.starts_with('P'));
            let digits: u32 = number[1..].parse().unwrap();
            assert!((10_000..100_000).contains(&digits));
        }
    }

    #[test]
    fn test_blank_patient_name_is_invalid() {
        let body = NewPatientRequest::new("  ", 40, Gender::Other, None);
        assert!(matches!(body.validate(), Err(MedicodeError::InvalidInput(_))));
    }

    #[test]
    fn test_new_code_request_serializes_wire_shape() {
        let body = NewCodeRequest::pending("1A00", "Cholera", CodeSystem::Icd11);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            json!({
                "code": "1A00",
                "description": "Cholera",
                "code_system": "ICD-11",
                "status": "pending",
                "suggestions": null
            })
        );
    }
}
