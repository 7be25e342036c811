//! Patient and code entry domain models
//!
//! These are the in-memory shapes the core works on. They serialize in
//! camelCase; the snake_case wire shape lives in
//! [`adapters::api::models`](crate::adapters::api::models).

use super::errors::MedicodeError;
use super::ids::{EntryId, PatientId};
use super::result::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coding standard a code belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CodeSystem {
    /// WHO International Classification of Diseases, 11th revision
    #[serde(rename = "ICD-11")]
    Icd11,
    /// National AYUSH Morbidity and Standardized Terminologies (traditional medicine)
    #[serde(rename = "NAMASTE")]
    Namaste,
}

impl CodeSystem {
    /// Every recognized system, in display order
    pub const ALL: [CodeSystem; 2] = [CodeSystem::Icd11, CodeSystem::Namaste];

    /// Canonical label used on the wire and in exports
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeSystem::Icd11 => "ICD-11",
            CodeSystem::Namaste => "NAMASTE",
        }
    }
}

impl fmt::Display for CodeSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodeSystem {
    type Err = MedicodeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "icd-11" | "icd11" => Ok(Self::Icd11),
            "namaste" => Ok(Self::Namaste),
            _ => Err(MedicodeError::InvalidInput(format!(
                "Unknown code system: {s}. Expected 'ICD-11' or 'NAMASTE'"
            ))),
        }
    }
}

/// Lifecycle tag of a code entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ValidationStatus {
    /// Fixed order of the status breakdown rows
    pub const BREAKDOWN_ORDER: [ValidationStatus; 3] = [
        ValidationStatus::Approved,
        ValidationStatus::Rejected,
        ValidationStatus::Pending,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStatus::Pending => "pending",
            ValidationStatus::Approved => "approved",
            ValidationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidationStatus {
    type Err = MedicodeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(MedicodeError::InvalidInput(format!(
                "Unknown status: {s}. Expected 'pending', 'approved' or 'rejected'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl FromStr for Gender {
    type Err = MedicodeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            "other" => Ok(Self::Other),
            _ => Err(MedicodeError::InvalidInput(format!("Unknown gender: {s}"))),
        }
    }
}

/// Which list of a patient a code entry lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Diagnosis,
    Treatment,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Diagnosis => "diagnosis",
            EntryKind::Treatment => "treatment",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryKind {
    type Err = MedicodeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "diagnosis" | "diagnoses" => Ok(Self::Diagnosis),
            "treatment" | "treatments" => Ok(Self::Treatment),
            _ => Err(MedicodeError::InvalidInput(format!(
                "Unknown entry kind: {s}. Expected 'diagnosis' or 'treatment'"
            ))),
        }
    }
}

/// A diagnosis or treatment code attached to a patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeEntry {
    pub id: EntryId,
    pub code: String,
    pub description: String,
    pub code_system: CodeSystem,
    pub status: ValidationStatus,
    pub validation_date: DateTime<Utc>,
    pub validated_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

impl CodeEntry {
    /// Creates a new builder for constructing a CodeEntry
    pub fn builder() -> CodeEntryBuilder {
        CodeEntryBuilder::default()
    }

    /// Checks the fields the core relies on
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` naming the first missing field.
    pub fn validate(&self) -> Result<()> {
        if self.code.trim().is_empty() {
            return Err(MedicodeError::InvalidInput(format!(
                "entry {} is missing a code",
                self.id
            )));
        }
        if self.description.trim().is_empty() {
            return Err(MedicodeError::InvalidInput(format!(
                "entry {} is missing a description",
                self.id
            )));
        }
        if self.validated_by.trim().is_empty() {
            return Err(MedicodeError::InvalidInput(format!(
                "entry {} is missing a validator",
                self.id
            )));
        }
        Ok(())
    }
}

/// Builder for [`CodeEntry`]
#[derive(Debug, Default)]
pub struct CodeEntryBuilder {
    id: Option<EntryId>,
    code: Option<String>,
    description: Option<String>,
    code_system: Option<CodeSystem>,
    status: Option<ValidationStatus>,
    validation_date: Option<DateTime<Utc>>,
    validated_by: Option<String>,
    suggestions: Option<Vec<String>>,
}

impl CodeEntryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> std::result::Result<Self, String> {
        self.id = Some(EntryId::new(id)?);
        Ok(self)
    }

    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn code_system(mut self, code_system: CodeSystem) -> Self {
        self.code_system = Some(code_system);
        self
    }

    pub fn status(mut self, status: ValidationStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn validation_date(mut self, validation_date: DateTime<Utc>) -> Self {
        self.validation_date = Some(validation_date);
        self
    }

    pub fn validated_by(mut self, validated_by: impl Into<String>) -> Self {
        self.validated_by = Some(validated_by.into());
        self
    }

    pub fn suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = Some(suggestions);
        self
    }

    /// Builds the CodeEntry
    ///
    /// Status defaults to pending and the validator to `N/A`, matching what
    /// the backend assigns to freshly added codes.
    ///
    /// # Errors
    ///
    /// Returns an error if id, code, description, code system or validation
    /// date is missing.
    pub fn build(self) -> std::result::Result<CodeEntry, String> {
        Ok(CodeEntry {
            id: self.id.ok_or("id is required")?,
            code: self.code.ok_or("code is required")?,
            description: self.description.ok_or("description is required")?,
            code_system: self.code_system.ok_or("code_system is required")?,
            status: self.status.unwrap_or(ValidationStatus::Pending),
            validation_date: self.validation_date.ok_or("validation_date is required")?,
            validated_by: self.validated_by.unwrap_or_else(|| "N/A".to_string()),
            suggestions: self.suggestions,
        })
    }
}

/// A patient with their nested diagnosis and treatment codes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    pub id: PatientId,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    /// Hospital number shown to users
    pub patient_id: String,
    pub last_visit: DateTime<Utc>,
    pub diagnoses: Vec<CodeEntry>,
    pub treatments: Vec<CodeEntry>,
}

impl PatientRecord {
    /// Creates a new builder for constructing a PatientRecord
    pub fn builder() -> PatientRecordBuilder {
        PatientRecordBuilder::default()
    }

    /// Diagnoses followed by treatments
    pub fn entries(&self) -> impl Iterator<Item = &CodeEntry> {
        self.diagnoses.iter().chain(self.treatments.iter())
    }

    /// Every entry tagged with the list it lives in
    pub fn entries_with_kind(&self) -> impl Iterator<Item = (EntryKind, &CodeEntry)> {
        self.diagnoses
            .iter()
            .map(|e| (EntryKind::Diagnosis, e))
            .chain(self.treatments.iter().map(|e| (EntryKind::Treatment, e)))
    }

    pub fn entries_of(&self, kind: EntryKind) -> &[CodeEntry] {
        match kind {
            EntryKind::Diagnosis => &self.diagnoses,
            EntryKind::Treatment => &self.treatments,
        }
    }

    pub fn entries_of_mut(&mut self, kind: EntryKind) -> &mut Vec<CodeEntry> {
        match kind {
            EntryKind::Diagnosis => &mut self.diagnoses,
            EntryKind::Treatment => &mut self.treatments,
        }
    }

    /// Number of this patient's own entries in the given code system
    pub fn count_by_system(&self, system: CodeSystem) -> usize {
        self.entries().filter(|e| e.code_system == system).count()
    }

    pub fn count_by_status(&self, status: ValidationStatus) -> usize {
        self.entries().filter(|e| e.status == status).count()
    }

    pub fn entry_count(&self) -> usize {
        self.diagnoses.len() + self.treatments.len()
    }

    /// Checks the record and every nested entry
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for the first missing required field.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(MedicodeError::InvalidInput(format!(
                "patient {} is missing a name",
                self.id
            )));
        }
        if self.patient_id.trim().is_empty() {
            return Err(MedicodeError::InvalidInput(format!(
                "patient {} is missing a patient number",
                self.id
            )));
        }
        for entry in self.entries() {
            entry.validate()?;
        }
        Ok(())
    }
}

/// Builder for [`PatientRecord`]
#[derive(Debug, Default)]
pub struct PatientRecordBuilder {
    id: Option<PatientId>,
    name: Option<String>,
    age: Option<u32>,
    gender: Option<Gender>,
    patient_id: Option<String>,
    last_visit: Option<DateTime<Utc>>,
    diagnoses: Vec<CodeEntry>,
    treatments: Vec<CodeEntry>,
}

impl PatientRecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> std::result::Result<Self, String> {
        self.id = Some(PatientId::new(id)?);
        Ok(self)
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn patient_id(mut self, patient_id: impl Into<String>) -> Self {
        self.patient_id = Some(patient_id.into());
        self
    }

    pub fn last_visit(mut self, last_visit: DateTime<Utc>) -> Self {
        self.last_visit = Some(last_visit);
        self
    }

    pub fn diagnosis(mut self, entry: CodeEntry) -> Self {
        self.diagnoses.push(entry);
        self
    }

    pub fn treatment(mut self, entry: CodeEntry) -> Self {
        self.treatments.push(entry);
        self
    }

    /// Builds the PatientRecord
    ///
    /// # Errors
    ///
    /// Returns an error if id, name, patient number or last visit is missing.
    pub fn build(self) -> std::result::Result<PatientRecord, String> {
        Ok(PatientRecord {
            id: self.id.ok_or("id is required")?,
            name: self.name.ok_or("name is required")?,
            age: self.age.unwrap_or_default(),
            gender: self.gender.unwrap_or(Gender::Other),
            patient_id: self.patient_id.ok_or("patient_id is required")?,
            last_visit: self.last_visit.ok_or("last_visit is required")?,
            diagnoses: self.diagnoses,
            treatments: self.treatments,
        })
    }
}
