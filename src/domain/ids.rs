//! Domain identifier types with validation
//!
//! Newtype wrappers for the backend's identifiers. Each type keeps patient
//! ids and code-entry ids from being mixed up and rejects empty values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Patient record identifier (the backend's primary key)
///
/// Not to be confused with the hospital number carried in
/// [`PatientRecord::patient_id`](crate::domain::PatientRecord).
///
/// # Examples
///
/// ```
/// use medicode::domain::ids::PatientId;
/// use std::str::FromStr;
///
/// let id = PatientId::from_str("5b0f7c1e-2a7d-4f4e-9d1c-0d7d1c3e8a11").unwrap();
/// assert_eq!(id.as_str(), "5b0f7c1e-2a7d-4f4e-9d1c-0d7d1c3e8a11");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PatientId(String);

impl PatientId {
    /// Creates a new PatientId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Patient ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the patient ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PatientId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for PatientId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PatientId> for String {
    fn from(id: PatientId) -> Self {
        id.0
    }
}

impl AsRef<str> for PatientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Code entry identifier
///
/// Diagnosis and treatment ids are globally unique, so one id type serves
/// both lists.
///
/// # Examples
///
/// ```
/// use medicode::domain::ids::EntryId;
///
/// let id = EntryId::new("dx-42").unwrap();
/// assert_eq!(id.to_string(), "dx-42");
/// assert!(EntryId::new("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntryId(String);

impl EntryId {
    /// Creates a new EntryId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Entry ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the entry ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for EntryId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EntryId> for String {
    fn from(id: EntryId) -> Self {
        id.0
    }
}

impl AsRef<str> for EntryId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patient_id_rejects_empty() {
        assert!(PatientId::new("").is_err());
        assert!(PatientId::new("   ").is_err());
        assert!(PatientId::new("p-1").is_ok());
    }

    #[test]
    fn test_entry_id_serde_is_transparent() {
        let id = EntryId::new("tx-7").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"tx-7\"");

        let back: EntryId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_entry_id_deserialize_rejects_empty() {
        let result: Result<EntryId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }
}
