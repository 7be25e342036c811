//! Users and their review permissions

use super::errors::MedicodeError;
use super::result::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Doctor,
    Admin,
    MedicalCoder,
    Auditor,
}

impl Role {
    /// Whether this role may approve or reject codes
    pub fn can_review(&self) -> bool {
        matches!(self, Role::Admin | Role::Auditor)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Doctor => "doctor",
            Role::Admin => "admin",
            Role::MedicalCoder => "medical_coder",
            Role::Auditor => "auditor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = MedicodeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "doctor" => Ok(Self::Doctor),
            "admin" => Ok(Self::Admin),
            "medical_coder" => Ok(Self::MedicalCoder),
            "auditor" => Ok(Self::Auditor),
            _ => Err(MedicodeError::InvalidInput(format!(
                "Unknown role: {s}. Expected one of: doctor, admin, medical_coder, auditor"
            ))),
        }
    }
}

/// An authenticated person using the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl User {
    pub fn can_review(&self) -> bool {
        self.role.can_review()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_admin_and_auditor_review() {
        assert!(Role::Admin.can_review());
        assert!(Role::Auditor.can_review());
        assert!(!Role::Doctor.can_review());
        assert!(!Role::MedicalCoder.can_review());
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("medical-coder".parse::<Role>().unwrap(), Role::MedicalCoder);
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert!("nurse".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde_snake_case() {
        let json = serde_json::to_string(&Role::MedicalCoder).unwrap();
        assert_eq!(json, "\"medical_coder\"");
    }
}
