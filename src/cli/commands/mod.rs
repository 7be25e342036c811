//! CLI command implementations
//!
//! Each command's `execute` returns the process exit code:
//!
//! | code | meaning |
//! |------|---------|
//! | 0 | success |
//! | 1 | partial failure, or a request the backend or local state refused |
//! | 2 | configuration error |
//! | 3 | authentication, session or permission error |
//! | 4 | remote API failure |
//! | 5 | fatal error |

pub mod add_code;
pub mod add_patient;
pub mod analytics;
pub mod approve;
pub mod export;
pub mod init;
pub mod patients;
pub mod rejected;
pub mod report;
pub mod review;
pub mod session;
pub mod validate;

use crate::adapters::api::{ApiClient, RecordSource};
use crate::config::{load_config, MedicodeConfig};
use crate::core::session::{SessionContext, SessionStore};
use crate::domain::{MedicodeError, PatientRecord, Result, User};

/// Exit code for a failed command
pub fn exit_code_for(error: &MedicodeError) -> i32 {
    match error {
        MedicodeError::InvalidInput(_) | MedicodeError::NotFound(_) => 1,
        MedicodeError::Configuration(_) => 2,
        MedicodeError::Session(_) | MedicodeError::PermissionDenied(_) => 3,
        MedicodeError::RemoteFailure(_) => 4,
        MedicodeError::Export(_) | MedicodeError::Serialization(_) | MedicodeError::Io(_) => 5,
    }
}

/// Prints the failure and returns its exit code
pub(crate) fn report_failure(error: &MedicodeError) -> i32 {
    crate::log_error_with_context!(error, "Command failed");
    eprintln!("❌ {}", error.user_message());
    exit_code_for(error)
}

/// Configuration plus the logged-in user, what most commands start from
pub(crate) struct CommandContext {
    pub config: MedicodeConfig,
    pub user: User,
}

impl CommandContext {
    pub fn load(config_path: &str) -> Result<Self> {
        let config = load_config(config_path)?;
        let session = SessionContext::load(SessionStore::new(config.auth.session_file()))?;
        let user = session.require_user()?.clone();
        tracing::debug!(user = %user.email, role = %user.role, "Session loaded");
        Ok(Self { config, user })
    }

    pub fn client(&self) -> Result<ApiClient> {
        ApiClient::new(self.config.api.clone())
    }

    pub async fn fetch_records(&self) -> Result<(ApiClient, Vec<PatientRecord>)> {
        let client = self.client()?;
        let records = client.fetch_patients().await?;
        Ok((client, records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ApiError;
    use test_case::test_case;

    #[test_case(MedicodeError::InvalidInput("x".into()), 1)]
    #[test_case(MedicodeError::NotFound("x".into()), 1)]
    #[test_case(MedicodeError::Configuration("x".into()), 2)]
    #[test_case(MedicodeError::Session("x".into()), 3)]
    #[test_case(MedicodeError::PermissionDenied("x".into()), 3)]
    #[test_case(ApiError::Timeout("x".into()).into(), 4)]
    #[test_case(MedicodeError::Export("x".into()), 5)]
    fn test_exit_codes(error: MedicodeError, expected: i32) {
        assert_eq!(exit_code_for(&error), expected);
    }
}
