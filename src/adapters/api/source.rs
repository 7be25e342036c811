//! Record source trait definition
//!
//! `RecordSource` abstracts the backend that owns patient records. The
//! HTTP implementation is [`ApiClient`](super::ApiClient); tests substitute
//! in-memory fakes.

use super::models::{NewCodeRequest, NewPatientRequest};
use crate::domain::{CodeEntry, EntryId, EntryKind, PatientId, PatientRecord, Result, ValidationStatus};
use async_trait::async_trait;

/// Remote store of patient records and their code entries
///
/// # Example
///
/// ```no_run
/// use medicode::adapters::api::{ApiClient, RecordSource};
/// use medicode::config::ApiConfig;
///
/// # async fn example() -> medicode::domain::Result<()> {
/// let client = ApiClient::new(ApiConfig::default())?;
/// let patients = client.fetch_patients().await?;
/// println!("Fetched {} patients", patients.len());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch every patient with nested diagnoses and treatments
    ///
    /// # Errors
    ///
    /// `RemoteFailure` when the request fails, `InvalidInput` when the payload
    /// does not map to valid records.
    async fn fetch_patients(&self) -> Result<Vec<PatientRecord>>;

    /// Fetch a single patient
    ///
    /// # Errors
    ///
    /// `NotFound` when the backend answers 404.
    async fn fetch_patient(&self, id: &PatientId) -> Result<PatientRecord>;

    /// Set the status of one diagnosis or treatment on the backend
    async fn update_status(
        &self,
        kind: EntryKind,
        entry_id: &EntryId,
        status: ValidationStatus,
    ) -> Result<()>;

    /// Register a new patient, returning the record the backend created
    async fn create_patient(&self, request: &NewPatientRequest) -> Result<PatientRecord>;

    /// Attach a new code to a patient, returning the entry the backend created
    async fn add_code(
        &self,
        patient_id: &PatientId,
        kind: EntryKind,
        request: &NewCodeRequest,
    ) -> Result<CodeEntry>;

    /// Base URL of the backend
    fn base_url(&self) -> &str;
}
