//! HTTP implementation of [`RecordSource`]
//!
//! Talks to the MediCode REST backend with `reqwest`. Every failed request
//! surfaces immediately as an error; nothing is retried.

use super::models::{
    map_entry_payload, map_patient_payload, map_single_patient, NewCodeRequest, NewPatientRequest,
    StatusUpdateRequest,
};
use super::source::RecordSource;
use crate::config::{ApiConfig, SecretString};
use crate::domain::{
    ApiError, CodeEntry, EntryId, EntryKind, MedicodeError, PatientId, PatientRecord, Result,
    ValidationStatus,
};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder, Response, StatusCode};
use secrecy::ExposeSecret;
use std::time::{Duration, Instant};

/// REST client for the MediCode backend
///
/// # Example
///
/// ```no_run
/// use medicode::adapters::api::ApiClient;
/// use medicode::config::ApiConfig;
///
/// let config = ApiConfig {
///     base_url: "https://medicode.example.com/api".to_string(),
///     ..Default::default()
/// };
/// let client = ApiClient::new(config).unwrap();
/// ```
pub struct ApiClient {
    base_url: String,
    client: Client,
    api_token: Option<SecretString>,
}

impl ApiClient {
    /// Builds the client from configuration
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the HTTP client cannot be constructed.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let mut client_builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.timeout_seconds.min(30)));

        if !config.tls_verify {
            tracing::warn!(
                base_url = %config.base_url,
                "TLS certificate verification is disabled"
            );
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder.build().map_err(|e| {
            MedicodeError::Configuration(format!("Failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            api_token: config.api_token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token.expose_secret().as_ref()),
            None => request,
        }
    }

    /// Sends the request and turns transport failures and non-2xx statuses
    /// into [`ApiError`]s
    async fn send(&self, request: RequestBuilder, operation: &str) -> Result<Response> {
        let resp = self.authorized(request).send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout(format!("{operation}: {e}"))
            } else {
                ApiError::ConnectionFailed(format!("{operation}: {e}"))
            }
        })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        tracing::warn!(
            operation = operation,
            status = status.as_u16(),
            "Request rejected by server"
        );
        Err(ApiError::from_status(status.as_u16(), format!("{operation} failed: {body}")).into())
    }

    async fn json(resp: Response) -> Result<serde_json::Value> {
        resp.json::<serde_json::Value>()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()).into())
    }
}

/// Collection segment for entry-scoped endpoints
fn collection(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Diagnosis => "diagnoses",
        EntryKind::Treatment => "treatments",
    }
}

/// Patient action that attaches a new entry of `kind`
fn add_action(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Diagnosis => "add_diagnosis",
        EntryKind::Treatment => "add_treatment",
    }
}

#[async_trait]
impl RecordSource for ApiClient {
    async fn fetch_patients(&self) -> Result<Vec<PatientRecord>> {
        let started = Instant::now();
        let url = self.url("patients/");
        tracing::debug!(url = %url, "Fetching patients");

        let resp = self.send(self.client.get(&url), "fetch patients").await?;
        let records = map_patient_payload(Self::json(resp).await?)?;

        crate::log_fetch_complete!(records.len(), started.elapsed());
        Ok(records)
    }

    async fn fetch_patient(&self, id: &PatientId) -> Result<PatientRecord> {
        let url = self.url(&format!("patients/{id}/"));
        tracing::debug!(url = %url, patient_id = %id, "Fetching patient");

        let resp = match self.send(self.client.get(&url), "fetch patient").await {
            Err(MedicodeError::RemoteFailure(err))
                if err.status() == Some(StatusCode::NOT_FOUND.as_u16()) =>
            {
                return Err(MedicodeError::NotFound(format!("patient {id}")));
            }
            other => other?,
        };

        map_single_patient(Self::json(resp).await?)
    }

    async fn update_status(
        &self,
        kind: EntryKind,
        entry_id: &EntryId,
        status: ValidationStatus,
    ) -> Result<()> {
        let url = self.url(&format!("{}/{entry_id}/update_status/", collection(kind)));
        tracing::debug!(url = %url, status = %status, "Updating entry status");

        self.send(
            self.client.post(&url).json(&StatusUpdateRequest { status }),
            "update status",
        )
        .await?;
        Ok(())
    }

    async fn create_patient(&self, request: &NewPatientRequest) -> Result<PatientRecord> {
        request.validate()?;
        let url = self.url("patients/");
        tracing::debug!(url = %url, patient_id = %request.patient_id, "Creating patient");

        let resp = self
            .send(self.client.post(&url).json(request), "create patient")
            .await?;
        map_single_patient(Self::json(resp).await?)
    }

    async fn add_code(
        &self,
        patient_id: &PatientId,
        kind: EntryKind,
        request: &NewCodeRequest,
    ) -> Result<CodeEntry> {
        request.validate()?;
        let url = self.url(&format!("patients/{patient_id}/{}/", add_action(kind)));
        tracing::debug!(url = %url, code = %request.code, "Adding code");

        let resp = self
            .send(self.client.post(&url).json(request), "add code")
            .await?;
        map_entry_payload(Self::json(resp).await?)
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
