//! Code review workflow
//!
//! Every change goes to the backend first. The local records are only
//! updated once the backend accepts it; on failure the caller keeps the
//! collection it passed in.

use crate::adapters::api::{NewCodeRequest, NewPatientRequest, RecordSource};
use crate::core::reconcile::{
    apply_status_update, insert_entry, locate_entry, prepend_patient, StatusUpdate,
};
use crate::domain::{
    EntryId, EntryKind, MedicodeError, PatientId, PatientRecord, Result, User, ValidationStatus,
};
use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;

/// One entry a bulk approval moved, with the status it had before
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Approval {
    pub entry_id: EntryId,
    pub previous: ValidationStatus,
}

/// Result of a bulk approval
#[derive(Debug)]
pub struct BulkReviewOutcome {
    /// Records with every successful approval applied
    pub records: Vec<PatientRecord>,
    pub approved: Vec<Approval>,
    pub failed: Vec<(EntryId, MedicodeError)>,
}

impl BulkReviewOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Applies review decisions on behalf of one user
pub struct ReviewWorkflow {
    source: Arc<dyn RecordSource>,
    reviewer: User,
}

impl ReviewWorkflow {
    pub fn new(source: Arc<dyn RecordSource>, reviewer: User) -> Self {
        Self { source, reviewer }
    }

    pub fn reviewer(&self) -> &User {
        &self.reviewer
    }

    fn ensure_reviewer(&self) -> Result<()> {
        if self.reviewer.can_review() {
            Ok(())
        } else {
            Err(MedicodeError::PermissionDenied(format!(
                "{} ({}) cannot approve or reject codes; admin or auditor role required",
                self.reviewer.name, self.reviewer.role
            )))
        }
    }

    /// Approves or rejects one entry
    ///
    /// # Errors
    ///
    /// - `PermissionDenied` unless the reviewer is an admin or auditor
    /// - `InvalidInput` when asked to move an entry back to pending
    /// - `NotFound` when the id is not in `records` (no remote call is made)
    /// - `RemoteFailure` when the backend refuses or cannot be reached
    pub async fn update_status(
        &self,
        records: &[PatientRecord],
        entry_id: &EntryId,
        status: ValidationStatus,
    ) -> Result<Vec<PatientRecord>> {
        self.ensure_reviewer()?;
        if status == ValidationStatus::Pending {
            return Err(MedicodeError::InvalidInput(
                "status can only be set to approved or rejected".to_string(),
            ));
        }

        let location = locate_entry(records, entry_id)?;
        let previous = records[location.patient_index].entries_of(location.kind)
            [location.entry_index]
            .status;

        self.source
            .update_status(location.kind, entry_id, status)
            .await
            .inspect_err(|e| {
                tracing::error!(entry_id = %entry_id, error = %e, "Status update failed");
            })?;

        let updated = apply_status_update(records, entry_id, &self.decision(status))?;
        crate::log_status_transition!(entry_id, previous, status, self.reviewer.name);
        Ok(updated)
    }

    /// Approves many entries at once
    ///
    /// Remote calls are issued concurrently. Each one that succeeds is
    /// reflected in the returned records; each failure is reported without
    /// affecting the others.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` before any call if the reviewer may not
    /// approve codes. Per-entry failures are reported in the outcome.
    pub async fn approve_all(
        &self,
        records: &[PatientRecord],
        entry_ids: &[EntryId],
    ) -> Result<BulkReviewOutcome> {
        self.ensure_reviewer()?;

        let mut failed = Vec::new();
        let mut targets = Vec::new();
        for id in entry_ids {
            match locate_entry(records, id) {
                Ok(location) => {
                    let previous = records[location.patient_index].entries_of(location.kind)
                        [location.entry_index]
                        .status;
                    targets.push((id.clone(), location.kind, previous));
                }
                Err(e) => failed.push((id.clone(), e)),
            }
        }

        let calls = targets.iter().map(|(id, kind, previous)| async move {
            let result = self
                .source
                .update_status(*kind, id, ValidationStatus::Approved)
                .await;
            (id.clone(), *previous, result)
        });
        let results = join_all(calls).await;

        let decision = self.decision(ValidationStatus::Approved);
        let mut current = records.to_vec();
        let mut approved = Vec::new();
        for (id, previous, result) in results {
            match result {
                Ok(()) => {
                    current = apply_status_update(&current, &id, &decision)?;
                    crate::log_status_transition!(
                        id,
                        previous,
                        ValidationStatus::Approved,
                        self.reviewer.name
                    );
                    approved.push(Approval {
                        entry_id: id,
                        previous,
                    });
                }
                Err(e) => {
                    tracing::warn!(entry_id = %id, error = %e, "Bulk approval failed for entry");
                    failed.push((id, e));
                }
            }
        }

        tracing::info!(
            requested = entry_ids.len(),
            approved = approved.len(),
            failed = failed.len(),
            "Bulk approval finished"
        );

        Ok(BulkReviewOutcome {
            records: current,
            approved,
            failed,
        })
    }

    /// Attaches a new pending code to a patient
    ///
    /// The entry the backend returns is inserted first in the matching list.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a blank code or description, `NotFound` when the
    /// patient is not in `records`, `RemoteFailure` when the backend refuses.
    pub async fn add_code(
        &self,
        records: &[PatientRecord],
        patient_id: &PatientId,
        kind: EntryKind,
        request: &NewCodeRequest,
    ) -> Result<Vec<PatientRecord>> {
        request.validate()?;
        if !records.iter().any(|r| &r.id == patient_id) {
            return Err(MedicodeError::NotFound(format!("patient {patient_id}")));
        }

        let entry = self.source.add_code(patient_id, kind, request).await?;
        tracing::info!(
            patient_id = %patient_id,
            kind = %kind,
            entry_id = %entry.id,
            code = %entry.code,
            added_by = %self.reviewer.name,
            "Code added"
        );
        insert_entry(records, patient_id, kind, entry)
    }

    /// Registers a new patient
    ///
    /// The record the backend returns goes first in the returned collection.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a blank name or hospital number, `RemoteFailure`
    /// when the backend refuses.
    pub async fn add_patient(
        &self,
        records: &[PatientRecord],
        request: &NewPatientRequest,
    ) -> Result<(PatientRecord, Vec<PatientRecord>)> {
        request.validate()?;

        let created = self.source.create_patient(request).await.inspect_err(|e| {
            tracing::error!(patient_id = %request.patient_id, error = %e, "Patient creation failed");
        })?;
        tracing::info!(
            id = %created.id,
            patient_id = %created.patient_id,
            added_by = %self.reviewer.name,
            "Patient added"
        );
        let updated = prepend_patient(records, created.clone());
        Ok((created, updated))
    }

    fn decision(&self, status: ValidationStatus) -> StatusUpdate {
        StatusUpdate {
            status,
            validated_by: self.reviewer.name.clone(),
            validated_at: Utc::now(),
        }
    }
}

/// Ids of every pending entry, diagnoses before treatments per patient
pub fn pending_entry_ids(records: &[PatientRecord]) -> Vec<EntryId> {
    records
        .iter()
        .flat_map(|r| r.entries())
        .filter(|e| e.status == ValidationStatus::Pending)
        .map(|e| e.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ApiError, CodeEntry, CodeSystem, Gender, Role};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Accepts everything except ids listed in `reject`
    struct FakeSource {
        reject: Vec<String>,
        calls: Mutex<Vec<(EntryKind, String, ValidationStatus)>>,
        created: Mutex<Vec<String>>,
    }

    impl FakeSource {
        fn new(reject: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                reject: reject.iter().map(|s| s.to_string()).collect(),
                calls: Mutex::new(Vec::new()),
                created: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl RecordSource for FakeSource {
        async fn fetch_patients(&self) -> Result<Vec<PatientRecord>> {
            Ok(Vec::new())
        }

        async fn fetch_patient(&self, id: &PatientId) -> Result<PatientRecord> {
            Err(MedicodeError::NotFound(id.to_string()))
        }

        async fn update_status(
            &self,
            kind: EntryKind,
            entry_id: &EntryId,
            status: ValidationStatus,
        ) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push((kind, entry_id.to_string(), status));
            if self.reject.iter().any(|r| r == entry_id.as_str()) {
                return Err(ApiError::from_status(500, "boom").into());
            }
            Ok(())
        }

        async fn create_patient(&self, request: &NewPatientRequest) -> Result<PatientRecord> {
            self.created.lock().unwrap().push(request.patient_id.clone());
            if self.reject.iter().any(|r| r == &request.patient_id) {
                return Err(ApiError::from_status(400, "duplicate patient_id").into());
            }
            Ok(PatientRecord::builder()
                .id("server-p")
                .unwrap()
                .name(request.name.clone())
                .age(request.age)
                .gender(request.gender)
                .patient_id(request.patient_id.clone())
                .last_visit(request.last_visit)
                .build()
                .unwrap())
        }

        async fn add_code(
            &self,
            _patient_id: &PatientId,
            _kind: EntryKind,
            request: &NewCodeRequest,
        ) -> Result<CodeEntry> {
            Ok(CodeEntry::builder()
                .id("server-1")
                .unwrap()
                .code(request.code.clone())
                .description(request.description.clone())
                .code_system(request.code_system)
                .validation_date(Utc::now())
                .build()
                .unwrap())
        }

        fn base_url(&self) -> &str {
            "http://fake"
        }
    }

    fn user(role: Role) -> User {
        User {
            id: "u1".to_string(),
            name: "Dr. Evelyn Reed".to_string(),
            email: "reed@medicode.test".to_string(),
            role,
        }
    }

    fn entry(id: &str) -> CodeEntry {
        CodeEntry::builder()
            .id(id)
            .unwrap()
            .code("NAM01")
            .description("Vata imbalance")
            .code_system(CodeSystem::Namaste)
            .validation_date(Utc::now())
            .build()
            .unwrap()
    }

    fn records() -> Vec<PatientRecord> {
        vec![PatientRecord::builder()
            .id("p1")
            .unwrap()
            .name("Asha Verma")
            .patient_id("PT-1")
            .last_visit(Utc::now())
            .diagnosis(entry("d1"))
            .treatment(entry("t1"))
            .build()
            .unwrap()]
    }

    #[tokio::test]
    async fn test_doctor_cannot_review() {
        let source = FakeSource::new(&[]);
        let workflow = ReviewWorkflow::new(source.clone(), user(Role::Doctor));

        let err = workflow
            .update_status(&records(), &EntryId::new("d1").unwrap(), ValidationStatus::Approved)
            .await
            .unwrap_err();
        assert!(matches!(err, MedicodeError::PermissionDenied(_)));
        assert!(source.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_entry_makes_no_remote_call() {
        let source = FakeSource::new(&[]);
        let workflow = ReviewWorkflow::new(source.clone(), user(Role::Auditor));

        let err = workflow
            .update_status(&records(), &EntryId::new("zz").unwrap(), ValidationStatus::Rejected)
            .await
            .unwrap_err();
        assert!(matches!(err, MedicodeError::NotFound(_)));
        assert!(source.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pending_target_is_invalid() {
        let workflow = ReviewWorkflow::new(FakeSource::new(&[]), user(Role::Admin));
        let err = workflow
            .update_status(&records(), &EntryId::new("d1").unwrap(), ValidationStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(err, MedicodeError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_treatment_uses_treatment_endpoint() {
        let source = FakeSource::new(&[]);
        let workflow = ReviewWorkflow::new(source.clone(), user(Role::Admin));

        workflow
            .update_status(&records(), &EntryId::new("t1").unwrap(), ValidationStatus::Rejected)
            .await
            .unwrap();
        let calls = source.calls.lock().unwrap();
        assert_eq!(calls[0].0, EntryKind::Treatment);
    }

    #[tokio::test]
    async fn test_approve_all_reports_partial_failure() {
        let source = FakeSource::new(&["t1"]);
        let workflow = ReviewWorkflow::new(source, user(Role::Admin));
        let ids = vec![
            EntryId::new("d1").unwrap(),
            EntryId::new("t1").unwrap(),
            EntryId::new("missing").unwrap(),
        ];

        let outcome = workflow.approve_all(&records(), &ids).await.unwrap();

        assert!(!outcome.is_complete());
        assert_eq!(
            outcome.approved,
            vec![Approval {
                entry_id: EntryId::new("d1").unwrap(),
                previous: ValidationStatus::Pending,
            }]
        );
        assert_eq!(outcome.failed.len(), 2);
        assert_eq!(outcome.records[0].diagnoses[0].status, ValidationStatus::Approved);
        assert_eq!(outcome.records[0].treatments[0].status, ValidationStatus::Pending);
    }

    #[tokio::test]
    async fn test_approve_all_keeps_each_previous_status() {
        let mut seeded = records();
        seeded[0].treatments[0].status = ValidationStatus::Rejected;
        let workflow = ReviewWorkflow::new(FakeSource::new(&[]), user(Role::Auditor));
        let ids = vec![EntryId::new("d1").unwrap(), EntryId::new("t1").unwrap()];

        let outcome = workflow.approve_all(&seeded, &ids).await.unwrap();

        let previous: Vec<(&str, ValidationStatus)> = outcome
            .approved
            .iter()
            .map(|a| (a.entry_id.as_str(), a.previous))
            .collect();
        assert_eq!(
            previous,
            vec![
                ("d1", ValidationStatus::Pending),
                ("t1", ValidationStatus::Rejected),
            ]
        );
        assert_eq!(outcome.records[0].treatments[0].status, ValidationStatus::Approved);
    }

    #[tokio::test]
    async fn test_add_code_inserts_server_entry_first() {
        let workflow = ReviewWorkflow::new(FakeSource::new(&[]), user(Role::Doctor));
        let request = NewCodeRequest::pending("1A00", "Cholera", CodeSystem::Icd11);

        let updated = workflow
            .add_code(&records(), &PatientId::new("p1").unwrap(), EntryKind::Diagnosis, &request)
            .await
            .unwrap();
        assert_eq!(updated[0].diagnoses[0].id.as_str(), "server-1");
        assert_eq!(updated[0].diagnoses.len(), 2);
    }

    #[tokio::test]
    async fn test_add_patient_puts_created_record_first() {
        let source = FakeSource::new(&[]);
        let workflow = ReviewWorkflow::new(source.clone(), user(Role::Doctor));
        let request = NewPatientRequest::new("Meera Nair", 31, Gender::Female, Some("P12345".into()));

        let (created, updated) = workflow.add_patient(&records(), &request).await.unwrap();

        assert_eq!(created.id.as_str(), "server-p");
        assert_eq!(updated.len(), 2);
        assert_eq!(updated[0], created);
        assert_eq!(updated[1].id.as_str(), "p1");
        assert_eq!(*source.created.lock().unwrap(), vec!["P12345".to_string()]);
    }

    #[tokio::test]
    async fn test_add_patient_failure_makes_no_local_change() {
        let source = FakeSource::new(&["P12345"]);
        let workflow = ReviewWorkflow::new(source, user(Role::Admin));
        let request = NewPatientRequest::new("Meera Nair", 31, Gender::Female, Some("P12345".into()));

        let err = workflow.add_patient(&records(), &request).await.unwrap_err();
        assert!(matches!(err, MedicodeError::RemoteFailure(_)));
    }

    #[tokio::test]
    async fn test_add_patient_blank_name_makes_no_remote_call() {
        let source = FakeSource::new(&[]);
        let workflow = ReviewWorkflow::new(source.clone(), user(Role::Admin));
        let request = NewPatientRequest::new(" ", 31, Gender::Other, None);

        let err = workflow.add_patient(&records(), &request).await.unwrap_err();
        assert!(matches!(err, MedicodeError::InvalidInput(_)));
        assert!(source.created.lock().unwrap().is_empty());
    }

    #[test]
    fn test_pending_entry_ids() {
        let ids = pending_entry_ids(&records());
        assert_eq!(ids.len(), 2);
    }
}
