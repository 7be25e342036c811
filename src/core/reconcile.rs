//! Reflecting confirmed remote changes in the local record set
//!
//! These functions never mutate their input. They are called only after the
//! backend has accepted a change, and return the collection as it should
//! look afterwards.

use crate::domain::{
    CodeEntry, EntryId, EntryKind, MedicodeError, PatientId, PatientRecord, Result,
    ValidationStatus,
};
use chrono::{DateTime, Utc};

/// The fields a status transition replaces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub status: ValidationStatus,
    pub validated_by: String,
    pub validated_at: DateTime<Utc>,
}

/// Where an entry lives inside a record collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryLocation {
    pub patient_index: usize,
    pub kind: EntryKind,
    pub entry_index: usize,
}

/// Finds an entry by id across all diagnoses and treatments
///
/// # Errors
///
/// Returns `NotFound` if no record holds the id.
pub fn locate_entry(records: &[PatientRecord], entry_id: &EntryId) -> Result<EntryLocation> {
    records
        .iter()
        .enumerate()
        .find_map(|(patient_index, record)| {
            [EntryKind::Diagnosis, EntryKind::Treatment]
                .into_iter()
                .find_map(|kind| {
                    record
                        .entries_of(kind)
                        .iter()
                        .position(|e| &e.id == entry_id)
                        .map(|entry_index| EntryLocation {
                            patient_index,
                            kind,
                            entry_index,
                        })
                })
        })
        .ok_or_else(|| MedicodeError::NotFound(format!("code entry {entry_id}")))
}

/// Returns a copy of `records` with one entry's status fields replaced
///
/// Every other entry and record is carried over unchanged.
///
/// # Errors
///
/// Returns `NotFound` if the id is absent; `records` is left as it was.
pub fn apply_status_update(
    records: &[PatientRecord],
    entry_id: &EntryId,
    update: &StatusUpdate,
) -> Result<Vec<PatientRecord>> {
    let location = locate_entry(records, entry_id)?;

    let mut updated = records.to_vec();
    let entry = &mut updated[location.patient_index].entries_of_mut(location.kind)
        [location.entry_index];
    entry.status = update.status;
    entry.validated_by = update.validated_by.clone();
    entry.validation_date = update.validated_at;

    Ok(updated)
}

/// Returns a copy of `records` with `entry` placed first in the patient's
/// list for `kind`
///
/// # Errors
///
/// Returns `NotFound` if no record has `patient_id`.
pub fn insert_entry(
    records: &[PatientRecord],
    patient_id: &PatientId,
    kind: EntryKind,
    entry: CodeEntry,
) -> Result<Vec<PatientRecord>> {
    let index = records
        .iter()
        .position(|r| &r.id == patient_id)
        .ok_or_else(|| MedicodeError::NotFound(format!("patient {patient_id}")))?;

    let mut updated = records.to_vec();
    updated[index].entries_of_mut(kind).insert(0, entry);
    Ok(updated)
}

/// Returns a copy of `records` with a newly created patient first
///
/// A record already holding the same id is dropped so ids stay unique.
pub fn prepend_patient(records: &[PatientRecord], patient: PatientRecord) -> Vec<PatientRecord> {
    std::iter::once(patient.clone())
        .chain(records.iter().filter(|r| r.id != patient.id).cloned())
        .collect()
}
