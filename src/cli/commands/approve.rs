//! `approve-pending` command: bulk approval

use super::{report_failure, CommandContext};
use crate::core::review::{pending_entry_ids, ReviewWorkflow};
use crate::domain::{EntryId, MedicodeError, PatientId, PatientRecord, Result};
use clap::Args;
use std::sync::Arc;

/// Arguments for the approve-pending command
#[derive(Args, Debug)]
pub struct ApprovePendingArgs {
    /// Only approve this patient's pending codes
    #[arg(long, value_name = "ID")]
    pub patient: Option<PatientId>,
}

impl ApprovePendingArgs {
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        match self.run(config_path).await {
            Ok(code) => Ok(code),
            Err(e) => Ok(report_failure(&e)),
        }
    }

    async fn run(&self, config_path: &str) -> Result<i32> {
        let ctx = CommandContext::load(config_path)?;
        let (client, records) = ctx.fetch_records().await?;

        let ids = pending_in_scope(&records, self.patient.as_ref())?;
        if ids.is_empty() {
            println!("Nothing to approve: no pending codes.");
            return Ok(0);
        }

        println!("⏳ Approving {} pending code(s)...", ids.len());
        let workflow = ReviewWorkflow::new(Arc::new(client), ctx.user.clone());
        let outcome = workflow.approve_all(&records, &ids).await?;

        println!("✅ Approved: {}", outcome.approved.len());
        if outcome.is_complete() {
            return Ok(0);
        }

        println!("❌ Failed:   {}", outcome.failed.len());
        for (id, error) in &outcome.failed {
            println!("   {id}: {error}");
        }
        Ok(1)
    }
}

/// Pending ids across all records, or one patient's
///
/// # Errors
///
/// Returns `NotFound` when `patient` is given but not among `records`.
fn pending_in_scope(records: &[PatientRecord], patient: Option<&PatientId>) -> Result<Vec<EntryId>> {
    match patient {
        None => Ok(pending_entry_ids(records)),
        Some(id) => records
            .iter()
            .find(|r| &r.id == id)
            .map(|r| pending_entry_ids(std::slice::from_ref(r)))
            .ok_or_else(|| MedicodeError::NotFound(format!("patient {id}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::exit_code_for;
    use crate::domain::{CodeEntry, CodeSystem, ValidationStatus};
    use chrono::Utc;

    fn records() -> Vec<PatientRecord> {
        let entry = |id: &str, status| {
            CodeEntry::builder()
                .id(id)
                .unwrap()
                .code("1A00")
                .description("Cholera")
                .code_system(CodeSystem::Icd11)
                .status(status)
                .validation_date(Utc::now())
                .build()
                .unwrap()
        };
        vec![
            PatientRecord::builder()
                .id("p1")
                .unwrap()
                .name("Asha Verma")
                .patient_id("PT-1")
                .last_visit(Utc::now())
                .diagnosis(entry("d1", ValidationStatus::Pending))
                .build()
                .unwrap(),
            PatientRecord::builder()
                .id("p2")
                .unwrap()
                .name("Ravi Kumar")
                .patient_id("PT-2")
                .last_visit(Utc::now())
                .diagnosis(entry("d2", ValidationStatus::Approved))
                .treatment(entry("t2", ValidationStatus::Pending))
                .build()
                .unwrap(),
        ]
    }

    #[test]
    fn test_all_patients_in_scope() {
        let ids = pending_in_scope(&records(), None).unwrap();
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn test_one_patient_in_scope() {
        let ids = pending_in_scope(&records(), Some(&PatientId::new("p2").unwrap())).unwrap();
        assert_eq!(ids, vec![EntryId::new("t2").unwrap()]);
    }

    #[test]
    fn test_unknown_patient_is_not_found() {
        let err = pending_in_scope(&records(), Some(&PatientId::new("p9").unwrap())).unwrap_err();
        assert!(matches!(err, MedicodeError::NotFound(_)));
        assert_eq!(exit_code_for(&err), 1);
    }
}
