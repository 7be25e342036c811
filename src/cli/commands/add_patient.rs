//! `add-patient` command: register a patient, optionally with a first code

use super::{report_failure, CommandContext};
use crate::adapters::api::{NewCodeRequest, NewPatientRequest};
use crate::core::review::ReviewWorkflow;
use crate::domain::{CodeSystem, EntryKind, Gender, Result};
use clap::Args;
use std::sync::Arc;

/// Arguments for the add-patient command
#[derive(Args, Debug)]
pub struct AddPatientArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub age: u32,

    /// male, female or other
    #[arg(long, default_value = "other")]
    pub gender: Gender,

    /// Hospital number; generated as P<5 digits> when omitted
    #[arg(long, value_name = "NUMBER")]
    pub patient_id: Option<String>,

    /// First code to attach once the patient exists
    #[arg(long, requires_all = ["description", "system"])]
    pub code: Option<String>,

    #[arg(long, requires = "code")]
    pub description: Option<String>,

    /// icd-11 or namaste
    #[arg(long, requires = "code")]
    pub system: Option<CodeSystem>,

    /// diagnosis or treatment
    #[arg(long, default_value = "diagnosis")]
    pub kind: EntryKind,
}

impl AddPatientArgs {
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        match self.run(config_path).await {
            Ok(()) => Ok(0),
            Err(e) => Ok(report_failure(&e)),
        }
    }

    fn initial_code(&self) -> Option<NewCodeRequest> {
        match (&self.code, &self.description, self.system) {
            (Some(code), Some(description), Some(system)) => {
                Some(NewCodeRequest::pending(code, description, system))
            }
            _ => None,
        }
    }

    async fn run(&self, config_path: &str) -> Result<()> {
        let ctx = CommandContext::load(config_path)?;
        let request =
            NewPatientRequest::new(&self.name, self.age, self.gender, self.patient_id.clone());
        request.validate()?;
        let initial_code = self.initial_code();
        if let Some(code) = &initial_code {
            code.validate()?;
        }

        let (client, records) = ctx.fetch_records().await?;
        let workflow = ReviewWorkflow::new(Arc::new(client), ctx.user.clone());
        let (created, records) = workflow.add_patient(&records, &request).await?;

        println!(
            "✅ Added patient {} ({}) [id {}]",
            created.name, created.patient_id, created.id
        );
        println!("   {} patients loaded", records.len());

        if let Some(code) = initial_code {
            let updated = workflow
                .add_code(&records, &created.id, self.kind, &code)
                .await?;
            if let Some(entry) = updated
                .first()
                .and_then(|r| r.entries_of(self.kind).first())
            {
                println!(
                    "✅ Added {} {} ({}) as {} [id {}]",
                    self.kind, entry.code, entry.code_system, entry.status, entry.id
                );
            }
        }
        Ok(())
    }
}
