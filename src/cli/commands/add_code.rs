//! `add-code` command: attach a new pending code to a patient

use super::{report_failure, CommandContext};
use crate::adapters::api::NewCodeRequest;
use crate::core::review::ReviewWorkflow;
use crate::domain::{CodeSystem, EntryKind, PatientId, Result};
use clap::Args;
use std::sync::Arc;

/// Arguments for the add-code command
#[derive(Args, Debug)]
pub struct AddCodeArgs {
    /// Patient record ID
    #[arg(long, value_name = "ID")]
    pub patient: PatientId,

    /// diagnosis or treatment
    #[arg(long, default_value = "diagnosis")]
    pub kind: EntryKind,

    /// The code itself, e.g. 1A00
    #[arg(long)]
    pub code: String,

    #[arg(long)]
    pub description: String,

    /// icd-11 or namaste
    #[arg(long)]
    pub system: CodeSystem,
}

impl AddCodeArgs {
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        match self.run(config_path).await {
            Ok(()) => Ok(0),
            Err(e) => Ok(report_failure(&e)),
        }
    }

    async fn run(&self, config_path: &str) -> Result<()> {
        let ctx = CommandContext::load(config_path)?;
        let request = NewCodeRequest::pending(&self.code, &self.description, self.system);
        request.validate()?;

        let (client, records) = ctx.fetch_records().await?;
        let workflow = ReviewWorkflow::new(Arc::new(client), ctx.user.clone());
        let updated = workflow
            .add_code(&records, &self.patient, self.kind, &request)
            .await?;

        if let Some(entry) = updated
            .iter()
            .find(|r| r.id == self.patient)
            .and_then(|r| r.entries_of(self.kind).first())
        {
            println!(
                "✅ Added {} {} ({}) as {} [id {}]",
                self.kind, entry.code, entry.code_system, entry.status, entry.id
            );
        }
        Ok(())
    }
}
