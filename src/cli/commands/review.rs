//! `review` command: approve or reject a single code

use super::{report_failure, CommandContext};
use crate::core::review::ReviewWorkflow;
use crate::domain::{EntryId, Result, ValidationStatus};
use clap::Args;
use std::sync::Arc;

/// Arguments for the review command
#[derive(Args, Debug)]
pub struct ReviewArgs {
    /// Diagnosis or treatment ID
    pub entry_id: EntryId,

    /// New status: approved or rejected
    #[arg(short, long)]
    pub status: ValidationStatus,
}

impl ReviewArgs {
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        match self.run(config_path).await {
            Ok(()) => Ok(0),
            Err(e) => Ok(report_failure(&e)),
        }
    }

    async fn run(&self, config_path: &str) -> Result<()> {
        let ctx = CommandContext::load(config_path)?;
        let (client, records) = ctx.fetch_records().await?;
        let workflow = ReviewWorkflow::new(Arc::new(client), ctx.user.clone());

        let updated = workflow
            .update_status(&records, &self.entry_id, self.status)
            .await?;

        let entry = updated
            .iter()
            .flat_map(|r| r.entries().map(move |e| (r, e)))
            .find(|(_, e)| e.id == self.entry_id);
        if let Some((record, entry)) = entry {
            println!(
                "✅ {} ({}) for {} is now {}",
                entry.code, entry.code_system, record.name, entry.status
            );
            println!("   Validated by {}", entry.validated_by);
        }
        Ok(())
    }
}
