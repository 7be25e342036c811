//! `rejected` command: every rejected code with its patient

use super::{report_failure, CommandContext};
use crate::core::rejected::{collect_rejected, search_rejected, RejectedStats};
use crate::domain::Result;
use chrono::Utc;
use clap::Args;

/// Arguments for the rejected command
#[derive(Args, Debug)]
pub struct RejectedArgs {
    /// Case-insensitive search on code, patient name or validator
    #[arg(short, long)]
    pub search: Option<String>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl RejectedArgs {
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        match self.run(config_path).await {
            Ok(()) => Ok(0),
            Err(e) => Ok(report_failure(&e)),
        }
    }

    async fn run(&self, config_path: &str) -> Result<()> {
        let ctx = CommandContext::load(config_path)?;
        let (_, records) = ctx.fetch_records().await?;

        let all = collect_rejected(&records);
        let shown = search_rejected(&all, self.search.as_deref().unwrap_or_default());

        if self.json {
            println!("{}", serde_json::to_string_pretty(&shown)?);
            return Ok(());
        }

        let stats = RejectedStats::compute(&all, Utc::now());
        println!("🚫 Rejected codes");
        println!();
        println!("  Total: {}   Today: {}", stats.total, stats.today);
        println!();

        if shown.is_empty() {
            println!("No rejected codes found.");
            return Ok(());
        }

        println!(
            "{:<10} {:<8} {:<10} {:<24} {:<20} {:<16}",
            "Code", "System", "Kind", "Patient", "Validated By", "Date"
        );
        println!("{}", "─".repeat(93));
        for code in &shown {
            println!(
                "{:<10} {:<8} {:<10} {:<24} {:<20} {:<16}",
                code.code,
                code.code_system.as_str(),
                code.kind.as_str(),
                code.patient_name,
                code.validated_by,
                code.rejected_at.format("%Y-%m-%d %H:%M").to_string()
            );
        }
        Ok(())
    }
}
