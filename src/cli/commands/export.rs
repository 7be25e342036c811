//! `export` command: patients or rejected codes to CSV, JSON or PDF

use super::{report_failure, CommandContext};
use crate::core::export::{
    default_file_name, render_patients, render_rejected, write_export, ExportFormat, ExportKind,
};
use crate::core::filter::PatientFilter;
use crate::core::rejected::{collect_rejected, search_rejected};
use crate::domain::{CodeSystem, Result, ValidationStatus};
use chrono::Utc;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// patients or rejected
    #[arg(short, long, default_value = "patients")]
    pub kind: ExportKind,

    /// csv, json or pdf
    #[arg(short, long, default_value = "csv")]
    pub format: ExportFormat,

    /// Directory to write to (defaults to export.output_dir)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// File name inside the output directory
    #[arg(long)]
    pub file_name: Option<String>,

    /// Search term; applies the same matching as `patients` or `rejected`
    #[arg(short, long)]
    pub search: Option<String>,

    /// Patients only: keep patients with an entry in this status
    #[arg(long)]
    pub status: Option<ValidationStatus>,

    /// Patients only: keep patients with an entry in this code system
    #[arg(long)]
    pub code_system: Option<CodeSystem>,
}

impl ExportArgs {
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        match self.run(config_path).await {
            Ok(()) => Ok(0),
            Err(e) => Ok(report_failure(&e)),
        }
    }

    async fn run(&self, config_path: &str) -> Result<()> {
        let ctx = CommandContext::load(config_path)?;
        let (_, records) = ctx.fetch_records().await?;
        let now = Utc::now();

        let (bytes, count) = match self.kind {
            ExportKind::Patients => {
                let filter = PatientFilter {
                    search: self.search.clone(),
                    status: self.status,
                    code_system: self.code_system,
                };
                let selected = filter.apply(&records);
                (render_patients(&selected, self.format, now)?, selected.len())
            }
            ExportKind::Rejected => {
                let codes = search_rejected(
                    &collect_rejected(&records),
                    self.search.as_deref().unwrap_or_default(),
                );
                (render_rejected(&codes, self.format)?, codes.len())
            }
        };

        let dir = self
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(&ctx.config.export.output_dir));
        let file_name = self
            .file_name
            .clone()
            .unwrap_or_else(|| default_file_name(self.kind, self.format, now));

        let path = write_export(&dir, &file_name, &bytes)?;
        println!(
            "✅ Exported {count} row(s) as {} to {}",
            self.format,
            path.display()
        );
        Ok(())
    }
}
