//! `report` command: validation, patient or code usage report as JSON

use super::{report_failure, CommandContext};
use crate::core::analytics::{generate_report, ReportRange, ReportRequest, ReportType};
use crate::core::export::write_export;
use crate::domain::{CodeSystem, Result};
use chrono::Utc;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the report command
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// validation, patient or code-usage
    #[arg(short = 't', long = "type", default_value = "validation")]
    pub report_type: ReportType,

    /// last7days, last30days, last3months or lastyear; anything else means last30days
    #[arg(short, long, default_value = "last30days")]
    pub range: ReportRange,

    /// Restrict to patients with codes in this system
    #[arg(long)]
    pub code_system: Option<CodeSystem>,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl ReportArgs {
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        match self.run(config_path).await {
            Ok(()) => Ok(0),
            Err(e) => Ok(report_failure(&e)),
        }
    }

    async fn run(&self, config_path: &str) -> Result<()> {
        let ctx = CommandContext::load(config_path)?;
        let (_, records) = ctx.fetch_records().await?;

        let request = ReportRequest {
            report_type: self.report_type,
            range: self.range,
            code_system: self.code_system,
        };
        let report = generate_report(&records, &request, Utc::now())?;
        let json = serde_json::to_string_pretty(&report)?;

        match &self.output {
            Some(path) => {
                let dir = path
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("."));
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| "report.json".to_string());
                let written = write_export(&dir, &file_name, json.as_bytes())?;
                println!("✅ {} written to {}", report.name, written.display());
            }
            None => println!("{json}"),
        }
        Ok(())
    }
}
