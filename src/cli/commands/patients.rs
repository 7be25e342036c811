//! `patients` command: the dashboard list, or one patient's codes

use super::{report_failure, CommandContext};
use crate::adapters::api::RecordSource;
use crate::core::filter::{DashboardStats, PatientFilter};
use crate::domain::{CodeSystem, PatientId, PatientRecord, Result, ValidationStatus};
use clap::Args;

/// Arguments for the patients command
#[derive(Args, Debug)]
pub struct PatientsArgs {
    /// Show one patient's diagnoses and treatments instead of the list
    #[arg(long, value_name = "ID")]
    pub id: Option<PatientId>,

    /// Case-insensitive search on name or patient ID
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only patients with an entry in this status
    #[arg(long)]
    pub status: Option<ValidationStatus>,

    /// Only patients with an entry in this code system (icd-11, namaste)
    #[arg(long)]
    pub code_system: Option<CodeSystem>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl PatientsArgs {
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        match self.run(config_path).await {
            Ok(()) => Ok(0),
            Err(e) => Ok(report_failure(&e)),
        }
    }

    async fn run(&self, config_path: &str) -> Result<()> {
        let ctx = CommandContext::load(config_path)?;

        if let Some(id) = &self.id {
            let record = ctx.client()?.fetch_patient(id).await?;
            if self.json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                print_patient(&record);
            }
            return Ok(());
        }

        let (_, records) = ctx.fetch_records().await?;
        let filter = PatientFilter {
            search: self.search.clone(),
            status: self.status,
            code_system: self.code_system,
        };
        let matched = filter.apply(&records);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&matched)?);
            return Ok(());
        }

        let stats = DashboardStats::from_records(&records);
        println!("📋 Patients");
        println!();
        println!(
            "  Total: {}   Approved: {}   Rejected: {}   Pending: {}",
            stats.total_patients, stats.approved, stats.rejected, stats.pending
        );
        println!();

        if matched.is_empty() {
            println!("No patients match the current filters.");
            return Ok(());
        }

        println!(
            "{:<38} {:<12} {:<24} {:>4} {:<7} {:<11} {:>5} {:>5}",
            "ID", "Patient ID", "Name", "Age", "Gender", "Last Visit", "Dx", "Tx"
        );
        println!("{}", "─".repeat(114));
        for record in &matched {
            println!(
                "{:<38} {:<12} {:<24} {:>4} {:<7} {:<11} {:>5} {:>5}",
                record.id.as_str(),
                record.patient_id,
                record.name,
                record.age,
                record.gender.as_str(),
                record.last_visit.format("%Y-%m-%d").to_string(),
                record.diagnoses.len(),
                record.treatments.len()
            );
        }
        println!();
        println!("Showing {} of {} patients", matched.len(), records.len());
        Ok(())
    }
}

fn print_patient(record: &PatientRecord) {
    println!("🧑 {} ({})", record.name, record.patient_id);
    println!(
        "   Age: {}   Gender: {}   Last visit: {}",
        record.age,
        record.gender.as_str(),
        record.last_visit.format("%Y-%m-%d")
    );

    for (title, entries) in [("Diagnoses", &record.diagnoses), ("Treatments", &record.treatments)] {
        println!();
        println!("{title}:");
        if entries.is_empty() {
            println!("  (none)");
        }
        for entry in entries {
            println!(
                "  [{:<8}] {:<10} {:<8} {}  (id {}, by {} on {})",
                entry.status.as_str(),
                entry.code,
                entry.code_system.as_str(),
                entry.description,
                entry.id,
                entry.validated_by,
                entry.validation_date.format("%Y-%m-%d")
            );
        }
    }
}
