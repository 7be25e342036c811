//! File exports of patient lists and rejected codes
//!
//! - [`csv`] - fixed-header CSV
//! - [`json`] - pretty-printed camelCase JSON
//! - [`pdf`] - the printable patient report
//!
//! Rendering returns bytes; [`write_export`] puts them on disk.

pub mod csv;
pub mod json;
pub mod pdf;

use crate::core::rejected::RejectedCode;
use crate::domain::{MedicodeError, PatientRecord, Result};
use chrono::{DateTime, Utc};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = MedicodeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pdf" => Ok(Self::Pdf),
            _ => Err(MedicodeError::InvalidInput(format!(
                "Unknown export format: {s}. Must be one of: csv, json, pdf"
            ))),
        }
    }
}

/// What is being exported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Patients,
    Rejected,
}

impl FromStr for ExportKind {
    type Err = MedicodeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "patients" | "patient" => Ok(Self::Patients),
            "rejected" | "rejected-codes" => Ok(Self::Rejected),
            _ => Err(MedicodeError::InvalidInput(format!(
                "Unknown export kind: {s}. Must be one of: patients, rejected"
            ))),
        }
    }
}

/// File name used when the caller does not pick one
pub fn default_file_name(kind: ExportKind, format: ExportFormat, now: DateTime<Utc>) -> String {
    match (kind, format) {
        (ExportKind::Patients, ExportFormat::Pdf) => "medicode_patient_report.pdf".to_string(),
        (ExportKind::Patients, format) => format!("medicode_patients.{}", format.extension()),
        (ExportKind::Rejected, format) => format!(
            "rejected-codes-{}.{}",
            now.format("%Y-%m-%d"),
            format.extension()
        ),
    }
}

pub fn render_patients(
    records: &[PatientRecord],
    format: ExportFormat,
    now: DateTime<Utc>,
) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Csv => csv::patients_csv(records),
        ExportFormat::Json => json::to_pretty_json(records),
        ExportFormat::Pdf => pdf::patient_report_pdf(records, now),
    }
}

/// # Errors
///
/// Rejected codes have no PDF layout; asking for one is `Export`.
pub fn render_rejected(codes: &[RejectedCode], format: ExportFormat) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Csv => csv::rejected_csv(codes),
        ExportFormat::Json => json::to_pretty_json(codes),
        ExportFormat::Pdf => Err(MedicodeError::Export(
            "rejected codes can be exported as csv or json only".to_string(),
        )),
    }
}

/// Writes `bytes` to `dir/file_name`, creating `dir` if needed
pub fn write_export(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| {
        MedicodeError::Export(format!(
            "Failed to create export directory {}: {e}",
            dir.display()
        ))
    })?;

    let path = dir.join(file_name);
    std::fs::write(&path, bytes)
        .map_err(|e| MedicodeError::Export(format!("Failed to write {}: {e}", path.display())))?;

    tracing::info!(path = %path.display(), bytes = bytes.len(), "Export written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use test_case::test_case;

    #[test_case(ExportKind::Patients, ExportFormat::Pdf, "medicode_patient_report.pdf")]
    #[test_case(ExportKind::Patients, ExportFormat::Csv, "medicode_patients.csv")]
    #[test_case(ExportKind::Patients, ExportFormat::Json, "medicode_patients.json")]
    #[test_case(ExportKind::Rejected, ExportFormat::Csv, "rejected-codes-2025-03-15.csv")]
    fn test_default_file_name(kind: ExportKind, format: ExportFormat, expected: &str) {
        let now = Utc.with_ymd_and_hms(2025, 3, 15, 8, 0, 0).unwrap();
        assert_eq!(default_file_name(kind, format, now), expected);
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("PDF".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert!("xlsx".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_rejected_pdf_is_refused() {
        assert!(matches!(
            render_rejected(&[], ExportFormat::Pdf),
            Err(MedicodeError::Export(_))
        ));
    }

    #[test]
    fn test_write_export_creates_directory() {
        let temp = tempfile::TempDir::new().unwrap();
        let dir = temp.path().join("out");
        let path = write_export(&dir, "a.json", b"[]\n").unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"[]\n");
    }
}
