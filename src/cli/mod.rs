//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for MediCode using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// MediCode - ICD-11 / NAMASTE coding validation client
#[derive(Parser, Debug)]
#[command(name = "medicode")]
#[command(version, about, long_about = None)]
#[command(author = "MediCode Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "medicode.toml", env = "MEDICODE_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "MEDICODE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in as a configured user
    Login(commands::session::LoginArgs),

    /// End the current session
    Logout(commands::session::LogoutArgs),

    /// Show the logged-in user
    Whoami(commands::session::WhoamiArgs),

    /// List patients with dashboard counts, or show one patient
    Patients(commands::patients::PatientsArgs),

    /// Code usage, status breakdown and trends over a date range
    Analytics(commands::analytics::AnalyticsArgs),

    /// Approve or reject a diagnosis or treatment code
    Review(commands::review::ReviewArgs),

    /// Approve every pending code (optionally for one patient)
    ApprovePending(commands::approve::ApprovePendingArgs),

    /// Add a new pending code to a patient
    AddCode(commands::add_code::AddCodeArgs),

    /// Register a new patient
    AddPatient(commands::add_patient::AddPatientArgs),

    /// List rejected codes
    Rejected(commands::rejected::RejectedArgs),

    /// Generate a validation, patient or code usage report
    Report(commands::report::ReportArgs),

    /// Export patients or rejected codes to CSV, JSON or PDF
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::analytics::{DateRange, ReportRange, ReportType};
    use crate::core::export::{ExportFormat, ExportKind};
    use crate::domain::{CodeSystem, EntryKind, Gender, ValidationStatus};

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["medicode", "whoami"]);
        assert_eq!(cli.config, "medicode.toml");
        assert!(matches!(cli.command, Commands::Whoami(_)));
    }

    #[test]
    fn test_cli_parse_with_config_and_log_level() {
        let cli = Cli::parse_from([
            "medicode",
            "--config",
            "custom.toml",
            "--log-level",
            "debug",
            "logout",
        ]);
        assert_eq!(cli.config, "custom.toml");
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_login() {
        let cli = Cli::parse_from([
            "medicode",
            "login",
            "--email",
            "reed@hospital.example",
            "--password",
            "pw",
        ]);
        match cli.command {
            Commands::Login(args) => assert_eq!(args.email, "reed@hospital.example"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_review() {
        let cli = Cli::parse_from(["medicode", "review", "dx-42", "--status", "rejected"]);
        match cli.command {
            Commands::Review(args) => {
                assert_eq!(args.entry_id.as_str(), "dx-42");
                assert_eq!(args.status, ValidationStatus::Rejected);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_analytics_range() {
        let cli = Cli::parse_from(["medicode", "analytics", "--range", "last3months"]);
        match cli.command {
            Commands::Analytics(args) => assert_eq!(args.range, Some(DateRange::Last3Months)),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_range() {
        assert!(Cli::try_parse_from(["medicode", "analytics", "--range", "lastyear"]).is_err());
    }

    #[test]
    fn test_cli_parse_add_code() {
        let cli = Cli::parse_from([
            "medicode",
            "add-code",
            "--patient",
            "p1",
            "--kind",
            "treatment",
            "--code",
            "NAM-7",
            "--description",
            "Abhyanga",
            "--system",
            "namaste",
        ]);
        match cli.command {
            Commands::AddCode(args) => {
                assert_eq!(args.kind, EntryKind::Treatment);
                assert_eq!(args.system, CodeSystem::Namaste);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_add_patient() {
        let cli = Cli::parse_from([
            "medicode",
            "add-patient",
            "--name",
            "Meera Nair",
            "--age",
            "31",
            "--gender",
            "female",
        ]);
        match cli.command {
            Commands::AddPatient(args) => {
                assert_eq!(args.gender, Gender::Female);
                assert_eq!(args.age, 31);
                assert!(args.patient_id.is_none());
                assert!(args.code.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_add_patient_code_needs_description_and_system() {
        assert!(Cli::try_parse_from([
            "medicode",
            "add-patient",
            "--name",
            "Meera Nair",
            "--age",
            "31",
            "--code",
            "1A00",
        ])
        .is_err());
    }

    #[test]
    fn test_cli_parse_report_and_export() {
        let cli = Cli::parse_from(["medicode", "report", "--type", "code-usage"]);
        match cli.command {
            Commands::Report(args) => {
                assert_eq!(args.report_type, ReportType::CodeUsage);
                assert_eq!(args.range, ReportRange::Last30Days);
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::parse_from(["medicode", "report", "--range", "lastyear"]);
        match cli.command {
            Commands::Report(args) => assert_eq!(args.range, ReportRange::LastYear),
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::parse_from(["medicode", "export", "--kind", "rejected", "--format", "json"]);
        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.kind, ExportKind::Rejected);
                assert_eq!(args.format, ExportFormat::Json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_approve_pending_and_init() {
        let cli = Cli::parse_from(["medicode", "approve-pending"]);
        assert!(matches!(cli.command, Commands::ApprovePending(_)));

        let cli = Cli::parse_from(["medicode", "init", "--with-examples"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
