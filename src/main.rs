// MediCode - ICD-11 / NAMASTE Coding Validation Client
// Copyright (c) 2025 MediCode Contributors
// Licensed under the MIT License

use clap::Parser;
use medicode::cli::{Cli, Commands};
use medicode::config::{load_config, LoggingConfig};
use medicode::logging::init_logging;
use std::process;

#[tokio::main]
async fn main() {
    // Optional; a missing .env is not an error
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Logging follows the config when it loads; commands that fail to load
    // it report that themselves.
    let (config_level, logging_config) = match load_config(&cli.config) {
        Ok(config) => (config.application.log_level, config.logging),
        Err(_) => ("info".to_string(), LoggingConfig::default()),
    };
    let log_level = cli.log_level.clone().unwrap_or(config_level);
    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "MediCode starting");

    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5
        }
    };

    drop(guard);
    process::exit(exit_code);
}

async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Login(args) => args.execute(&cli.config).await,
        Commands::Logout(args) => args.execute(&cli.config).await,
        Commands::Whoami(args) => args.execute(&cli.config).await,
        Commands::Patients(args) => args.execute(&cli.config).await,
        Commands::Analytics(args) => args.execute(&cli.config).await,
        Commands::Review(args) => args.execute(&cli.config).await,
        Commands::ApprovePending(args) => args.execute(&cli.config).await,
        Commands::AddCode(args) => args.execute(&cli.config).await,
        Commands::AddPatient(args) => args.execute(&cli.config).await,
        Commands::Rejected(args) => args.execute(&cli.config).await,
        Commands::Report(args) => args.execute(&cli.config).await,
        Commands::Export(args) => args.execute(&cli.config).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}
