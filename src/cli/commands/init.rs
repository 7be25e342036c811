//! Init command implementation
//!
//! Writes a starter `medicode.toml`.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "medicode.toml")]
    pub output: String,

    /// Include every option with explanatory comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing MediCode configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your API URL and users", self.output);
                println!("  2. Create a .env file with the secrets it references:");
                println!("     - MEDICODE_ADMIN_PASSWORD");
                println!("     - MEDICODE_API_TOKEN (if the backend requires one)");
                println!("  3. Validate configuration: medicode validate-config");
                println!("  4. Log in: medicode login --email admin@hospital.example");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    fn generate_minimal_config() -> String {
        r#"# MediCode Configuration File
# ICD-11 / NAMASTE coding validation client

[application]
log_level = "info"
environment = "development"

[api]
base_url = "http://localhost:8000/api"
timeout_seconds = 30
tls_verify = true
# api_token = "${MEDICODE_API_TOKEN}"

[auth]
session_path = ".medicode/session.json"

[[auth.users]]
id = "1"
name = "Admin"
email = "admin@hospital.example"
role = "admin"
password = "${MEDICODE_ADMIN_PASSWORD}"

[analytics]
default_range = "last6months"

[export]
output_dir = "exports"

[logging]
local_enabled = false
local_path = "logs"
local_rotation = "daily"
"#
        .to_string()
    }

    fn generate_config_with_examples() -> String {
        r#"# MediCode Configuration File
# ICD-11 / NAMASTE coding validation client
#
# Values of the form ${VAR} are read from the environment (or a .env file).
# Any key can also be overridden with MEDICODE_<SECTION>_<KEY>, for example
# MEDICODE_API_BASE_URL or MEDICODE_ANALYTICS_DEFAULT_RANGE.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# development | staging | production
# TLS verification cannot be turned off in production.
environment = "development"

# ============================================================================
# Backend API
# ============================================================================
[api]
# Base URL of the MediCode REST API (patients, diagnoses, treatments)
base_url = "http://localhost:8000/api"

# Per-request timeout (1-300 seconds). Failed requests are not retried.
timeout_seconds = 30

# Verify the server's TLS certificate
tls_verify = true

# Bearer token sent as "Authorization: Bearer ..." (optional)
# api_token = "${MEDICODE_API_TOKEN}"

# ============================================================================
# Users and Sessions
# ============================================================================
[auth]
# Where the logged-in session is kept between commands
session_path = ".medicode/session.json"

# Roles: doctor, medical_coder, admin, auditor
# Only admin and auditor may approve or reject codes.
[[auth.users]]
id = "1"
name = "Admin"
email = "admin@hospital.example"
role = "admin"
password = "${MEDICODE_ADMIN_PASSWORD}"

# [[auth.users]]
# id = "2"
# name = "Dr. Evelyn Reed"
# email = "reed@hospital.example"
# role = "doctor"
# password = "${MEDICODE_REED_PASSWORD}"

# ============================================================================
# Analytics
# ============================================================================
[analytics]
# last7days (daily buckets), last30days (daily), last3months (weekly),
# last6months (monthly)
default_range = "last6months"

# ============================================================================
# Exports
# ============================================================================
[export]
# Directory CSV, JSON, PDF and report files are written to
output_dir = "exports"

# ============================================================================
# Logging
# ============================================================================
[logging]
# Write JSON logs to files in addition to the console
local_enabled = false

# Directory for medicode.log
local_path = "logs"

# daily | hourly | never
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::domain::Role;

    fn with_password(template: String) -> String {
        template.replace("${MEDICODE_ADMIN_PASSWORD}", "change-me")
    }

    #[test]
    fn test_generate_minimal_config_is_valid() {
        let config = parse_config(&with_password(InitArgs::generate_minimal_config())).unwrap();
        assert_eq!(config.auth.users.len(), 1);
        assert_eq!(config.auth.users[0].role, Role::Admin);
    }

    #[test]
    fn test_generate_config_with_examples_is_valid() {
        let text = InitArgs::generate_config_with_examples();
        assert!(text.contains("# MediCode Configuration File"));
        assert!(parse_config(&with_password(text)).is_ok());
    }

    #[tokio::test]
    async fn test_refuses_to_overwrite() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let args = InitArgs {
            output: file.path().to_string_lossy().to_string(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
    }
}
