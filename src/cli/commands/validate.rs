//! Validate config command implementation

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Loads and validates the file, then prints a summary
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates as well; failures of either kind land here
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Environment: {:?}", config.application.environment);
        println!("  Log Level: {}", config.application.log_level);
        println!("  API: {}", config.api.base_url);
        println!("  Timeout: {}s", config.api.timeout_seconds);
        println!("  TLS Verify: {}", config.api.tls_verify);
        println!(
            "  API Token: {}",
            if config.api.api_token.is_some() {
                "configured"
            } else {
                "none"
            }
        );
        println!("  Session File: {}", config.auth.session_path);
        println!("  Users: {}", config.auth.users.len());
        for user in &config.auth.users {
            println!("    - {} <{}> ({})", user.name, user.email, user.role);
        }
        println!("  Default Range: {}", config.analytics.default_range);
        println!("  Export Directory: {}", config.export.output_dir);
        if config.logging.local_enabled {
            println!(
                "  File Logging: {} ({})",
                config.logging.local_path, config.logging.local_rotation
            );
        }
        println!();
        Ok(0)
    }
}
