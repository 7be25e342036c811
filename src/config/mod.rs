//! Configuration management for MediCode.
//!
//! # Overview
//!
//! MediCode reads a TOML file (`medicode.toml` by default, or the path in
//! `--config` / `MEDICODE_CONFIG`) with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `MEDICODE_<SECTION>_<KEY>` overrides
//! - Default values for optional settings
//! - Validation with descriptive messages
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use medicode::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("medicode.toml")?;
//! println!("API: {}", config.api.base_url);
//! println!("Default range: {}", config.analytics.default_range);
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//! environment = "development"
//!
//! [api]
//! base_url = "http://localhost:8000/api"
//! api_token = "${MEDICODE_API_TOKEN}"
//!
//! [auth]
//! session_path = ".medicode/session.json"
//!
//! [[auth.users]]
//! id = "1"
//! name = "Dr. Evelyn Reed"
//! email = "reed@hospital.example"
//! role = "admin"
//! password = "${MEDICODE_REED_PASSWORD}"
//!
//! [analytics]
//! default_range = "last6months"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, parse_config};
pub use schema::{
    AnalyticsConfig, ApiConfig, ApplicationConfig, AuthConfig, Environment, ExportConfig,
    LoggingConfig, MedicodeConfig, UserEntry,
};
pub use secret::{secret_matches, secret_string, SecretString, SecretValue};
