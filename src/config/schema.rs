//! Configuration schema types
//!
//! Maps one-to-one onto the sections of `medicode.toml`.

use crate::config::SecretString;
use crate::core::analytics::DateRange;
use crate::domain::{Role, User};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

/// Main MediCode configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicodeConfig {
    #[serde(default)]
    pub application: ApplicationConfig,

    /// REST backend connection
    pub api: ApiConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub analytics: AnalyticsConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl MedicodeConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid value
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.api.validate(&self.application.environment)?;
        self.auth.validate()?;
        self.export.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub environment: Environment,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            environment: Environment::default(),
        }
    }
}

/// REST backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL including the API prefix, e.g. `http://localhost:8000/api`
    pub base_url: String,

    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// TLS certificate verification
    ///
    /// Validation refuses `false` when `application.environment` is production.
    #[serde(default = "default_true")]
    pub tls_verify: bool,

    /// Sent as `Authorization: Bearer <token>` when present
    #[serde(default)]
    pub api_token: Option<SecretString>,
}

impl ApiConfig {
    fn validate(&self, environment: &Environment) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("api.base_url cannot be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("api.base_url must start with http:// or https://".to_string());
        }

        if self.timeout_seconds == 0 || self.timeout_seconds > 300 {
            return Err(format!(
                "api.timeout_seconds must be between 1 and 300, got {}",
                self.timeout_seconds
            ));
        }

        if let Some(token) = &self.api_token {
            if token.expose_secret().is_blank() {
                return Err("api.api_token cannot be empty when set".to_string());
            }
        }

        if *environment == Environment::Production && !self.tls_verify {
            return Err(
                "TLS certificate verification cannot be disabled in production environments. \
                Set 'tls_verify = true' or use environment = \"development\" for local testing."
                    .to_string(),
            );
        }

        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            timeout_seconds: default_timeout_seconds(),
            tls_verify: true,
            api_token: None,
        }
    }
}

/// Login and session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// File the current session is persisted to between commands
    #[serde(default = "default_session_path")]
    pub session_path: String,

    /// People allowed to log in
    #[serde(default)]
    pub users: Vec<UserEntry>,
}

impl AuthConfig {
    fn validate(&self) -> Result<(), String> {
        if self.session_path.trim().is_empty() {
            return Err("auth.session_path cannot be empty".to_string());
        }

        let mut emails = HashSet::new();
        for (index, user) in self.users.iter().enumerate() {
            user.validate()
                .map_err(|e| format!("auth.users[{index}]: {e}"))?;
            if !emails.insert(user.email.to_lowercase()) {
                return Err(format!(
                    "auth.users[{index}]: duplicate email '{}'",
                    user.email
                ));
            }
        }
        Ok(())
    }

    pub fn session_file(&self) -> PathBuf {
        PathBuf::from(&self.session_path)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_path: default_session_path(),
            users: Vec::new(),
        }
    }
}

/// A configured login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEntry {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password: SecretString,
}

impl UserEntry {
    fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("id cannot be empty".to_string());
        }
        if self.name.trim().is_empty() {
            return Err("name cannot be empty".to_string());
        }
        if !self.email.contains('@') {
            return Err(format!("invalid email '{}'", self.email));
        }
        if self.password.expose_secret().is_blank() {
            return Err("password cannot be empty".to_string());
        }
        Ok(())
    }

    /// The public part of the entry
    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Range used when `--range` is not given
    #[serde(default)]
    pub default_range: DateRange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory export files are written to when no explicit path is given
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.output_dir.trim().is_empty() {
            return Err("export.output_dir cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable the JSON file layer
    #[serde(default)]
    pub local_enabled: bool,

    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_session_path() -> String {
    ".medicode/session.json".to_string()
}

fn default_output_dir() -> String {
    "exports".to_string()
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
