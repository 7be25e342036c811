//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{Environment, MedicodeConfig};
use super::secret::secret_string;
use crate::domain::errors::MedicodeError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into MedicodeConfig
/// 4. Applies environment variable overrides (MEDICODE_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns `Configuration` if the file is missing or unreadable, a
/// referenced variable is unset, the TOML is malformed, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use medicode::config::loader::load_config;
///
/// let config = load_config("medicode.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<MedicodeConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MedicodeError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        MedicodeError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration text, applying substitution, overrides and validation
pub fn parse_config(contents: &str) -> Result<MedicodeConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: MedicodeConfig = toml::from_str(&contents)
        .map_err(|e| MedicodeError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        MedicodeError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied through untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| MedicodeError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(MedicodeError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the MEDICODE_* prefix
///
/// Variables follow the pattern `MEDICODE_<SECTION>_<KEY>`, for example
/// `MEDICODE_API_BASE_URL` or `MEDICODE_ANALYTICS_DEFAULT_RANGE`.
fn apply_env_overrides(config: &mut MedicodeConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("MEDICODE_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("MEDICODE_APPLICATION_ENVIRONMENT") {
        config.application.environment = match val.to_lowercase().as_str() {
            "development" => Environment::Development,
            "staging" => Environment::Staging,
            "production" => Environment::Production,
            _ => {
                return Err(MedicodeError::Configuration(format!(
                    "Invalid MEDICODE_APPLICATION_ENVIRONMENT '{val}'"
                )))
            }
        };
    }

    // API overrides
    if let Ok(val) = std::env::var("MEDICODE_API_BASE_URL") {
        config.api.base_url = val;
    }
    if let Ok(val) = std::env::var("MEDICODE_API_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.api.timeout_seconds = timeout;
        }
    }
    if let Ok(val) = std::env::var("MEDICODE_API_TLS_VERIFY") {
        config.api.tls_verify = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("MEDICODE_API_TOKEN") {
        config.api.api_token = Some(secret_string(val));
    }

    // Auth overrides
    if let Ok(val) = std::env::var("MEDICODE_AUTH_SESSION_PATH") {
        config.auth.session_path = val;
    }

    // Analytics overrides
    if let Ok(val) = std::env::var("MEDICODE_ANALYTICS_DEFAULT_RANGE") {
        config.analytics.default_range = val.parse()?;
    }

    // Export overrides
    if let Ok(val) = std::env::var("MEDICODE_EXPORT_OUTPUT_DIR") {
        config.export.output_dir = val;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("MEDICODE_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("MEDICODE_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("MEDICODE_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("MEDICODE_LOADER_TEST_TOKEN", "tok-123");
        let input = "api_token = \"${MEDICODE_LOADER_TEST_TOKEN}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "api_token = \"tok-123\"\n");
        std::env::remove_var("MEDICODE_LOADER_TEST_TOKEN");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        let input = "api_token = \"${MEDICODE_LOADER_DEFINITELY_UNSET}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err
            .to_string()
            .contains("MEDICODE_LOADER_DEFINITELY_UNSET"));
    }

    #[test]
    fn test_substitute_skips_comments() {
        let input = "# api_token = \"${MEDICODE_LOADER_COMMENTED_OUT}\"\nx = 1";
        let result = substitute_env_vars(input).unwrap();
        assert!(result.contains("${MEDICODE_LOADER_COMMENTED_OUT}"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent-medicode.toml");
        assert!(matches!(result, Err(MedicodeError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[api]
base_url = "https://medicode.example.com/api"

[[auth.users]]
id = "1"
name = "Dr. Evelyn Reed"
email = "reed@medicode.test"
role = "admin"
password = "password123"

[analytics]
default_range = "last30days"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.api.base_url, "https://medicode.example.com/api");
        assert_eq!(config.auth.users.len(), 1);
        assert_eq!(
            config.analytics.default_range,
            crate::core::analytics::DateRange::Last30Days
        );
    }

    #[test]
    fn test_parse_config_reports_validation_failure() {
        let err = parse_config("[api]\nbase_url = \"ftp://nope\"\n").unwrap_err();
        assert!(err.to_string().contains("Configuration validation failed"));
    }
}
