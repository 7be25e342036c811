//! Configuration loading end to end

use medicode::config::{load_config, Environment};
use medicode::core::analytics::DateRange;
use medicode::domain::{MedicodeError, Role};
use secrecy::ExposeSecret;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn full_config_with_substitution() {
    std::env::set_var("MEDICODE_IT_API_TOKEN", "token-abc");
    std::env::set_var("MEDICODE_IT_REED_PASSWORD", "reed-pw");

    let file = write_config(
        r#"
[application]
log_level = "debug"
environment = "staging"

[api]
base_url = "https://medicode.example.com/api/"
timeout_seconds = 15
api_token = "${MEDICODE_IT_API_TOKEN}"

[auth]
session_path = "/tmp/medicode-it/session.json"

[[auth.users]]
id = "1"
name = "Dr. Evelyn Reed"
email = "reed@hospital.example"
role = "auditor"
password = "${MEDICODE_IT_REED_PASSWORD}"

[analytics]
default_range = "last30days"

[logging]
local_enabled = true
local_path = "/tmp/medicode-it/logs"
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.environment, Environment::Staging);
    assert_eq!(config.api.timeout_seconds, 15);
    assert_eq!(
        config.api.api_token.as_ref().unwrap().expose_secret().as_ref(),
        "token-abc"
    );
    assert_eq!(config.auth.users[0].role, Role::Auditor);
    assert!(config.auth.users[0].to_user().can_review());
    assert_eq!(config.analytics.default_range, DateRange::Last30Days);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn secrets_do_not_leak_through_debug() {
    std::env::set_var("MEDICODE_IT_LEAK_PASSWORD", "very-secret-pw");
    let file = write_config(
        r#"
[api]
base_url = "http://localhost:8000/api"

[[auth.users]]
id = "1"
name = "Admin"
email = "admin@hospital.example"
role = "admin"
password = "${MEDICODE_IT_LEAK_PASSWORD}"
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert!(!format!("{config:?}").contains("very-secret-pw"));
}

#[test]
fn unset_variable_is_configuration_error() {
    let file = write_config(
        r#"
[api]
base_url = "http://localhost:8000/api"
api_token = "${MEDICODE_IT_NEVER_SET_TOKEN}"
"#,
    );

    let err = load_config(file.path()).unwrap_err();
    assert!(matches!(err, MedicodeError::Configuration(_)));
    assert!(err.to_string().contains("MEDICODE_IT_NEVER_SET_TOKEN"));
}

#[test]
fn production_requires_tls_verification() {
    let file = write_config(
        r#"
[application]
environment = "production"

[api]
base_url = "https://medicode.example.com/api"
tls_verify = false
"#,
    );

    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("TLS certificate verification"));
}

#[test]
fn duplicate_user_emails_are_rejected() {
    let file = write_config(
        r#"
[api]
base_url = "http://localhost:8000/api"

[[auth.users]]
id = "1"
name = "A"
email = "same@hospital.example"
role = "admin"
password = "a"

[[auth.users]]
id = "2"
name = "B"
email = "SAME@hospital.example"
role = "doctor"
password = "b"
"#,
    );

    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("duplicate email"));
}

#[test]
fn env_override_wins_over_file() {
    std::env::set_var("MEDICODE_EXPORT_OUTPUT_DIR", "/tmp/medicode-it-exports");
    let file = write_config(
        r#"
[api]
base_url = "http://localhost:8000/api"

[export]
output_dir = "from-file"
"#,
    );

    let config = load_config(file.path());
    std::env::remove_var("MEDICODE_EXPORT_OUTPUT_DIR");

    assert_eq!(config.unwrap().export.output_dir, "/tmp/medicode-it-exports");
}
