//! Domain error types
//!
//! This module defines the error hierarchy for MediCode. All errors are
//! domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main MediCode error type
///
/// This is the primary error type used throughout the library.
#[derive(Debug, Error)]
pub enum MedicodeError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed input handed to the core (bad payload, missing fields)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A call to the remote API did not succeed
    #[error("Remote failure: {0}")]
    RemoteFailure(#[from] ApiError),

    /// The referenced patient or code entry does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The current user may not perform the operation
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Session lifecycle errors (not logged in, bad credentials)
    #[error("Session error: {0}")]
    Session(String),

    /// Export rendering errors
    #[error("Export error: {0}")]
    Export(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Remote API errors
///
/// Errors that occur when talking to the MediCode REST backend.
/// These errors don't expose the HTTP client's types.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Failed to reach the server
    #[error("Failed to connect to API server: {0}")]
    ConnectionFailed(String),

    /// Request did not complete in time
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Response body could not be decoded
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Build the error matching an unsuccessful HTTP status code
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if status >= 500 {
            ApiError::ServerError { status, message }
        } else {
            ApiError::ClientError { status, message }
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::ServerError { status, .. } | ApiError::ClientError { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

impl MedicodeError {
    /// Message suitable for showing to the person at the terminal
    pub fn user_message(&self) -> String {
        match self {
            MedicodeError::RemoteFailure(_) => {
                format!("{self}. Please check your connection and try again.")
            }
            _ => self.to_string(),
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for MedicodeError {
    fn from(err: std::io::Error) -> Self {
        MedicodeError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for MedicodeError {
    fn from(err: serde_json::Error) -> Self {
        MedicodeError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for MedicodeError {
    fn from(err: toml::de::Error) -> Self {
        MedicodeError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Conversion from csv writer errors
impl From<csv::Error> for MedicodeError {
    fn from(err: csv::Error) -> Self {
        MedicodeError::Export(format!("CSV error: {err}"))
    }
}
