//! Session persistence
//!
//! The CLI is a sequence of short-lived processes, so the logged-in user is
//! kept in a small JSON file between commands.

use crate::domain::{MedicodeError, Result, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// A logged-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: Uuid,
    pub user: User,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn start(user: User) -> Self {
        Self {
            id: Uuid::new_v4(),
            user,
            started_at: Utc::now(),
        }
    }
}

/// Reads and writes the session file
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the stored session, or `None` if there is no session file
    ///
    /// # Errors
    ///
    /// Returns `Session` if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            MedicodeError::Session(format!(
                "Failed to read session file {}: {e}",
                self.path.display()
            ))
        })?;

        serde_json::from_str(&contents).map(Some).map_err(|e| {
            MedicodeError::Session(format!(
                "Session file {} is corrupt ({e}); run `medicode logout` and log in again",
                self.path.display()
            ))
        })
    }

    /// Writes the session, creating parent directories as needed
    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, json)?;
        tracing::debug!(path = %self.path.display(), session_id = %session.id, "Session saved");
        Ok(())
    }

    /// Removes the session file; returns whether one existed
    pub fn clear(&self) -> Result<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
