//! Login sessions
//!
//! [`SessionContext`] is passed explicitly to whatever needs the current
//! user; nothing reads the session file behind the caller's back.

pub mod directory;
pub mod store;

pub use directory::UserDirectory;
pub use store::{Session, SessionStore};

use crate::domain::{MedicodeError, Result, User};

/// The current session and the store it came from
#[derive(Debug)]
pub struct SessionContext {
    store: SessionStore,
    current: Option<Session>,
}

impl SessionContext {
    /// Reads whatever session the store holds
    pub fn load(store: SessionStore) -> Result<Self> {
        let current = store.load()?;
        Ok(Self { store, current })
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// Authenticates and persists a new session, replacing any existing one
    pub fn login(
        &mut self,
        directory: &UserDirectory,
        email: &str,
        password: &str,
    ) -> Result<&Session> {
        let user = directory.authenticate(email, password)?;
        let session = Session::start(user);
        self.store.save(&session)?;
        tracing::info!(
            session_id = %session.id,
            user = %session.user.email,
            role = %session.user.role,
            "Logged in"
        );
        Ok(self.current.insert(session))
    }

    /// Ends the session; returns the one that was active, if any
    pub fn logout(&mut self) -> Result<Option<Session>> {
        self.store.clear()?;
        let previous = self.current.take();
        if let Some(session) = &previous {
            tracing::info!(session_id = %session.id, user = %session.user.email, "Logged out");
        }
        Ok(previous)
    }

    /// The logged-in user
    ///
    /// # Errors
    ///
    /// Returns `Session` when nobody is logged in.
    pub fn require_user(&self) -> Result<&User> {
        self.current
            .as_ref()
            .map(|s| &s.user)
            .ok_or_else(|| {
                MedicodeError::Session("not logged in; run `medicode login` first".to_string())
            })
    }
}
