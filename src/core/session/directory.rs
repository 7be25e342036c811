//! Configured user directory and credential checks

use crate::config::{secret_matches, UserEntry};
use crate::domain::{MedicodeError, Result, User};

/// Known logins, loaded from `[[auth.users]]`
pub struct UserDirectory {
    users: Vec<UserEntry>,
}

impl UserDirectory {
    pub fn new(users: Vec<UserEntry>) -> Self {
        Self { users }
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Checks an email/password pair
    ///
    /// Emails compare case-insensitively. Unknown email and wrong password
    /// produce the same message.
    ///
    /// # Errors
    ///
    /// Returns `Session` when the credentials do not match a configured user.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let email = email.trim();
        let user = self
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .filter(|u| secret_matches(&u.password, password))
            .ok_or_else(|| {
                tracing::warn!(email = %email, "Login rejected");
                MedicodeError::Session("invalid email or password".to_string())
            })?;
        Ok(user.to_user())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use crate::domain::Role;

    fn directory() -> UserDirectory {
        UserDirectory::new(vec![UserEntry {
            id: "u1".to_string(),
            name: "Dr. Evelyn Reed".to_string(),
            email: "reed@medicode.test".to_string(),
            role: Role::Auditor,
            password: secret_string("s3cret".to_string()),
        }])
    }

    #[test]
    fn test_authenticate_success_ignores_email_case() {
        let user = directory()
            .authenticate("Reed@MediCode.test", "s3cret")
            .unwrap();
        assert_eq!(user.name, "Dr. Evelyn Reed");
        assert_eq!(user.role, Role::Auditor);
    }

    #[test]
    fn test_wrong_password_and_unknown_email_look_the_same() {
        let wrong = directory()
            .authenticate("reed@medicode.test", "nope")
            .unwrap_err();
        let unknown = directory()
            .authenticate("who@medicode.test", "s3cret")
            .unwrap_err();
        assert_eq!(wrong.to_string(), unknown.to_string());
        assert!(matches!(wrong, MedicodeError::Session(_)));
    }
}
