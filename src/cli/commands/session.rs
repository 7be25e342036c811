//! `login`, `logout` and `whoami`

use super::report_failure;
use crate::config::load_config;
use crate::core::session::{SessionContext, SessionStore, UserDirectory};
use crate::domain::{MedicodeError, Result};
use clap::Args;

/// Arguments for the login command
#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Email of a user configured under [[auth.users]]
    #[arg(short, long)]
    pub email: String,

    /// Password (prefer the environment variable over the flag)
    #[arg(short, long, env = "MEDICODE_PASSWORD", hide_env_values = true)]
    pub password: String,
}

impl LoginArgs {
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        match self.run(config_path) {
            Ok(()) => Ok(0),
            Err(e) => Ok(report_failure(&e)),
        }
    }

    fn run(&self, config_path: &str) -> Result<()> {
        let config = load_config(config_path)?;
        let directory = UserDirectory::new(config.auth.users.clone());
        if directory.is_empty() {
            return Err(MedicodeError::Configuration(
                "no users configured; add [[auth.users]] entries to the configuration".to_string(),
            ));
        }

        let mut context = SessionContext::load(SessionStore::new(config.auth.session_file()))?;
        let session = context.login(&directory, &self.email, &self.password)?;

        println!(
            "✅ Logged in as {} ({})",
            session.user.name, session.user.role
        );
        if !session.user.can_review() {
            println!("   Note: only admins and auditors can approve or reject codes");
        }
        Ok(())
    }
}

/// Arguments for the logout command
#[derive(Args, Debug)]
pub struct LogoutArgs {}

impl LogoutArgs {
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let result = load_config(config_path).and_then(|config| {
            SessionContext::load(SessionStore::new(config.auth.session_file()))?.logout()
        });

        match result {
            Ok(Some(session)) => {
                println!("👋 Logged out {}", session.user.name);
                Ok(0)
            }
            Ok(None) => {
                println!("Not logged in.");
                Ok(0)
            }
            Err(e) => Ok(report_failure(&e)),
        }
    }
}

/// Arguments for the whoami command
#[derive(Args, Debug)]
pub struct WhoamiArgs {}

impl WhoamiArgs {
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let result = load_config(config_path).and_then(|config| {
            SessionContext::load(SessionStore::new(config.auth.session_file()))
        });

        let context = match result {
            Ok(context) => context,
            Err(e) => return Ok(report_failure(&e)),
        };

        match context.current() {
            Some(session) => {
                println!("👤 {} <{}>", session.user.name, session.user.email);
                println!("   Role: {}", session.user.role);
                println!(
                    "   Logged in: {}",
                    session.started_at.format("%Y-%m-%d %H:%M UTC")
                );
                Ok(0)
            }
            None => Ok(report_failure(&MedicodeError::Session(
                "not logged in; run `medicode login` first".to_string(),
            ))),
        }
    }
}
