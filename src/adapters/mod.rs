//! External system integrations for MediCode.
//!
//! - [`api`] - the MediCode REST backend (patients, status updates, new codes)
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies behind traits so the core can be
//! tested with in-memory implementations. The core only ever sees
//! [`api::RecordSource`] and domain types.
//!
//! ```rust,no_run
//! use medicode::adapters::api::{ApiClient, RecordSource};
//! use medicode::config::{secret_string, ApiConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ApiConfig {
//!     base_url: "https://medicode.example.com/api".to_string(),
//!     api_token: Some(secret_string("token".to_string())),
//!     ..Default::default()
//! };
//!
//! let client = ApiClient::new(config)?;
//! let patients = client.fetch_patients().await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
