//! Core business logic for MediCode.
//!
//! # Modules
//!
//! - [`analytics`] - time bucketing, aggregation, overview stats and reports
//! - [`reconcile`] - reflecting confirmed remote changes in the local records
//! - [`review`] - approve/reject/add-code workflow (call-then-update)
//! - [`filter`] - dashboard search and headline counts
//! - [`rejected`] - rejected code listing
//! - [`export`] - CSV, JSON and PDF rendering
//! - [`session`] - login state persisted between commands
//!
//! [`analytics`], [`reconcile`], [`filter`] and [`rejected`] are pure
//! functions over the record collection they are given.
//!
//! # Example
//!
//! ```rust,no_run
//! use medicode::adapters::api::{ApiClient, RecordSource};
//! use medicode::config::load_config;
//! use medicode::core::analytics::{aggregate, compute_buckets, DateRange};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("medicode.toml")?;
//! let client = ApiClient::new(config.api)?;
//! let records = client.fetch_patients().await?;
//!
//! let window = compute_buckets(chrono::Utc::now(), DateRange::Last30Days);
//! let result = aggregate(&records, &window)?;
//! println!("{} entries in range", result.total_entry_count);
//! # Ok(())
//! # }
//! ```

pub mod analytics;
pub mod export;
pub mod filter;
pub mod reconcile;
pub mod rejected;
pub mod review;
pub mod session;
