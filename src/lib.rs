// MediCode - ICD-11 / NAMASTE Coding Validation Client
// Copyright (c) 2025 MediCode Contributors
// Licensed under the MIT License

//! # MediCode - Medical Coding Validation Client
//!
//! MediCode is a command-line client for reviewing ICD-11 and NAMASTE
//! (traditional medicine) codes attached to patient records held by the
//! MediCode REST backend.
//!
//! ## Overview
//!
//! This library provides:
//! - **Fetching** patient records with their diagnosis and treatment codes
//! - **Reviewing** codes (approve, reject, bulk approve, add new codes)
//! - **Analysing** code usage, status breakdown and time-bucketed trends
//! - **Exporting** patient lists and rejected codes to CSV, JSON and PDF
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (analytics, review, filtering, exports, sessions)
//! - [`adapters`] - The REST backend client
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use medicode::adapters::api::{ApiClient, RecordSource};
//! use medicode::config::load_config;
//! use medicode::core::analytics::{aggregate, compute_buckets, DateRange, OverviewStats};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("medicode.toml")?;
//!     let client = ApiClient::new(config.api)?;
//!     let records = client.fetch_patients().await?;
//!
//!     let window = compute_buckets(chrono::Utc::now(), DateRange::Last6Months);
//!     let result = aggregate(&records, &window)?;
//!     let overview = OverviewStats::from_aggregate(&result);
//!
//!     println!("Accuracy: {:.1}%", overview.accuracy_rate);
//!     Ok(())
//! }
//! ```
//!
//! ## Review Workflow
//!
//! Status changes go to the backend first; local records are only updated
//! once the call succeeds:
//!
//! ```rust,no_run
//! use medicode::adapters::api::ApiClient;
//! use medicode::core::review::ReviewWorkflow;
//! use medicode::domain::{EntryId, PatientRecord, User, ValidationStatus};
//! use std::sync::Arc;
//!
//! # async fn example(client: ApiClient, reviewer: User, records: Vec<PatientRecord>)
//! #     -> Result<(), Box<dyn std::error::Error>> {
//! let workflow = ReviewWorkflow::new(Arc::new(client), reviewer);
//! let entry_id = EntryId::new("dx-42")?;
//! let updated = workflow
//!     .update_status(&records, &entry_id, ValidationStatus::Approved)
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All library errors are [`domain::MedicodeError`]; remote failures are
//! wrapped in [`domain::ApiError`] and never expose HTTP client types.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
