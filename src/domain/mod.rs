//! Domain models and types for MediCode.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`PatientId`], [`EntryId`])
//! - **Domain models** ([`PatientRecord`], [`CodeEntry`], [`User`])
//! - **Error types** ([`MedicodeError`], [`ApiError`])
//! - **Result type alias** ([`Result`])
//!
//! Everything here is the in-memory (camelCase) shape. Conversion from the
//! backend's snake_case payload happens once, in
//! [`adapters::api::models`](crate::adapters::api::models).
//!
//! # Builder Pattern
//!
//! ```rust
//! use medicode::domain::{CodeEntry, CodeSystem, PatientRecord, ValidationStatus};
//! use chrono::Utc;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let entry = CodeEntry::builder()
//!     .id("dx-1")?
//!     .code("1A00")
//!     .description("Cholera")
//!     .code_system(CodeSystem::Icd11)
//!     .status(ValidationStatus::Approved)
//!     .validation_date(Utc::now())
//!     .validated_by("Dr. Evelyn Reed")
//!     .build()?;
//!
//! let patient = PatientRecord::builder()
//!     .id("p-1")?
//!     .name("Asha Verma")
//!     .patient_id("PT-0001")
//!     .last_visit(Utc::now())
//!     .diagnosis(entry)
//!     .build()?;
//! assert_eq!(patient.entry_count(), 1);
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod ids;
pub mod patient;
pub mod result;
pub mod user;

pub use errors::{ApiError, MedicodeError};
pub use ids::{EntryId, PatientId};
pub use patient::{
    CodeEntry, CodeEntryBuilder, CodeSystem, EntryKind, Gender, PatientRecord,
    PatientRecordBuilder, ValidationStatus,
};
pub use result::Result;
pub use user::{Role, User};
