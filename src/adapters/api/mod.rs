//! MediCode REST API adapter
//!
//! - [`source`] - the `RecordSource` trait the core depends on
//! - [`client`] - the `reqwest` implementation
//! - [`models`] - snake_case wire structs and their mapping to domain types

pub mod client;
pub mod models;
pub mod source;

pub use client::ApiClient;
pub use models::{
    map_patient_payload, map_single_patient, NewCodeRequest, NewPatientRequest, WireCodeEntry,
    WirePatient,
};
pub use source::RecordSource;
