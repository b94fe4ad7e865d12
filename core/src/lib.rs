//! # SmsGate Core
//!
//! Core domain layer for the SmsGate SMS gateway.
//! This crate contains the normalized request/response entities, the unified
//! error taxonomy with vendor code mapping, the provider trait, and the
//! dispatcher that selects providers and fails over between them.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
