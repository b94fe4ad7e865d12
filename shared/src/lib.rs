//! Shared utilities and common types for the SmsGate workspace
//!
//! This crate provides functionality used by both the domain and the
//! infrastructure layers:
//! - Dispatch and logging configuration types
//! - Phone number utilities (validation, masking for logs)

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{DispatchConfig, Environment, LogFormat, LoggingConfig};
pub use utils::phone;
