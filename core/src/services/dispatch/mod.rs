//! Provider dispatch module
//!
//! This module provides the gateway's entry point:
//! - The `SmsProvider` trait every vendor adapter implements
//! - `SmsDispatcher`, the provider registry with selection and failover
//! - Uniform non-exceptional results for unknown or blank provider names

mod service;
mod traits;

#[cfg(test)]
mod tests;

pub use service::SmsDispatcher;
pub use traits::SmsProvider;
