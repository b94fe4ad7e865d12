//! Configuration module
//!
//! - `dispatch` - Provider selection, failover and sign-name defaults
//! - `environment` - Environment detection and logging configuration

pub mod dispatch;
pub mod environment;

pub use dispatch::DispatchConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
