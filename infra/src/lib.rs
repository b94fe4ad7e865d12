//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the SmsGate gateway,
//! following Clean Architecture principles. It provides the concrete vendor
//! adapters that plug into the core dispatcher.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Transport**: the `HttpTransport` seam and its reqwest implementation
//! - **SMS**: Aliyun and Tencent Cloud request signing and provider adapters
//! - **Config**: vendor credentials and configuration file loading
//! - **Telemetry**: tracing subscriber setup

// Re-export core types for convenience
pub use sg_core::errors::*;

/// Configuration loading and vendor credentials
pub mod config;

/// SMS module - vendor adapters, signing and redacted debug logging
pub mod sms;

/// Tracing subscriber initialization
pub mod telemetry;

/// HTTP transport used by the vendor adapters
pub mod transport;

pub use self::config::{load_config, AliyunConfig, GatewayConfig, TencentConfig};
pub use self::sms::create_sms_dispatcher;
pub use self::transport::{HttpResponse, HttpTransport, ReqwestTransport};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file could not be read or deserialized
    #[error("Configuration file error: {0}")]
    ConfigFile(#[from] ::config::ConfigError),

    /// Connection-level failure outside the HTTP client
    #[error("Transport error: {0}")]
    Transport(String),

    /// The caller cancelled the request
    #[error("Request cancelled")]
    Cancelled,

    /// JSON encoding or decoding error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<InfrastructureError> for SmsError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Http(e) => SmsError::Network { message: e.to_string() },
            InfrastructureError::Transport(message) => SmsError::Network { message },
            InfrastructureError::Cancelled => SmsError::Cancelled,
            InfrastructureError::Serialization(e) => SmsError::Serialization(e),
            InfrastructureError::Config(message) => SmsError::Configuration { message },
            InfrastructureError::ConfigFile(e) => SmsError::Configuration { message: e.to_string() },
        }
    }
}
