//! Dispatch configuration module

use serde::{Deserialize, Serialize};
use std::env;

/// Provider selection and failover configuration
///
/// A read-only snapshot handed to the dispatcher at construction time and
/// consulted on every send.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DispatchConfig {
    /// Provider used when the caller does not name one
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Try the remaining providers when the default one fails
    #[serde(default = "default_failover_enabled")]
    pub failover_enabled: bool,

    /// Failover order, highest priority first
    #[serde(default = "default_provider_priority")]
    pub provider_priority: Vec<String>,

    /// Sign name used when a request does not carry its own
    #[serde(default)]
    pub default_sign_name: Option<String>,

    /// Dump redacted wire requests and responses at debug level
    #[serde(default)]
    pub debug_logging_enabled: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            failover_enabled: default_failover_enabled(),
            provider_priority: default_provider_priority(),
            default_sign_name: None,
            debug_logging_enabled: false,
        }
    }
}

impl DispatchConfig {
    /// Create a configuration with the given default provider and failover disabled
    pub fn single(provider: impl Into<String>) -> Self {
        let provider = provider.into();
        Self {
            provider_priority: vec![provider.clone()],
            default_provider: provider,
            failover_enabled: false,
            ..Default::default()
        }
    }

    /// Set the failover priority list
    pub fn with_priority<I, S>(mut self, priority: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.provider_priority = priority.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable failover
    pub fn with_failover(mut self, enabled: bool) -> Self {
        self.failover_enabled = enabled;
        self
    }

    /// Set the fallback sign name
    pub fn with_default_sign_name(mut self, sign_name: impl Into<String>) -> Self {
        self.default_sign_name = Some(sign_name.into());
        self
    }

    /// Load configuration from environment variables
    ///
    /// Unset or unparsable variables fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            default_provider: env::var("SMS_DEFAULT_PROVIDER")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.default_provider),
            failover_enabled: env::var("SMS_FAILOVER_ENABLED")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.failover_enabled),
            provider_priority: env::var("SMS_PROVIDER_PRIORITY")
                .ok()
                .map(|v| parse_list(&v))
                .filter(|list| !list.is_empty())
                .unwrap_or(defaults.provider_priority),
            default_sign_name: env::var("SMS_DEFAULT_SIGN_NAME")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            debug_logging_enabled: env::var("SMS_DEBUG_LOG")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.debug_logging_enabled),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn default_provider() -> String {
    String::from("Aliyun")
}

fn default_failover_enabled() -> bool {
    true
}

fn default_provider_priority() -> Vec<String> {
    vec![String::from("Aliyun"), String::from("Tencent")]
}
