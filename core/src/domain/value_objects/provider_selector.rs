//! Typed provider selection

use serde::{Deserialize, Serialize};

/// Canonical name of the Aliyun provider
pub const ALIYUN_PROVIDER_NAME: &str = "Aliyun";

/// Canonical name of the Tencent Cloud provider
pub const TENCENT_PROVIDER_NAME: &str = "Tencent";

/// Typed alternative to naming a provider by string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProviderSelector {
    /// Use the configured default provider
    #[default]
    Auto,
    /// Aliyun SMS
    Aliyun,
    /// Tencent Cloud SMS
    Tencent,
}

impl ProviderSelector {
    /// Resolve to a canonical provider name, with `Auto` resolving to `default_provider`
    pub fn resolve<'a>(&self, default_provider: &'a str) -> &'a str {
        match self {
            ProviderSelector::Auto => default_provider,
            ProviderSelector::Aliyun => ALIYUN_PROVIDER_NAME,
            ProviderSelector::Tencent => TENCENT_PROVIDER_NAME,
        }
    }
}

impl std::fmt::Display for ProviderSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderSelector::Auto => write!(f, "Auto"),
            ProviderSelector::Aliyun => write!(f, "{}", ALIYUN_PROVIDER_NAME),
            ProviderSelector::Tencent => write!(f, "{}", TENCENT_PROVIDER_NAME),
        }
    }
}

impl std::str::FromStr for ProviderSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" | "" => Ok(ProviderSelector::Auto),
            "aliyun" => Ok(ProviderSelector::Aliyun),
            "tencent" => Ok(ProviderSelector::Tencent),
            _ => Err(format!("Unknown SMS provider: {}", s)),
        }
    }
}
