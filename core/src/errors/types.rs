//! Unified, provider-agnostic classification of send outcomes

use serde::{Deserialize, Serialize};

/// Unified error kind shared by every provider
///
/// The first twelve variants are reachable from vendor codes; the last two
/// are produced by the dispatcher itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnifiedErrorKind {
    Success,
    InvalidParameter,
    AuthenticationFailed,
    InsufficientPermissions,
    InsufficientBalance,
    RateLimitExceeded,
    TemplateNotFound,
    /// The SMS sign name is invalid or missing (not a cryptographic signature)
    SignatureNotFound,
    InvalidPhoneNumber,
    NetworkError,
    ProviderInternalError,
    Unknown,
    /// The requested provider is not registered
    ProviderNotFound,
    /// The requested provider name was blank
    InvalidProviderName,
}

impl UnifiedErrorKind {
    /// Every variant, in declaration order
    pub const ALL: [UnifiedErrorKind; 14] = [
        UnifiedErrorKind::Success,
        UnifiedErrorKind::InvalidParameter,
        UnifiedErrorKind::AuthenticationFailed,
        UnifiedErrorKind::InsufficientPermissions,
        UnifiedErrorKind::InsufficientBalance,
        UnifiedErrorKind::RateLimitExceeded,
        UnifiedErrorKind::TemplateNotFound,
        UnifiedErrorKind::SignatureNotFound,
        UnifiedErrorKind::InvalidPhoneNumber,
        UnifiedErrorKind::NetworkError,
        UnifiedErrorKind::ProviderInternalError,
        UnifiedErrorKind::Unknown,
        UnifiedErrorKind::ProviderNotFound,
        UnifiedErrorKind::InvalidProviderName,
    ];

    /// Stable upper-snake-case code for logs and API payloads
    pub fn code(&self) -> &'static str {
        match self {
            UnifiedErrorKind::Success => "SUCCESS",
            UnifiedErrorKind::InvalidParameter => "INVALID_PARAMETER",
            UnifiedErrorKind::AuthenticationFailed => "AUTHENTICATION_FAILED",
            UnifiedErrorKind::InsufficientPermissions => "INSUFFICIENT_PERMISSIONS",
            UnifiedErrorKind::InsufficientBalance => "INSUFFICIENT_BALANCE",
            UnifiedErrorKind::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            UnifiedErrorKind::TemplateNotFound => "TEMPLATE_NOT_FOUND",
            UnifiedErrorKind::SignatureNotFound => "SIGNATURE_NOT_FOUND",
            UnifiedErrorKind::InvalidPhoneNumber => "INVALID_PHONE_NUMBER",
            UnifiedErrorKind::NetworkError => "NETWORK_ERROR",
            UnifiedErrorKind::ProviderInternalError => "PROVIDER_INTERNAL_ERROR",
            UnifiedErrorKind::Unknown => "UNKNOWN",
            UnifiedErrorKind::ProviderNotFound => "PROVIDER_NOT_FOUND",
            UnifiedErrorKind::InvalidProviderName => "INVALID_PROVIDER_NAME",
        }
    }
}

impl std::fmt::Display for UnifiedErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
