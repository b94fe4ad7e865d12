//! Normalized outcome of one send attempt

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorCodeMapper, UnifiedErrorKind};

/// Provider-agnostic result of a single send attempt
///
/// Carries both the vendor's native error code and message (for diagnostics)
/// and the unified kind, friendly message and retryability (for callers).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendResult {
    /// Whether the vendor accepted the message
    pub success: bool,
    /// Vendor request identifier
    pub request_id: String,
    /// Vendor tracking identifier for the message, may be empty
    pub biz_id: String,
    /// Vendor-native error code, empty on success
    pub raw_error_code: String,
    /// Vendor-native error message
    pub raw_error_message: String,
    /// Provider that produced this result
    pub provider_name: String,
    /// Unified classification of the outcome
    pub error_kind: UnifiedErrorKind,
    /// Provider-agnostic message suitable for end users
    pub friendly_message: String,
    /// Whether retrying later (or elsewhere) may succeed
    pub retryable: bool,
}

impl SendResult {
    /// Create a successful result
    pub fn success(
        provider_name: impl Into<String>,
        request_id: impl Into<String>,
        biz_id: impl Into<String>,
    ) -> Self {
        Self {
            success: true,
            request_id: request_id.into(),
            biz_id: biz_id.into(),
            raw_error_code: String::new(),
            raw_error_message: String::new(),
            provider_name: provider_name.into(),
            error_kind: UnifiedErrorKind::Success,
            friendly_message: ErrorCodeMapper::friendly_message(UnifiedErrorKind::Success)
                .to_string(),
            retryable: false,
        }
    }

    /// Create a failed result; the friendly message and retryability follow from `kind`
    pub fn failure(
        provider_name: impl Into<String>,
        kind: UnifiedErrorKind,
        raw_error_code: impl Into<String>,
        raw_error_message: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            request_id: String::new(),
            biz_id: String::new(),
            raw_error_code: raw_error_code.into(),
            raw_error_message: raw_error_message.into(),
            provider_name: provider_name.into(),
            error_kind: kind,
            friendly_message: ErrorCodeMapper::friendly_message(kind).to_string(),
            retryable: ErrorCodeMapper::is_retryable(kind),
        }
    }

    /// Attach the vendor request identifier
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    /// Override the retryable flag
    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }
}
