//! SMS Service Module
//!
//! Vendor adapters that plug into the core `SmsDispatcher`.
//!
//! ## Features
//!
//! - **Aliyun**: query-string HMAC-SHA1 signing, `SendSms` API version 2017-05-25
//! - **Tencent Cloud**: TC3-HMAC-SHA256 signing, `SendSms` API version 2021-01-11
//! - **Debug logging**: redacted request/response dumps, off by default
//! - **Security**: phone number masking in logs

use std::collections::BTreeMap;
use std::sync::Arc;

use sg_core::domain::entities::SendResult;
use sg_core::errors::{SmsResult, UnifiedErrorKind};
use sg_core::services::{SmsDispatcher, SmsProvider};
use tracing::{info, warn};

use crate::config::GatewayConfig;
use crate::transport::{HttpResponse, HttpTransport};

pub mod aliyun;
pub mod debug_log;
pub mod tencent;

pub use aliyun::{AliyunSigner, AliyunSmsProvider};
pub use debug_log::DebugLogger;
pub use tencent::{TencentSigner, TencentSmsProvider};

#[cfg(test)]
mod tests;

/// A fully signed request, ready for `HttpTransport::post`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

/// Build a dispatcher with one adapter per configured vendor section
///
/// All adapters share `transport`. Vendors without a configuration section
/// are simply not registered, so sends routed to them come back as
/// provider-not-found results.
///
/// # Errors
///
/// * `SmsError::Configuration` - a vendor section is invalid
pub fn create_sms_dispatcher(
    config: &GatewayConfig,
    transport: Arc<dyn HttpTransport>,
) -> SmsResult<SmsDispatcher> {
    let dispatch = &config.sms;
    let mut providers: Vec<Arc<dyn SmsProvider>> = Vec::new();

    if let Some(aliyun) = &config.aliyun {
        aliyun.validate()?;
        let provider = AliyunSmsProvider::new(aliyun, transport.clone())
            .with_default_sign_name(dispatch.default_sign_name.clone())
            .with_debug_logging(dispatch.debug_logging_enabled);
        providers.push(Arc::new(provider));
    }

    if let Some(tencent) = &config.tencent {
        tencent.validate()?;
        let provider = TencentSmsProvider::new(tencent, transport.clone())?
            .with_default_sign_name(dispatch.default_sign_name.clone())
            .with_debug_logging(dispatch.debug_logging_enabled);
        providers.push(Arc::new(provider));
    }

    if providers.is_empty() {
        warn!("No SMS providers configured, every send will fail with provider not found");
    } else {
        info!(count = providers.len(), "SMS providers registered");
    }

    SmsDispatcher::new(providers, dispatch.clone())
}

/// Non-retryable result for a send the caller cancelled
pub(crate) fn cancelled_result(provider: &str) -> SendResult {
    warn!(provider, "SMS request cancelled");
    SendResult::failure(
        provider,
        UnifiedErrorKind::NetworkError,
        "CANCELLED",
        "Request cancelled",
    )
    .with_retryable(false)
}

/// Result for a reply body the adapter could not interpret; the HTTP status
/// is quoted when it was not a 2xx
pub(crate) fn invalid_response_result(provider: &str, response: &HttpResponse) -> SendResult {
    let message = if response.is_success() {
        "Invalid response format".to_string()
    } else {
        format!("Invalid response format (HTTP {})", response.status)
    };
    SendResult::failure(provider, UnifiedErrorKind::Unknown, "INVALID_RESPONSE", message)
}
