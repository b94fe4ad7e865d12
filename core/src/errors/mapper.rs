//! Vendor error code normalization
//!
//! Static tables translate each vendor's native error codes into
//! `UnifiedErrorKind`, and each unified kind into a bilingual friendly message
//! and a retryability flag. Lookups never fail: an unmapped code is `Unknown`.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::types::UnifiedErrorKind;

/// Vendors with a native error vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vendor {
    Aliyun,
    Tencent,
}

/// Aliyun SMS error codes
pub const ALIYUN_ERROR_CODES: &[(&str, UnifiedErrorKind)] = &[
    ("OK", UnifiedErrorKind::Success),
    ("InvalidParameter", UnifiedErrorKind::InvalidParameter),
    ("SignatureDoesNotMatch", UnifiedErrorKind::AuthenticationFailed),
    ("InvalidAccessKeyId.NotFound", UnifiedErrorKind::AuthenticationFailed),
    ("InvalidTimeStamp.Expired", UnifiedErrorKind::AuthenticationFailed),
    ("Forbidden.AccessKeyDisabled", UnifiedErrorKind::InsufficientPermissions),
    ("InsufficientBalance", UnifiedErrorKind::InsufficientBalance),
    ("Throttling.User", UnifiedErrorKind::RateLimitExceeded),
    ("InvalidTemplateCode.MalFormed", UnifiedErrorKind::TemplateNotFound),
    ("InvalidSignName.MalFormed", UnifiedErrorKind::SignatureNotFound),
    ("InvalidRecNum.MalFormed", UnifiedErrorKind::InvalidPhoneNumber),
    ("InternalError", UnifiedErrorKind::ProviderInternalError),
];

/// Tencent Cloud SMS error codes
pub const TENCENT_ERROR_CODES: &[(&str, UnifiedErrorKind)] = &[
    ("Ok", UnifiedErrorKind::Success),
    ("InvalidParameter", UnifiedErrorKind::InvalidParameter),
    ("AuthFailure.SignatureFailure", UnifiedErrorKind::AuthenticationFailed),
    ("AuthFailure.SecretIdNotFound", UnifiedErrorKind::AuthenticationFailed),
    ("AuthFailure.TokenFailure", UnifiedErrorKind::AuthenticationFailed),
    ("UnauthorizedOperation", UnifiedErrorKind::InsufficientPermissions),
    ("RequestLimitExceeded", UnifiedErrorKind::RateLimitExceeded),
    ("InvalidParameterValue.TemplateIDInvalid", UnifiedErrorKind::TemplateNotFound),
    ("InvalidParameterValue.SignNameInvalid", UnifiedErrorKind::SignatureNotFound),
    ("InvalidParameterValue.PhoneNumberInvalid", UnifiedErrorKind::InvalidPhoneNumber),
    ("LimitExceeded.PhoneNumberDailyLimit", UnifiedErrorKind::RateLimitExceeded),
    ("InternalError", UnifiedErrorKind::ProviderInternalError),
];

static ALIYUN_LOOKUP: Lazy<HashMap<&'static str, UnifiedErrorKind>> =
    Lazy::new(|| ALIYUN_ERROR_CODES.iter().copied().collect());

static TENCENT_LOOKUP: Lazy<HashMap<&'static str, UnifiedErrorKind>> =
    Lazy::new(|| TENCENT_ERROR_CODES.iter().copied().collect());

/// Stateless mapper between vendor codes and the unified taxonomy
pub struct ErrorCodeMapper;

impl ErrorCodeMapper {
    /// Map a vendor code; codes missing from the vendor's table map to `Unknown`
    pub fn map(vendor: Vendor, code: &str) -> UnifiedErrorKind {
        let table = match vendor {
            Vendor::Aliyun => &*ALIYUN_LOOKUP,
            Vendor::Tencent => &*TENCENT_LOOKUP,
        };
        table.get(code).copied().unwrap_or(UnifiedErrorKind::Unknown)
    }

    /// Map an Aliyun error code
    pub fn map_aliyun(code: &str) -> UnifiedErrorKind {
        Self::map(Vendor::Aliyun, code)
    }

    /// Map a Tencent Cloud error code
    pub fn map_tencent(code: &str) -> UnifiedErrorKind {
        Self::map(Vendor::Tencent, code)
    }

    /// Friendly message for a unified kind
    pub fn friendly_message(kind: UnifiedErrorKind) -> &'static str {
        match kind {
            UnifiedErrorKind::Success => "Sent successfully | 发送成功",
            UnifiedErrorKind::InvalidParameter => "Invalid parameter | 参数错误",
            UnifiedErrorKind::AuthenticationFailed => {
                "Authentication failed, check the access keys | 认证失败，请检查访问密钥"
            }
            UnifiedErrorKind::InsufficientPermissions => "Insufficient permissions | 权限不足",
            UnifiedErrorKind::InsufficientBalance => "Insufficient account balance | 账户余额不足",
            UnifiedErrorKind::RateLimitExceeded => {
                "Sending too frequently, please retry later | 发送频率超限，请稍后重试"
            }
            UnifiedErrorKind::TemplateNotFound => "SMS template not found | 短信模板不存在",
            UnifiedErrorKind::SignatureNotFound => "SMS sign name not found | 短信签名不存在",
            UnifiedErrorKind::InvalidPhoneNumber => "Invalid phone number | 手机号格式错误",
            UnifiedErrorKind::NetworkError => "Network connection error | 网络连接错误",
            UnifiedErrorKind::ProviderInternalError => "Provider internal error | 服务商内部错误",
            UnifiedErrorKind::Unknown => "Unknown error | 未知错误",
            UnifiedErrorKind::ProviderNotFound => "SMS provider not found | 短信服务商不存在",
            UnifiedErrorKind::InvalidProviderName => {
                "SMS provider name must not be empty | 短信服务商名称不能为空"
            }
        }
    }

    /// Whether an error of this kind may succeed on retry
    pub fn is_retryable(kind: UnifiedErrorKind) -> bool {
        matches!(
            kind,
            UnifiedErrorKind::NetworkError
                | UnifiedErrorKind::ProviderInternalError
                | UnifiedErrorKind::RateLimitExceeded
        )
    }
}
