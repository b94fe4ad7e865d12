//! Error taxonomy, vendor code mapping and domain error types.

mod mapper;
mod types;

#[cfg(test)]
mod tests;

pub use mapper::{ErrorCodeMapper, Vendor, ALIYUN_ERROR_CODES, TENCENT_ERROR_CODES};
pub use types::UnifiedErrorKind;

use thiserror::Error;

/// Errors surfaced to callers as `Err`.
///
/// Vendor rejections and transport failures are not errors at this level;
/// they come back as a non-success `SendResult`. Only contract violations and
/// wiring problems use this type, plus failures a custom provider chooses to
/// report instead of folding them into a result.
#[derive(Error, Debug)]
pub enum SmsError {
    #[error("Invalid argument: {message} | 参数无效: {message}")]
    InvalidArgument { message: String },

    #[error("Duplicate provider name: {name} | 重复的服务商名称: {name}")]
    DuplicateProvider { name: String },

    #[error("Configuration error: {message} | 配置错误: {message}")]
    Configuration { message: String },

    #[error("Network error: {message} | 网络错误: {message}")]
    Network { message: String },

    #[error("Request cancelled | 请求已取消")]
    Cancelled,

    #[error("Serialization error: {0} | 序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {message} | 内部错误: {message}")]
    Internal { message: String },
}

impl SmsError {
    /// Unified kind used when this error is folded into a `SendResult`
    pub fn unified_kind(&self) -> UnifiedErrorKind {
        match self {
            SmsError::Network { .. } | SmsError::Cancelled => UnifiedErrorKind::NetworkError,
            SmsError::InvalidArgument { .. } => UnifiedErrorKind::InvalidParameter,
            _ => UnifiedErrorKind::Unknown,
        }
    }
}

pub type SmsResult<T> = Result<T, SmsError>;
