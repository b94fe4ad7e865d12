//! Aliyun (Alibaba Cloud) SMS
//!
//! - `signature` - query-string HMAC-SHA1 signing
//! - `provider` - `SmsProvider` adapter and response parsing

pub mod provider;
pub mod signature;

pub use provider::{AliyunReply, AliyunSmsProvider};
pub use signature::AliyunSigner;
