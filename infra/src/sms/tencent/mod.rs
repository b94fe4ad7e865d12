//! Tencent Cloud SMS
//!
//! - `signature` - TC3-HMAC-SHA256 signing and endpoint resolution
//! - `provider` - `SmsProvider` adapter and response parsing

pub mod provider;
pub mod signature;

pub use provider::{TencentReply, TencentSmsProvider};
pub use signature::{Endpoint, TencentSigner};
