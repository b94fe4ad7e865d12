//! Business services containing dispatch logic.

pub mod dispatch;

// Re-export commonly used types
pub use dispatch::{SmsDispatcher, SmsProvider};
