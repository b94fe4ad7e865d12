//! Trait for vendor adapter integration

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::entities::{SendRequest, SendResult};
use crate::errors::SmsResult;

/// A vendor adapter the dispatcher can route requests to
///
/// Adapters translate a `SendRequest` into the vendor's signed wire call and
/// normalize the reply. Vendor rejections and transport failures should come
/// back as a non-success `SendResult`; an `Err` is still tolerated and is
/// folded into a result by the dispatcher.
#[async_trait]
pub trait SmsProvider: Send + Sync {
    /// Canonical provider name, matched case-insensitively by the dispatcher
    fn name(&self) -> &str;

    /// Send one message
    async fn send(&self, request: &SendRequest, cancel: &CancellationToken) -> SmsResult<SendResult>;
}
