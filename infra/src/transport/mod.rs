//! HTTP Transport Module
//!
//! The vendor adapters never talk to the network directly; they hand a fully
//! signed request to an `HttpTransport`. Production code uses
//! `ReqwestTransport`, tests and dry runs use `MockTransport`.

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio_util::sync::CancellationToken;

use crate::InfrastructureError;

pub mod mock;
pub mod reqwest_transport;

pub use mock::{MockTransport, RecordedRequest};
pub use reqwest_transport::{ReqwestTransport, DEFAULT_TIMEOUT};

#[cfg(test)]
mod tests;

/// Status and body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one signed POST request
///
/// Non-2xx statuses are not errors: vendors report rejections in the body,
/// so the response is handed back for the adapter to parse.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST `body` to `url` with exactly the given headers
    ///
    /// # Errors
    ///
    /// * `InfrastructureError::Cancelled` - `cancel` fired before a response arrived
    /// * `InfrastructureError::Http` - connection, TLS or timeout failure
    /// * `InfrastructureError::Transport` - connection failure reported by a non-reqwest transport
    async fn post(
        &self,
        url: &str,
        headers: &BTreeMap<String, String>,
        body: String,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, InfrastructureError>;
}
