//! reqwest-backed transport

use async_trait::async_trait;
use reqwest::Client;
use std::collections::BTreeMap;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use super::{HttpResponse, HttpTransport};
use crate::InfrastructureError;

/// Upper bound on a single vendor request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// `HttpTransport` over a shared `reqwest::Client`
///
/// The client pools connections internally, so one instance should be shared
/// by every adapter.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with the default 30 second timeout
    pub fn new() -> Result<Self, InfrastructureError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a transport with a custom request timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self, InfrastructureError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Wrap an already configured client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn execute(
        &self,
        url: &str,
        headers: &BTreeMap<String, String>,
        body: String,
    ) -> Result<HttpResponse, InfrastructureError> {
        let mut request = self.client.post(url);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        debug!(url = %url, "Sending HTTP request");

        let response = request.body(body).send().await.map_err(|e| {
            error!(error = %e, "HTTP request failed");
            InfrastructureError::Http(e)
        })?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!(status, "HTTP response received");

        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post(
        &self,
        url: &str,
        headers: &BTreeMap<String, String>,
        body: String,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, InfrastructureError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(url = %url, "HTTP request cancelled");
                Err(InfrastructureError::Cancelled)
            }
            result = self.execute(url, headers, body) => result,
        }
    }
}
