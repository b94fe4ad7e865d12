//! Provider registry with selection and sequential failover

use std::sync::Arc;

use sg_shared::config::DispatchConfig;
use sg_shared::utils::phone::mask_phone_number;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::domain::entities::{SendRequest, SendResult};
use crate::domain::value_objects::ProviderSelector;
use crate::errors::{SmsError, SmsResult, UnifiedErrorKind};

use super::traits::SmsProvider;

/// Routes send requests to registered providers
///
/// Holds only immutable state, so one instance can be shared across tasks
/// behind an `Arc` without locking.
pub struct SmsDispatcher {
    /// Registered providers in registration order
    providers: Vec<Arc<dyn SmsProvider>>,
    /// Selection and failover settings
    config: DispatchConfig,
}

impl SmsDispatcher {
    /// Create a dispatcher over `providers`
    ///
    /// # Errors
    ///
    /// * `SmsError::InvalidArgument` - a provider reports a blank name
    /// * `SmsError::DuplicateProvider` - two providers share a name, ignoring case
    pub fn new(providers: Vec<Arc<dyn SmsProvider>>, config: DispatchConfig) -> SmsResult<Self> {
        for (index, provider) in providers.iter().enumerate() {
            let name = provider.name();
            if name.trim().is_empty() {
                return Err(SmsError::InvalidArgument {
                    message: "provider name must not be empty".to_string(),
                });
            }
            if providers[..index]
                .iter()
                .any(|earlier| earlier.name().eq_ignore_ascii_case(name))
            {
                return Err(SmsError::DuplicateProvider { name: name.to_string() });
            }
        }

        info!(
            providers = ?providers.iter().map(|p| p.name()).collect::<Vec<_>>(),
            default_provider = %config.default_provider,
            failover_enabled = config.failover_enabled,
            "SMS dispatcher initialized"
        );

        Ok(Self { providers, config })
    }

    /// Configuration this dispatcher was built with
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Send via the default provider, failing over in priority order when enabled
    ///
    /// The default provider is always tried first and never repeated; each
    /// priority entry is tried at most once, strictly one after another.
    /// Returns the first successful result, or the last attempted one.
    ///
    /// # Errors
    ///
    /// * `SmsError::InvalidArgument` - the request has no phone number or template
    pub async fn send(
        &self,
        request: &SendRequest,
        cancel: &CancellationToken,
    ) -> SmsResult<SendResult> {
        request.validate()?;

        let default_provider = self.config.default_provider.as_str();
        info!(provider = default_provider, "Using default SMS provider");

        let mut result = self.dispatch(request, default_provider, cancel).await;
        if result.success || !self.config.failover_enabled {
            return Ok(result);
        }

        warn!(
            provider = default_provider,
            error_kind = %result.error_kind,
            "Default SMS provider failed, trying failover providers"
        );

        let mut attempted: Vec<&str> = vec![default_provider];
        for candidate in &self.config.provider_priority {
            if cancel.is_cancelled() {
                warn!("SMS send cancelled, skipping remaining failover providers");
                break;
            }
            if attempted.iter().any(|name| name.eq_ignore_ascii_case(candidate)) {
                continue;
            }
            if !self.is_available(candidate) {
                debug!(provider = %candidate, "Failover provider not registered, skipping");
                continue;
            }

            attempted.push(candidate);
            info!(provider = %candidate, "Trying failover SMS provider");
            result = self.dispatch(request, candidate, cancel).await;

            if result.success {
                info!(provider = %candidate, "Failover successful");
                break;
            }
        }

        if !result.success {
            error!(
                attempted = ?attempted,
                error_kind = %result.error_kind,
                "All SMS providers failed"
            );
        }

        Ok(result)
    }

    /// Send via the named provider only, without failover
    ///
    /// A blank or unregistered name produces a non-success result rather than
    /// an error.
    ///
    /// # Errors
    ///
    /// * `SmsError::InvalidArgument` - the request has no phone number or template
    pub async fn send_via(
        &self,
        request: &SendRequest,
        provider_name: &str,
        cancel: &CancellationToken,
    ) -> SmsResult<SendResult> {
        request.validate()?;
        Ok(self.dispatch(request, provider_name, cancel).await)
    }

    /// Send via the provider a selector resolves to, without failover
    ///
    /// `ProviderSelector::Auto` resolves to the configured default provider.
    pub async fn send_with(
        &self,
        request: &SendRequest,
        selector: ProviderSelector,
        cancel: &CancellationToken,
    ) -> SmsResult<SendResult> {
        let provider_name = selector.resolve(&self.config.default_provider);
        self.send_via(request, provider_name, cancel).await
    }

    /// Names of all registered providers, in registration order
    pub fn available_providers(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    /// Whether a provider with this name is registered, ignoring case
    pub fn is_available(&self, provider_name: &str) -> bool {
        self.find(provider_name).is_some()
    }

    /// Whether the provider a selector resolves to is registered
    pub fn is_selector_available(&self, selector: ProviderSelector) -> bool {
        let provider_name = selector.resolve(&self.config.default_provider);
        !provider_name.trim().is_empty() && self.is_available(provider_name)
    }

    fn find(&self, provider_name: &str) -> Option<&Arc<dyn SmsProvider>> {
        self.providers
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(provider_name))
    }

    async fn dispatch(
        &self,
        request: &SendRequest,
        provider_name: &str,
        cancel: &CancellationToken,
    ) -> SendResult {
        if provider_name.trim().is_empty() {
            error!("SMS provider name cannot be empty");
            return SendResult::failure(
                provider_name,
                UnifiedErrorKind::InvalidProviderName,
                "INVALID_PROVIDER_NAME",
                "Provider name cannot be null or empty",
            );
        }

        let Some(provider) = self.find(provider_name) else {
            error!(provider = provider_name, "SMS provider not found");
            return SendResult::failure(
                provider_name,
                UnifiedErrorKind::ProviderNotFound,
                "PROVIDER_NOT_FOUND",
                format!("Provider {} not found", provider_name),
            );
        };

        info!(
            provider = provider.name(),
            phone = %mask_phone_number(&request.phone_number),
            template_id = %request.template_id,
            "Sending SMS"
        );

        let mut result = match provider.send(request, cancel).await {
            Ok(result) => result,
            Err(SmsError::Cancelled) => {
                warn!(provider = provider.name(), "SMS send cancelled");
                SendResult::failure(
                    provider.name(),
                    UnifiedErrorKind::NetworkError,
                    "CANCELLED",
                    SmsError::Cancelled.to_string(),
                )
                .with_retryable(false)
            }
            Err(e) => {
                error!(provider = provider.name(), error = %e, "Unexpected failure while sending SMS");
                SendResult::failure(provider.name(), e.unified_kind(), "EXCEPTION", e.to_string())
            }
        };
        result.provider_name = provider.name().to_string();

        if result.success {
            info!(
                provider = provider.name(),
                request_id = %result.request_id,
                "SMS sent successfully"
            );
        } else {
            warn!(
                provider = provider.name(),
                error_code = %result.raw_error_code,
                error_message = %result.raw_error_message,
                error_kind = %result.error_kind,
                retryable = result.retryable,
                "SMS send failed"
            );
        }

        result
    }
}
