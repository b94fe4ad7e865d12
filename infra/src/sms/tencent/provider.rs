//! Tencent Cloud SMS provider adapter

use async_trait::async_trait;
use serde::Deserialize;
use sg_core::domain::entities::{SendRequest, SendResult};
use sg_core::domain::value_objects::TENCENT_PROVIDER_NAME;
use sg_core::errors::{ErrorCodeMapper, SmsResult, UnifiedErrorKind};
use sg_core::services::SmsProvider;
use sg_shared::utils::phone::mask_phone_number;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use super::signature::{build_body, TencentSigner};
use crate::config::TencentConfig;
use crate::sms::{cancelled_result, invalid_response_result};
use crate::sms::debug_log::DebugLogger;
use crate::transport::HttpTransport;
use crate::InfrastructureError;

/// Parsed `SendSms` response body
///
/// A request-level `Response.Error` and a per-number status other than `Ok`
/// both become `Error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TencentReply {
    Ok {
        request_id: String,
        serial_no: String,
    },
    Error {
        code: String,
        message: String,
        request_id: String,
    },
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "Response")]
    response: Option<RawResponse>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawResponse {
    error: Option<RawError>,
    #[serde(default)]
    send_status_set: Vec<RawStatus>,
    #[serde(default)]
    request_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawError {
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawStatus {
    code: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    serial_no: String,
}

impl TencentReply {
    /// Parse a response body; `None` when it is not a `SendSms` reply
    pub fn parse(body: &str) -> Option<Self> {
        let response = serde_json::from_str::<Envelope>(body).ok()?.response?;

        if let Some(error) = response.error {
            return Some(TencentReply::Error {
                code: error.code,
                message: error.message,
                request_id: response.request_id,
            });
        }

        let status = response.send_status_set.into_iter().next()?;
        if status.code == "Ok" {
            Some(TencentReply::Ok {
                request_id: response.request_id,
                serial_no: status.serial_no,
            })
        } else {
            Some(TencentReply::Error {
                code: status.code,
                message: status.message,
                request_id: response.request_id,
            })
        }
    }
}

/// Sends through the Tencent Cloud `SendSms` API
pub struct TencentSmsProvider {
    signer: TencentSigner,
    sms_sdk_app_id: String,
    transport: Arc<dyn HttpTransport>,
    default_sign_name: Option<String>,
    debug_log: DebugLogger,
}

impl TencentSmsProvider {
    /// # Errors
    ///
    /// * `InfrastructureError::Config` - the endpoint or origin endpoint is not a valid host or URL
    pub fn new(
        config: &TencentConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, InfrastructureError> {
        Ok(Self {
            signer: TencentSigner::new(config)?,
            sms_sdk_app_id: config.sms_sdk_app_id.clone(),
            transport,
            default_sign_name: None,
            debug_log: DebugLogger::default(),
        })
    }

    /// Sign name used when a request carries none
    pub fn with_default_sign_name(mut self, sign_name: Option<String>) -> Self {
        self.default_sign_name = sign_name;
        self
    }

    pub fn with_debug_logging(mut self, enabled: bool) -> Self {
        self.debug_log = DebugLogger::new(enabled);
        self
    }

    fn result_from_reply(&self, reply: TencentReply) -> SendResult {
        match reply {
            TencentReply::Ok {
                request_id,
                serial_no,
            } => SendResult::success(self.name(), request_id, serial_no),
            TencentReply::Error {
                code,
                message,
                request_id,
            } => {
                let kind = ErrorCodeMapper::map_tencent(&code);
                warn!(code = %code, message = %message, kind = %kind, "Tencent Cloud rejected SMS");
                SendResult::failure(self.name(), kind, code, message).with_request_id(request_id)
            }
        }
    }
}

#[async_trait]
impl SmsProvider for TencentSmsProvider {
    fn name(&self) -> &str {
        TENCENT_PROVIDER_NAME
    }

    async fn send(
        &self,
        request: &SendRequest,
        cancel: &CancellationToken,
    ) -> SmsResult<SendResult> {
        let Some(sign_name) = request.resolve_sign_name(self.default_sign_name.as_deref()) else {
            error!("No sign name in request or configuration");
            return Ok(SendResult::failure(
                self.name(),
                UnifiedErrorKind::SignatureNotFound,
                "MISSING_SIGN_NAME",
                "Sign name is required",
            ));
        };

        let body = match build_body(
            &request.phone_number,
            &self.sms_sdk_app_id,
            sign_name,
            &request.template_id,
            request.template_params.values().map(String::as_str),
        ) {
            Ok(body) => body,
            Err(e) => {
                error!(error = %e, "Failed to encode Tencent Cloud request body");
                return Ok(SendResult::failure(
                    self.name(),
                    UnifiedErrorKind::InvalidParameter,
                    "EXCEPTION",
                    e.to_string(),
                ));
            }
        };
        let signed = self.signer.build_request(body);

        debug!(
            phone = %mask_phone_number(&request.phone_number),
            template_id = %request.template_id,
            "Sending SMS via Tencent Cloud"
        );
        self.debug_log
            .log_request(self.name(), &signed.url, &signed.headers, &signed.body);

        let response = match self
            .transport
            .post(&signed.url, &signed.headers, signed.body, cancel)
            .await
        {
            Ok(response) => response,
            Err(InfrastructureError::Cancelled) => {
                return Ok(cancelled_result(self.name()));
            }
            Err(e) => {
                error!(error = %e, "Error sending SMS via Tencent Cloud");
                return Ok(SendResult::failure(
                    self.name(),
                    UnifiedErrorKind::NetworkError,
                    "EXCEPTION",
                    e.to_string(),
                ));
            }
        };

        self.debug_log
            .log_response(self.name(), response.status, &response.body);

        match TencentReply::parse(&response.body) {
            Some(reply) => Ok(self.result_from_reply(reply)),
            None => {
                error!(status = response.status, "Unrecognized Tencent Cloud response");
                Ok(invalid_response_result(self.name(), &response))
            }
        }
    }
}
