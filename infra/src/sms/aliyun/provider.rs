//! Aliyun SMS provider adapter

use async_trait::async_trait;
use serde::Deserialize;
use sg_core::domain::entities::{SendRequest, SendResult};
use sg_core::domain::value_objects::ALIYUN_PROVIDER_NAME;
use sg_core::errors::{ErrorCodeMapper, SmsResult, UnifiedErrorKind};
use sg_core::services::SmsProvider;
use sg_shared::utils::phone::mask_phone_number;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use super::signature::AliyunSigner;
use crate::config::AliyunConfig;
use crate::sms::{cancelled_result, invalid_response_result};
use crate::sms::debug_log::DebugLogger;
use crate::transport::HttpTransport;
use crate::InfrastructureError;

/// Parsed `SendSms` response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliyunReply {
    Ok {
        request_id: String,
        biz_id: String,
    },
    Error {
        code: String,
        message: String,
        request_id: String,
    },
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawReply {
    code: Option<String>,
    #[serde(default)]
    message: String,
    #[serde(default)]
    request_id: String,
    #[serde(default)]
    biz_id: String,
}

impl AliyunReply {
    /// Parse a response body; `None` when it is not a `SendSms` reply
    pub fn parse(body: &str) -> Option<Self> {
        let raw: RawReply = serde_json::from_str(body).ok()?;
        let code = raw.code?;
        if code == "OK" {
            Some(AliyunReply::Ok {
                request_id: raw.request_id,
                biz_id: raw.biz_id,
            })
        } else {
            Some(AliyunReply::Error {
                code,
                message: raw.message,
                request_id: raw.request_id,
            })
        }
    }
}

/// Sends through the Aliyun `SendSms` API
pub struct AliyunSmsProvider {
    signer: AliyunSigner,
    transport: Arc<dyn HttpTransport>,
    default_sign_name: Option<String>,
    debug_log: DebugLogger,
}

impl AliyunSmsProvider {
    pub fn new(config: &AliyunConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            signer: AliyunSigner::new(config),
            transport,
            default_sign_name: None,
            debug_log: DebugLogger::default(),
        }
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

    /// Business parameters of a `SendSms` call, before signing
    pub fn business_params(
        request: &SendRequest,
        sign_name: &str,
    ) -> SmsResult<BTreeMap<String, String>> {
        let mut params = BTreeMap::new();
        params.insert("Action".to_string(), "SendSms".to_string());
        params.insert("PhoneNumbers".to_string(), request.phone_number.clone());
        params.insert("SignName".to_string(), sign_name.to_string());
        params.insert("TemplateCode".to_string(), request.template_id.clone());
        if !request.template_params.is_empty() {
            params.insert(
                "TemplateParam".to_string(),
                serde_json::to_string(&request.template_params)?,
            );
        }
        Ok(params)
    }

    fn result_from_reply(&self, reply: AliyunReply) -> SendResult {
        match reply {
            AliyunReply::Ok { request_id, biz_id } => {
                SendResult::success(self.name(), request_id, biz_id)
            }
            AliyunReply::Error {
                code,
                message,
                request_id,
            } => {
                let kind = ErrorCodeMapper::map_aliyun(&code);
                warn!(code = %code, message = %message, kind = %kind, "Aliyun rejected SMS");
                SendResult::failure(self.name(), kind, code, message).with_request_id(request_id)
            }
        }
    }
}

#[async_trait]
impl SmsProvider for AliyunSmsProvider {
    fn name(&self) -> &str {
        ALIYUN_PROVIDER_NAME
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

        let params = match Self::business_params(request, sign_name) {
            Ok(params) => params,
            Err(e) => {
                error!(error = %e, "Failed to encode Aliyun template parameters");
                return Ok(SendResult::failure(
                    self.name(),
                    UnifiedErrorKind::InvalidParameter,
                    "EXCEPTION",
                    e.to_string(),
                ));
            }
        };
        let signed = self.signer.build_request(params);

        debug!(
            phone = %mask_phone_number(&request.phone_number),
            template_id = %request.template_id,
            "Sending SMS via Aliyun"
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
                error!(error = %e, "Error sending SMS via Aliyun");
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

        match AliyunReply::parse(&response.body) {
            Some(reply) => Ok(self.result_from_reply(reply)),
            None => {
                error!(status = response.status, "Unrecognized Aliyun response");
                Ok(invalid_response_result(self.name(), &response))
            }
        }
    }
}
