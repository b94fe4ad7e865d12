//! Normalized SMS send request

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::{SmsError, SmsResult};

/// Template parameters in insertion order.
///
/// Some vendors bind parameters positionally, so the order callers insert
/// them in is the order they go on the wire.
pub type TemplateParams = IndexMap<String, String>;

/// A single-recipient templated SMS
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendRequest {
    /// Recipient phone number; format validation is left to the vendor
    pub phone_number: String,
    /// Vendor-side template identifier
    pub template_id: String,
    /// Values substituted into the template
    #[serde(default)]
    pub template_params: TemplateParams,
    /// Sign name shown as the message prefix; falls back to the configured default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign_name: Option<String>,
}

impl SendRequest {
    /// Create a request without parameters or sign name
    pub fn new(phone_number: impl Into<String>, template_id: impl Into<String>) -> Self {
        Self {
            phone_number: phone_number.into(),
            template_id: template_id.into(),
            template_params: TemplateParams::new(),
            sign_name: None,
        }
    }

    /// Add a template parameter, replacing an existing value for the same key
    /// while keeping its original position
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.template_params.insert(key.into(), value.into());
        self
    }

    /// Set the sign name
    pub fn with_sign_name(mut self, sign_name: impl Into<String>) -> Self {
        self.sign_name = Some(sign_name.into());
        self
    }

    /// Resolve the sign name to use: the request's own, else `default`.
    /// Blank values count as absent.
    pub fn resolve_sign_name<'a>(&'a self, default: Option<&'a str>) -> Option<&'a str> {
        self.sign_name
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| default.filter(|s| !s.trim().is_empty()))
    }

    /// Reject requests that no provider could possibly send
    pub fn validate(&self) -> SmsResult<()> {
        if self.phone_number.trim().is_empty() {
            return Err(SmsError::InvalidArgument {
                message: "phone_number must not be empty".to_string(),
            });
        }
        if self.template_id.trim().is_empty() {
            return Err(SmsError::InvalidArgument {
                message: "template_id must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
