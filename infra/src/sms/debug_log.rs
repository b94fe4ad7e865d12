//! Redacted wire dumps for troubleshooting vendor integrations
//!
//! Signatures, access keys, nonces, authorization headers, template
//! parameters and phone numbers never reach the log in clear text.

use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::{Captures, Regex};
use serde_json::Value;
use sg_shared::utils::phone::{mask_if_phone, mask_phone_number};
use std::collections::BTreeMap;
use tracing::{debug, Level};

const MASK: &str = "***";

const SENSITIVE_HEADERS: [&str; 2] = ["Authorization", "X-TC-Token"];

const SENSITIVE_FIELDS: [&str; 5] = [
    "SecretKey",
    "SecretId",
    "AccessKeySecret",
    "AccessKeyId",
    "TemplateParamSet",
];

static SENSITIVE_QUERY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(^|[?&])(Signature|AccessKeyId|SignatureNonce|TemplateParam|PhoneNumbers)=([^&#]*)",
    )
        .expect("valid query redaction regex")
});

/// Emits redacted request and response dumps at debug level when enabled
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugLogger {
    enabled: bool,
}

impl DebugLogger {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Enabled by configuration and the debug level is not filtered out
    pub fn is_enabled(&self) -> bool {
        self.enabled && tracing::enabled!(Level::DEBUG)
    }

    pub fn log_request(
        &self,
        provider: &str,
        url: &str,
        headers: &BTreeMap<String, String>,
        body: &str,
    ) {
        if !self.is_enabled() {
            return;
        }

        let headers = serde_json::to_string(&sanitize_headers(headers)).unwrap_or_default();
        debug!(provider, url = %sanitize_url(url), headers = %headers, "HTTP request");
        if !body.is_empty() {
            debug!(provider, body = %sanitize_json(body), "HTTP request body");
        }
    }

    pub fn log_response(&self, provider: &str, status: u16, body: &str) {
        if !self.is_enabled() {
            return;
        }

        debug!(provider, status, body = %sanitize_json(body), "HTTP response");
    }
}

/// Mask credential and template query values; `PhoneNumbers` keeps the
/// first 3 and last 4 digits of each number
pub fn sanitize_url(url: &str) -> String {
    SENSITIVE_QUERY_REGEX
        .replace_all(url, |caps: &Captures| {
            let value = match &caps[2] {
                "PhoneNumbers" => mask_phone_list(&caps[3]),
                _ => MASK.to_string(),
            };
            format!("{}{}={}", &caps[1], &caps[2], value)
        })
        .into_owned()
}

/// Aliyun sends recipients as one comma separated, percent-encoded value
fn mask_phone_list(encoded: &str) -> String {
    percent_decode_str(encoded)
        .decode_utf8_lossy()
        .split(',')
        .map(mask_phone_number)
        .collect::<Vec<_>>()
        .join(",")
}

/// Copy of `headers` with credential-bearing values masked
pub fn sanitize_headers(headers: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| {
            let sensitive = SENSITIVE_HEADERS
                .iter()
                .any(|h| h.eq_ignore_ascii_case(name));
            let value = if sensitive { MASK.to_string() } else { value.clone() };
            (name.clone(), value)
        })
        .collect()
}

/// Redact a JSON document; anything that is not JSON is returned unchanged
pub fn sanitize_json(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => sanitize_value(value).to_string(),
        Err(_) => body.to_string(),
    }
}

fn sanitize_value(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| {
                    if SENSITIVE_FIELDS.iter().any(|f| f.eq_ignore_ascii_case(&key)) {
                        (key, Value::String(MASK.to_string()))
                    } else {
                        (key, sanitize_value(value))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize_value).collect()),
        Value::String(s) => Value::String(mask_if_phone(&s).into_owned()),
        other => other,
    }
}
