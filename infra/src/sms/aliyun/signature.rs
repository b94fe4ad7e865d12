//! Aliyun RPC-style request signing
//!
//! Every parameter goes in the query string. The signature is an HMAC-SHA1
//! over `POST&%2F&<encoded canonical query>` keyed with `secret&`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha1::Sha1;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::config::AliyunConfig;
use crate::sms::SignedRequest;

type HmacSha1 = Hmac<Sha1>;

pub const API_VERSION: &str = "2017-05-25";
pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";
pub const SIGNATURE_VERSION: &str = "1.0";
pub const USER_AGENT: &str = concat!("SmsGate/", env!("CARGO_PKG_VERSION"));

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

// Everything except ASCII alphanumerics and - . _ ~ ! ' ( ) is escaped
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'!')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a key or value for the canonical query
///
/// Escapes are uppercase `%XX` over UTF-8 bytes, so a space becomes `%20`
/// and `*` becomes `%2A`.
pub fn percent_encode(value: &str) -> String {
    utf8_percent_encode(value, QUERY_ENCODE_SET).to_string()
}

/// Sorted, encoded `k=v&k=v` query, skipping `Signature`
pub fn canonical_query(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .filter(|(key, _)| key.as_str() != "Signature")
        .map(|(key, value)| format!("{}={}", percent_encode(key), percent_encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

pub fn string_to_sign(params: &BTreeMap<String, String>) -> String {
    format!(
        "POST&{}&{}",
        percent_encode("/"),
        percent_encode(&canonical_query(params))
    )
}

/// Base64 HMAC-SHA1 of the string to sign
pub fn sign(access_key_secret: &str, params: &BTreeMap<String, String>) -> String {
    let key = format!("{}&", access_key_secret);
    let mut mac =
        HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(string_to_sign(params).as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Signs Aliyun SMS API requests for one set of credentials
#[derive(Debug, Clone)]
pub struct AliyunSigner {
    access_key_id: String,
    access_key_secret: String,
    endpoint: String,
    scheme: &'static str,
}

impl AliyunSigner {
    pub fn new(config: &AliyunConfig) -> Self {
        Self {
            access_key_id: config.access_key_id.clone(),
            access_key_secret: config.access_key_secret.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            scheme: if config.use_https { "https" } else { "http" },
        }
    }

    /// Sign `params` with the current time and a fresh nonce
    pub fn build_request(&self, params: BTreeMap<String, String>) -> SignedRequest {
        self.sign_at(params, Utc::now(), &Uuid::new_v4().to_string())
    }

    /// Sign `params` with a fixed timestamp and nonce
    pub fn sign_at(
        &self,
        mut params: BTreeMap<String, String>,
        timestamp: DateTime<Utc>,
        nonce: &str,
    ) -> SignedRequest {
        params.insert("AccessKeyId".into(), self.access_key_id.clone());
        params.insert("SignatureVersion".into(), SIGNATURE_VERSION.into());
        params.insert("SignatureMethod".into(), SIGNATURE_METHOD.into());
        params.insert("Timestamp".into(), timestamp.format(TIMESTAMP_FORMAT).to_string());
        params.insert("SignatureNonce".into(), nonce.to_string());
        params.insert("Format".into(), "JSON".into());
        params.insert("Version".into(), API_VERSION.into());

        let signature = sign(&self.access_key_secret, &params);
        params.insert("Signature".into(), signature);

        let query = params
            .iter()
            .map(|(key, value)| format!("{}={}", percent_encode(key), percent_encode(value)))
            .collect::<Vec<_>>()
            .join("&");

        let mut headers = BTreeMap::new();
        headers.insert("User-Agent".to_string(), USER_AGENT.to_string());

        SignedRequest {
            url: format!("{}://{}/?{}", self.scheme, self.endpoint, query),
            headers,
            body: String::new(),
        }
    }
}
