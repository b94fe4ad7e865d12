//! Tencent Cloud TC3-HMAC-SHA256 request signing
//!
//! Only `content-type` and `host` are signed. The signing key is derived
//! from the secret through the date, the service name and `tc3_request`.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use url::Url;

use crate::config::TencentConfig;
use crate::sms::SignedRequest;
use crate::InfrastructureError;

type HmacSha256 = Hmac<Sha256>;

pub const ALGORITHM: &str = "TC3-HMAC-SHA256";
pub const SERVICE: &str = "sms";
pub const API_VERSION: &str = "2021-01-11";
pub const ACTION: &str = "SendSms";
pub const CONTENT_TYPE: &str = "application/json; charset=utf-8";
pub const SIGNED_HEADERS: &str = "content-type;host";

/// Scheme, host and path of a resolved endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub scheme: String,
    /// Host, with the port only when it is not the scheme's default
    pub host: String,
    pub path: String,
}

impl Endpoint {
    /// Resolve a bare host (`sms.tencentcloudapi.com`, `proxy:8080`) or a
    /// full URL (`http://proxy:8080/sms`)
    pub fn parse(endpoint: &str, use_https: bool) -> Result<Self, InfrastructureError> {
        let endpoint = endpoint.trim();
        let full = if endpoint.contains("://") {
            endpoint.to_string()
        } else {
            let scheme = if use_https { "https" } else { "http" };
            format!("{}://{}", scheme, endpoint)
        };

        let url = Url::parse(&full)
            .map_err(|e| InfrastructureError::Config(format!("Invalid endpoint {}: {}", endpoint, e)))?;
        let host = url
            .host_str()
            .ok_or_else(|| InfrastructureError::Config(format!("Endpoint {} has no host", endpoint)))?;

        // `Url::port` is None when the port is the scheme's default
        let host = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        Ok(Self {
            scheme: url.scheme().to_string(),
            host,
            path: url.path().to_string(),
        })
    }

    pub fn url(&self) -> String {
        format!("{}://{}{}", self.scheme, self.host, self.path)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendSmsBody<'a> {
    phone_number_set: [&'a str; 1],
    sms_sdk_app_id: &'a str,
    sign_name: &'a str,
    template_id: &'a str,
    template_param_set: Vec<&'a str>,
}

/// Compact JSON body of a single-recipient `SendSms` call
///
/// Template values are positional, in the order given.
pub fn build_body<'a>(
    phone_number: &str,
    sms_sdk_app_id: &str,
    sign_name: &str,
    template_id: &str,
    template_values: impl IntoIterator<Item = &'a str>,
) -> Result<String, serde_json::Error> {
    serde_json::to_string(&SendSmsBody {
        phone_number_set: [phone_number],
        sms_sdk_app_id,
        sign_name,
        template_id,
        template_param_set: template_values.into_iter().collect(),
    })
}

pub fn sha256_hex(data: &str) -> String {
    hex::encode(Sha256::digest(data.as_bytes()))
}

fn hmac_sha256(key: &[u8], data: &str) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(data.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

pub fn canonical_request(path: &str, host: &str, body: &str) -> String {
    format!(
        "POST\n{}\n\ncontent-type:{}\nhost:{}\n\n{}\n{}",
        path,
        CONTENT_TYPE,
        host.to_lowercase(),
        SIGNED_HEADERS,
        sha256_hex(body)
    )
}

pub fn credential_scope(date: &str) -> String {
    format!("{}/{}/tc3_request", date, SERVICE)
}

pub fn string_to_sign(timestamp: i64, scope: &str, canonical_request: &str) -> String {
    format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        timestamp,
        scope,
        sha256_hex(canonical_request)
    )
}

/// Lowercase hex signature over `string_to_sign`
pub fn sign(secret_key: &str, date: &str, string_to_sign: &str) -> String {
    let k_date = hmac_sha256(format!("TC3{}", secret_key).as_bytes(), date);
    let k_service = hmac_sha256(&k_date, SERVICE);
    let k_signing = hmac_sha256(&k_service, "tc3_request");
    hex::encode(hmac_sha256(&k_signing, string_to_sign))
}

/// Signs Tencent Cloud SMS API requests for one set of credentials
#[derive(Debug, Clone)]
pub struct TencentSigner {
    secret_id: String,
    secret_key: String,
    region: String,
    /// Where the request is sent
    target: Endpoint,
    /// Host that goes into the signature and the Host header
    signing_host: String,
}

impl TencentSigner {
    pub fn new(config: &TencentConfig) -> Result<Self, InfrastructureError> {
        let target = Endpoint::parse(&config.endpoint, config.use_https)?;
        let signing_host = match config.origin_endpoint.as_deref().filter(|o| !o.trim().is_empty()) {
            Some(origin) => Endpoint::parse(origin, true)?.host,
            None => target.host.clone(),
        };

        Ok(Self {
            secret_id: config.secret_id.clone(),
            secret_key: config.secret_key.clone(),
            region: config.region.clone(),
            target,
            signing_host,
        })
    }

    pub fn target(&self) -> &Endpoint {
        &self.target
    }

    pub fn signing_host(&self) -> &str {
        &self.signing_host
    }

    /// Sign `body` with the current time
    pub fn build_request(&self, body: String) -> SignedRequest {
        self.sign_at(body, Utc::now())
    }

    /// Sign `body` at a fixed time; the body is sent exactly as hashed
    pub fn sign_at(&self, body: String, time: DateTime<Utc>) -> SignedRequest {
        let timestamp = time.timestamp();
        let date = time.format("%Y-%m-%d").to_string();
        let scope = credential_scope(&date);

        let canonical = canonical_request(&self.target.path, &self.signing_host, &body);
        let to_sign = string_to_sign(timestamp, &scope, &canonical);
        let signature = sign(&self.secret_key, &date, &to_sign);

        let authorization = format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            ALGORITHM, self.secret_id, scope, SIGNED_HEADERS, signature
        );

        let mut headers = BTreeMap::new();
        headers.insert("Authorization".to_string(), authorization);
        headers.insert("Content-Type".to_string(), CONTENT_TYPE.to_string());
        headers.insert("Host".to_string(), self.signing_host.clone());
        headers.insert("X-TC-Action".to_string(), ACTION.to_string());
        headers.insert("X-TC-Timestamp".to_string(), timestamp.to_string());
        headers.insert("X-TC-Version".to_string(), API_VERSION.to_string());
        headers.insert("X-TC-Region".to_string(), self.region.clone());

        SignedRequest {
            url: self.target.url(),
            headers,
            body,
        }
    }
}
