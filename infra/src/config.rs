//! Configuration management for infrastructure services
//!
//! Handles:
//! - Aliyun and Tencent Cloud credentials
//! - Gateway configuration files with `SMSGATE__` environment overrides
//! - `.env` loading

use serde::{Deserialize, Serialize};
use sg_shared::config::{DispatchConfig, Environment, LoggingConfig};
use std::env;
use std::path::Path;
use tracing::{debug, info};

use crate::InfrastructureError;

/// Default Aliyun SMS API host
pub const ALIYUN_DEFAULT_ENDPOINT: &str = "dysmsapi.aliyuncs.com";

/// Default Tencent Cloud SMS API host
pub const TENCENT_DEFAULT_ENDPOINT: &str = "sms.tencentcloudapi.com";

/// Default Tencent Cloud region
pub const TENCENT_DEFAULT_REGION: &str = "ap-beijing";

/// Aliyun SMS credentials and endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AliyunConfig {
    pub access_key_id: String,
    pub access_key_secret: String,
    /// Host, optionally with a port
    #[serde(default = "default_aliyun_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_use_https")]
    pub use_https: bool,
}

impl AliyunConfig {
    pub fn new(access_key_id: impl Into<String>, access_key_secret: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            access_key_secret: access_key_secret.into(),
            endpoint: default_aliyun_endpoint(),
            use_https: true,
        }
    }

    /// Point the adapter at a different host (a proxy or a mock server)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>, use_https: bool) -> Self {
        self.endpoint = endpoint.into();
        self.use_https = use_https;
        self
    }

    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        let access_key_id = env::var("ALIYUN_ACCESS_KEY_ID")
            .map_err(|_| InfrastructureError::Config("ALIYUN_ACCESS_KEY_ID not set".to_string()))?;
        let access_key_secret = env::var("ALIYUN_ACCESS_KEY_SECRET").map_err(|_| {
            InfrastructureError::Config("ALIYUN_ACCESS_KEY_SECRET not set".to_string())
        })?;

        let mut config = Self::new(access_key_id, access_key_secret);
        if let Ok(endpoint) = env::var("ALIYUN_SMS_ENDPOINT") {
            config.endpoint = endpoint;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), InfrastructureError> {
        require("aliyun.access_key_id", &self.access_key_id)?;
        require("aliyun.access_key_secret", &self.access_key_secret)?;
        require("aliyun.endpoint", &self.endpoint)
    }
}

/// Tencent Cloud SMS credentials, application and endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TencentConfig {
    pub secret_id: String,
    pub secret_key: String,
    pub sms_sdk_app_id: String,
    #[serde(default = "default_tencent_region")]
    pub region: String,
    /// Host or full URL the request is sent to
    #[serde(default = "default_tencent_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_use_https")]
    pub use_https: bool,
    /// Host used for signing when `endpoint` is a proxy in front of Tencent Cloud
    #[serde(default)]
    pub origin_endpoint: Option<String>,
}

impl TencentConfig {
    pub fn new(
        secret_id: impl Into<String>,
        secret_key: impl Into<String>,
        sms_sdk_app_id: impl Into<String>,
    ) -> Self {
        Self {
            secret_id: secret_id.into(),
            secret_key: secret_key.into(),
            sms_sdk_app_id: sms_sdk_app_id.into(),
            region: default_tencent_region(),
            endpoint: default_tencent_endpoint(),
            use_https: true,
            origin_endpoint: None,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Point the adapter at a different host (a proxy or a mock server)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>, use_https: bool) -> Self {
        self.endpoint = endpoint.into();
        self.use_https = use_https;
        self
    }

    pub fn with_origin_endpoint(mut self, origin: impl Into<String>) -> Self {
        self.origin_endpoint = Some(origin.into());
        self
    }

    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        let secret_id = env::var("TENCENT_SECRET_ID")
            .map_err(|_| InfrastructureError::Config("TENCENT_SECRET_ID not set".to_string()))?;
        let secret_key = env::var("TENCENT_SECRET_KEY")
            .map_err(|_| InfrastructureError::Config("TENCENT_SECRET_KEY not set".to_string()))?;
        let app_id = env::var("TENCENT_SMS_SDK_APP_ID").map_err(|_| {
            InfrastructureError::Config("TENCENT_SMS_SDK_APP_ID not set".to_string())
        })?;

        let mut config = Self::new(secret_id, secret_key, app_id);
        if let Ok(region) = env::var("TENCENT_REGION") {
            config.region = region;
        }
        if let Ok(endpoint) = env::var("TENCENT_SMS_ENDPOINT") {
            config.endpoint = endpoint;
        }
        config.origin_endpoint = env::var("TENCENT_ORIGIN_ENDPOINT")
            .ok()
            .filter(|v| !v.trim().is_empty());
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), InfrastructureError> {
        require("tencent.secret_id", &self.secret_id)?;
        require("tencent.secret_key", &self.secret_key)?;
        require("tencent.sms_sdk_app_id", &self.sms_sdk_app_id)?;
        require("tencent.region", &self.region)?;
        require("tencent.endpoint", &self.endpoint)
    }
}

/// Everything needed to build a dispatcher and its logging
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct GatewayConfig {
    /// Provider selection and failover
    #[serde(default)]
    pub sms: DispatchConfig,
    /// Registered only when present
    #[serde(default)]
    pub aliyun: Option<AliyunConfig>,
    /// Registered only when present
    #[serde(default)]
    pub tencent: Option<TencentConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GatewayConfig {
    /// Assemble configuration from plain environment variables
    ///
    /// Vendor sections whose credentials are missing are left out.
    pub fn from_env() -> Self {
        Self {
            sms: DispatchConfig::from_env(),
            aliyun: AliyunConfig::from_env().ok(),
            tencent: TencentConfig::from_env().ok(),
            logging: LoggingConfig::from_env(),
        }
    }

    /// Check every configured vendor section
    pub fn validate(&self) -> Result<(), InfrastructureError> {
        if let Some(aliyun) = &self.aliyun {
            aliyun.validate()?;
        }
        if let Some(tencent) = &self.tencent {
            tencent.validate()?;
        }
        Ok(())
    }
}

/// Load gateway configuration
///
/// Sources, lowest precedence first:
/// 1. `path`, or the environment's default file (`config/sms.<env>.toml`) if it exists
/// 2. `SMSGATE__`-prefixed environment variables, e.g. `SMSGATE__SMS__DEFAULT_PROVIDER`
///    or `SMSGATE__ALIYUN__ACCESS_KEY_ID`
///
/// A `.env` file in the working directory is loaded first.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, InfrastructureError> {
    dotenvy::dotenv().ok();

    let file = config_file_source(path, Environment::from_env());

    let settings = ::config::Config::builder()
        .add_source(file)
        .add_source(
            ::config::Environment::with_prefix("SMSGATE")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("sms.provider_priority")
                .try_parsing(true),
        )
        .build()?;

    let config: GatewayConfig = settings.try_deserialize()?;
    config.validate()?;

    info!(
        aliyun = config.aliyun.is_some(),
        tencent = config.tencent.is_some(),
        default_provider = %config.sms.default_provider,
        "SMS gateway configuration loaded"
    );

    Ok(config)
}

/// An explicit path must exist; the per-environment default is optional
/// everywhere except production
fn config_file_source(
    path: Option<&Path>,
    env: Environment,
) -> ::config::File<::config::FileSourceFile, ::config::FileFormat> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "Loading SMS gateway configuration");
            ::config::File::from(path).required(true)
        }
        None => {
            let default_file = Path::new(env.config_file());
            debug!(path = %default_file.display(), %env, "Looking for default SMS gateway configuration");
            ::config::File::from(default_file).required(env.is_production())
        }
    }
}

fn require(field: &str, value: &str) -> Result<(), InfrastructureError> {
    if value.trim().is_empty() {
        return Err(InfrastructureError::Config(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn default_aliyun_endpoint() -> String {
    ALIYUN_DEFAULT_ENDPOINT.to_string()
}

fn default_tencent_endpoint() -> String {
    TENCENT_DEFAULT_ENDPOINT.to_string()
}

fn default_tencent_region() -> String {
    TENCENT_DEFAULT_REGION.to_string()
}

fn default_use_https() -> bool {
    true
}
