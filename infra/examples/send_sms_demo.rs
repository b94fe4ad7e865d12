//! SMS gateway demo
//!
//! Usage:
//!
//! ```text
//! cargo run -p sg_infra --example send_sms_demo -- [config.toml] [phone]
//! ```
//!
//! Without a configuration file the default `config/sms.<env>.toml` and
//! `SMSGATE__*` environment variables are used. When no vendor credentials are
//! configured at all, the demo runs dry against a mock transport.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use sg_core::{ProviderSelector, SendRequest, SendResult};
use sg_infra::config::{load_config, AliyunConfig, GatewayConfig, TencentConfig};
use sg_infra::telemetry::init_tracing;
use sg_infra::transport::{HttpTransport, MockTransport, ReqwestTransport};
use sg_infra::create_sms_dispatcher;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let config_path = args.next().map(PathBuf::from);
    let phone = args.next().unwrap_or_else(|| "13800138000".to_string());

    let mut config = load_config(config_path.as_deref()).context("failed to load configuration")?;
    init_tracing(&config.logging)?;

    let transport: Arc<dyn HttpTransport> = if config.aliyun.is_none() && config.tencent.is_none() {
        println!("No vendor credentials configured, running against a mock transport\n");
        config = dry_run_config(config);
        Arc::new(MockTransport::new(
            200,
            r#"{"Code":"OK","Message":"OK","RequestId":"DRY-RUN-REQUEST","BizId":"DRY-RUN-BIZ"}"#,
        ))
    } else {
        Arc::new(ReqwestTransport::new()?)
    };

    let dispatcher = create_sms_dispatcher(&config, transport)?;
    let cancel = CancellationToken::new();

    println!("=== SMS Gateway Demo ===\n");
    println!("Registered providers: {:?}", dispatcher.available_providers());
    for selector in [ProviderSelector::Auto, ProviderSelector::Aliyun, ProviderSelector::Tencent] {
        println!(
            "  {:<8} available: {}",
            selector.to_string(),
            dispatcher.is_selector_available(selector)
        );
    }

    let request = SendRequest::new(phone, "SMS_001")
        .with_sign_name("测试签名")
        .with_param("code", "123456");

    println!("\n1. Default provider with failover");
    report(&dispatcher.send(&request, &cancel).await?);

    println!("\n2. Named provider (Tencent)");
    report(&dispatcher.send_via(&request, "Tencent", &cancel).await?);

    println!("\n3. Selector (Aliyun)");
    report(&dispatcher.send_with(&request, ProviderSelector::Aliyun, &cancel).await?);

    println!("\n4. Unknown provider");
    report(&dispatcher.send_via(&request, "NotExist", &cancel).await?);

    Ok(())
}

fn dry_run_config(config: GatewayConfig) -> GatewayConfig {
    GatewayConfig {
        aliyun: Some(AliyunConfig::new("demo-access-key", "demo-secret")),
        tencent: Some(TencentConfig::new("demo-secret-id", "demo-secret-key", "1400000000")),
        ..config
    }
}

fn report(result: &SendResult) {
    if result.success {
        println!(
            "   ✓ sent via {} (request id {}, biz id {})",
            result.provider_name, result.request_id, result.biz_id
        );
    } else {
        println!(
            "   ✗ {} failed: {} [{}] {} (retryable: {})",
            result.provider_name,
            result.error_kind,
            result.raw_error_code,
            result.friendly_message,
            result.retryable
        );
    }
}
