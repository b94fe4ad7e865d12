//! Unit tests for building a dispatcher from configuration

use sg_core::errors::UnifiedErrorKind;
use sg_core::SendRequest;
use sg_shared::config::DispatchConfig;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::config::{AliyunConfig, GatewayConfig, TencentConfig};
use crate::sms::create_sms_dispatcher;
use crate::transport::MockTransport;

fn full_config() -> GatewayConfig {
    GatewayConfig {
        sms: DispatchConfig::default().with_default_sign_name("测试签名"),
        aliyun: Some(AliyunConfig::new("id", "secret")),
        tencent: Some(TencentConfig::new("sid", "skey", "1400000000")),
        ..GatewayConfig::default()
    }
}

#[test]
fn test_registers_configured_vendors() {
    let transport = Arc::new(MockTransport::new(200, "{}"));
    let dispatcher = create_sms_dispatcher(&full_config(), transport).unwrap();

    assert_eq!(dispatcher.available_providers(), vec!["Aliyun", "Tencent"]);
}

#[test]
fn test_skips_missing_vendor_sections() {
    let config = GatewayConfig {
        tencent: None,
        ..full_config()
    };
    let dispatcher = create_sms_dispatcher(&config, Arc::new(MockTransport::new(200, "{}"))).unwrap();

    assert_eq!(dispatcher.available_providers(), vec!["Aliyun"]);
    assert!(!dispatcher.is_available("Tencent"));
}

#[test]
fn test_invalid_vendor_section_is_rejected() {
    let config = GatewayConfig {
        aliyun: Some(AliyunConfig::new("", "secret")),
        ..full_config()
    };
    assert!(create_sms_dispatcher(&config, Arc::new(MockTransport::new(200, "{}"))).is_err());
}

#[tokio::test]
async fn test_failover_from_aliyun_to_tencent() {
    let transport = Arc::new(
        MockTransport::new(
            200,
            r#"{"Response":{"SendStatusSet":[{"SerialNo":"s-1","Code":"Ok","Message":"send success"}],"RequestId":"t-1"}}"#,
        )
        .then_respond(200, r#"{"Code":"InternalError","Message":"oops","RequestId":"a-1"}"#),
    );
    let dispatcher = create_sms_dispatcher(&full_config(), transport.clone()).unwrap();
    let request = SendRequest::new("13800138000", "SMS_001").with_param("code", "123456");

    let result = dispatcher.send(&request, &CancellationToken::new()).await.unwrap();

    assert!(result.success);
    assert_eq!(result.provider_name, "Tencent");
    assert_eq!(result.request_id, "t-1");

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].url.starts_with("https://dysmsapi.aliyuncs.com/"));
    assert_eq!(requests[1].url, "https://sms.tencentcloudapi.com/");
}

#[tokio::test]
async fn test_unconfigured_vendor_is_not_found() {
    let config = GatewayConfig {
        tencent: None,
        ..full_config()
    };
    let dispatcher = create_sms_dispatcher(&config, Arc::new(MockTransport::new(200, "{}"))).unwrap();
    let request = SendRequest::new("13800138000", "SMS_001");

    let result = dispatcher
        .send_via(&request, "Tencent", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.error_kind, UnifiedErrorKind::ProviderNotFound);
}
