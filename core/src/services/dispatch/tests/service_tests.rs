//! Unit tests for the SMS dispatcher

use std::sync::Arc;

use sg_shared::config::DispatchConfig;
use tokio_util::sync::CancellationToken;

use crate::domain::entities::SendRequest;
use crate::domain::value_objects::ProviderSelector;
use crate::errors::{SmsError, UnifiedErrorKind};
use crate::services::dispatch::{SmsDispatcher, SmsProvider};

use super::mocks::{call_log, Behavior, MockProvider};

fn request() -> SendRequest {
    SendRequest::new("13800138000", "SMS_001")
        .with_sign_name("测试签名")
        .with_param("code", "123456")
}

fn failover_config() -> DispatchConfig {
    DispatchConfig {
        default_provider: "Aliyun".to_string(),
        failover_enabled: true,
        provider_priority: vec!["Aliyun".to_string(), "Tencent".to_string()],
        default_sign_name: None,
        debug_logging_enabled: false,
    }
}

fn dispatcher(providers: &[Arc<MockProvider>], config: DispatchConfig) -> SmsDispatcher {
    let providers = providers
        .iter()
        .map(|p| p.clone() as Arc<dyn SmsProvider>)
        .collect();
    SmsDispatcher::new(providers, config).unwrap()
}

#[tokio::test]
async fn test_send_uses_configured_default() {
    let aliyun = Arc::new(MockProvider::succeeding("Aliyun"));
    let tencent = Arc::new(MockProvider::succeeding("Tencent"));
    let service = dispatcher(&[aliyun.clone(), tencent.clone()], failover_config());

    let result = service.send(&request(), &CancellationToken::new()).await.unwrap();

    assert!(result.success);
    assert_eq!(result.provider_name, "Aliyun");
    assert!(!result.request_id.is_empty());
    assert_eq!(aliyun.calls(), 1);
    assert_eq!(tencent.calls(), 0);
}

#[tokio::test]
async fn test_failover_tries_next_provider_in_priority_order() {
    let log = call_log();
    let aliyun = Arc::new(MockProvider::failing("Aliyun").with_call_log(log.clone()));
    let tencent = Arc::new(MockProvider::succeeding("Tencent").with_call_log(log.clone()));
    let service = dispatcher(&[aliyun.clone(), tencent.clone()], failover_config());

    let result = service.send(&request(), &CancellationToken::new()).await.unwrap();

    assert!(result.success);
    assert_eq!(result.provider_name, "Tencent");
    assert_eq!(*log.lock().unwrap(), vec!["Aliyun", "Tencent"]);
}

#[tokio::test]
async fn test_failover_disabled_invokes_only_default() {
    let aliyun = Arc::new(MockProvider::failing("Aliyun"));
    let tencent = Arc::new(MockProvider::succeeding("Tencent"));
    let config = failover_config().with_failover(false);
    let service = dispatcher(&[aliyun.clone(), tencent.clone()], config);

    let result = service.send(&request(), &CancellationToken::new()).await.unwrap();

    assert!(!result.success);
    assert_eq!(result.provider_name, "Aliyun");
    assert_eq!(aliyun.calls(), 1);
    assert_eq!(tencent.calls(), 0);
}

#[tokio::test]
async fn test_all_providers_fail_returns_last_result() {
    let aliyun = Arc::new(MockProvider::new(
        "Aliyun",
        Behavior::Fail(UnifiedErrorKind::InsufficientBalance),
    ));
    let tencent = Arc::new(MockProvider::new(
        "Tencent",
        Behavior::Fail(UnifiedErrorKind::TemplateNotFound),
    ));
    let service = dispatcher(&[aliyun.clone(), tencent.clone()], failover_config());

    let result = service.send(&request(), &CancellationToken::new()).await.unwrap();

    assert!(!result.success);
    assert_eq!(result.provider_name, "Tencent");
    assert_eq!(result.error_kind, UnifiedErrorKind::TemplateNotFound);
    assert_eq!(aliyun.calls(), 1);
    assert_eq!(tencent.calls(), 1);
}

#[tokio::test]
async fn test_default_listed_in_priority_is_not_retried() {
    let log = call_log();
    let aliyun = Arc::new(MockProvider::failing("Aliyun").with_call_log(log.clone()));
    let tencent = Arc::new(MockProvider::failing("Tencent").with_call_log(log.clone()));
    let config = DispatchConfig {
        default_provider: "aliyun".to_string(),
        provider_priority: vec![
            "Tencent".to_string(),
            "ALIYUN".to_string(),
            "tencent".to_string(),
        ],
        ..failover_config()
    };
    let service = dispatcher(&[aliyun.clone(), tencent.clone()], config);

    service.send(&request(), &CancellationToken::new()).await.unwrap();

    assert_eq!(*log.lock().unwrap(), vec!["Aliyun", "Tencent"]);
}

#[tokio::test]
async fn test_default_missing_from_priority_is_still_tried_first() {
    let log = call_log();
    let aliyun = Arc::new(MockProvider::failing("Aliyun").with_call_log(log.clone()));
    let tencent = Arc::new(MockProvider::succeeding("Tencent").with_call_log(log.clone()));
    let config = DispatchConfig {
        default_provider: "Aliyun".to_string(),
        provider_priority: vec!["Tencent".to_string()],
        ..failover_config()
    };
    let service = dispatcher(&[aliyun.clone(), tencent.clone()], config);

    let result = service.send(&request(), &CancellationToken::new()).await.unwrap();

    assert!(result.success);
    assert_eq!(*log.lock().unwrap(), vec!["Aliyun", "Tencent"]);
}

#[tokio::test]
async fn test_unregistered_priority_entries_are_skipped() {
    let aliyun = Arc::new(MockProvider::failing("Aliyun"));
    let config = DispatchConfig {
        provider_priority: vec!["Twilio".to_string(), "Tencent".to_string()],
        ..failover_config()
    };
    let service = dispatcher(&[aliyun.clone()], config);

    let result = service.send(&request(), &CancellationToken::new()).await.unwrap();

    // Nothing else registered, so the default's failure is returned as is
    assert!(!result.success);
    assert_eq!(result.provider_name, "Aliyun");
    assert_eq!(result.error_kind, UnifiedErrorKind::ProviderInternalError);
    assert_eq!(aliyun.calls(), 1);
}

#[tokio::test]
async fn test_unregistered_default_fails_over() {
    let tencent = Arc::new(MockProvider::succeeding("Tencent"));
    let service = dispatcher(&[tencent.clone()], failover_config());

    let result = service.send(&request(), &CancellationToken::new()).await.unwrap();

    assert!(result.success);
    assert_eq!(result.provider_name, "Tencent");
    assert_eq!(tencent.calls(), 1);
}

#[tokio::test]
async fn test_cancellation_stops_failover() {
    let aliyun = Arc::new(MockProvider::failing("Aliyun").cancelling());
    let tencent = Arc::new(MockProvider::succeeding("Tencent"));
    let service = dispatcher(&[aliyun.clone(), tencent.clone()], failover_config());
    let cancel = CancellationToken::new();

    let result = service.send(&request(), &cancel).await.unwrap();

    assert!(!result.success);
    assert!(cancel.is_cancelled());
    assert_eq!(aliyun.calls(), 1);
    assert_eq!(tencent.calls(), 0);
}

#[tokio::test]
async fn test_send_via_unknown_provider() {
    let aliyun = Arc::new(MockProvider::succeeding("Aliyun"));
    let tencent = Arc::new(MockProvider::succeeding("Tencent"));
    let service = dispatcher(&[aliyun.clone(), tencent.clone()], failover_config());

    let result = service
        .send_via(&request(), "NotExist", &CancellationToken::new())
        .await
        .unwrap();

    assert!(!result.success);
    assert_eq!(result.error_kind, UnifiedErrorKind::ProviderNotFound);
    assert_eq!(result.raw_error_code, "PROVIDER_NOT_FOUND");
    assert_eq!(result.provider_name, "NotExist");
    assert!(!result.retryable);
    assert_eq!(aliyun.calls(), 0);
    assert_eq!(tencent.calls(), 0);
}

#[tokio::test]
async fn test_send_via_blank_provider_name() {
    let aliyun = Arc::new(MockProvider::succeeding("Aliyun"));
    let service = dispatcher(&[aliyun.clone()], failover_config());

    let result = service
        .send_via(&request(), "   ", &CancellationToken::new())
        .await
        .unwrap();

    assert!(!result.success);
    assert_eq!(result.error_kind, UnifiedErrorKind::InvalidProviderName);
    assert_eq!(result.raw_error_code, "INVALID_PROVIDER_NAME");
    assert_eq!(aliyun.calls(), 0);
}

#[tokio::test]
async fn test_send_via_is_case_insensitive_and_does_not_fail_over() {
    let aliyun = Arc::new(MockProvider::succeeding("Aliyun"));
    let tencent = Arc::new(MockProvider::failing("Tencent"));
    let service = dispatcher(&[aliyun.clone(), tencent.clone()], failover_config());

    let result = service
        .send_via(&request(), "TENCENT", &CancellationToken::new())
        .await
        .unwrap();

    assert!(!result.success);
    assert_eq!(result.provider_name, "Tencent");
    assert_eq!(tencent.calls(), 1);
    assert_eq!(aliyun.calls(), 0);
}

#[tokio::test]
async fn test_provider_name_is_overwritten_with_canonical_name() {
    let aliyun = Arc::new(MockProvider::succeeding("Aliyun").reporting_as("something-else"));
    let service = dispatcher(&[aliyun.clone()], failover_config());

    let result = service
        .send_via(&request(), "aliyun", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.provider_name, "Aliyun");
}

#[tokio::test]
async fn test_provider_error_is_folded_into_result() {
    let aliyun = Arc::new(MockProvider::new("Aliyun", Behavior::Error));
    let service = dispatcher(&[aliyun.clone()], failover_config().with_failover(false));

    let result = service.send(&request(), &CancellationToken::new()).await.unwrap();

    assert!(!result.success);
    assert_eq!(result.raw_error_code, "EXCEPTION");
    assert_eq!(result.error_kind, UnifiedErrorKind::NetworkError);
    assert!(result.retryable);
    assert!(result.raw_error_message.contains("connection reset"));
    assert_eq!(result.provider_name, "Aliyun");
}

#[tokio::test]
async fn test_send_with_selector() {
    let aliyun = Arc::new(MockProvider::succeeding("Aliyun"));
    let tencent = Arc::new(MockProvider::succeeding("Tencent"));
    let service = dispatcher(&[aliyun.clone(), tencent.clone()], failover_config());
    let cancel = CancellationToken::new();

    let result = service
        .send_with(&request(), ProviderSelector::Tencent, &cancel)
        .await
        .unwrap();
    assert_eq!(result.provider_name, "Tencent");

    let result = service
        .send_with(&request(), ProviderSelector::Auto, &cancel)
        .await
        .unwrap();
    assert_eq!(result.provider_name, "Aliyun");

    assert_eq!(aliyun.calls(), 1);
    assert_eq!(tencent.calls(), 1);
}

#[tokio::test]
async fn test_invalid_request_rejected_before_any_provider() {
    let aliyun = Arc::new(MockProvider::succeeding("Aliyun"));
    let service = dispatcher(&[aliyun.clone()], failover_config());
    let cancel = CancellationToken::new();
    let invalid = SendRequest::new("", "SMS_001");

    assert!(matches!(
        service.send(&invalid, &cancel).await,
        Err(SmsError::InvalidArgument { .. })
    ));
    assert!(matches!(
        service.send_via(&invalid, "Aliyun", &cancel).await,
        Err(SmsError::InvalidArgument { .. })
    ));
    assert!(matches!(
        service.send_with(&invalid, ProviderSelector::Aliyun, &cancel).await,
        Err(SmsError::InvalidArgument { .. })
    ));
    assert_eq!(aliyun.calls(), 0);
}

#[test]
fn test_available_providers_in_registration_order() {
    let tencent = Arc::new(MockProvider::succeeding("Tencent"));
    let aliyun = Arc::new(MockProvider::succeeding("Aliyun"));
    let service = dispatcher(&[tencent, aliyun], failover_config());

    assert_eq!(service.available_providers(), vec!["Tencent", "Aliyun"]);
}

#[test]
fn test_is_available() {
    let aliyun = Arc::new(MockProvider::succeeding("Aliyun"));
    let service = dispatcher(&[aliyun], failover_config());

    assert!(service.is_available("Aliyun"));
    assert!(service.is_available("aliyun"));
    assert!(service.is_available("ALIYUN"));
    assert!(!service.is_available("Tencent"));
    assert!(!service.is_available("NotExist"));
    assert!(!service.is_available(""));

    assert!(service.is_selector_available(ProviderSelector::Aliyun));
    assert!(service.is_selector_available(ProviderSelector::Auto));
    assert!(!service.is_selector_available(ProviderSelector::Tencent));
}

#[test]
fn test_auto_selector_follows_default_provider() {
    let tencent = Arc::new(MockProvider::succeeding("Tencent"));
    let service = dispatcher(&[tencent], DispatchConfig::single("Tencent"));
    assert!(service.is_selector_available(ProviderSelector::Auto));

    let empty_default = DispatchConfig::single("");
    let tencent = Arc::new(MockProvider::succeeding("Tencent"));
    let service = dispatcher(&[tencent], empty_default);
    assert!(!service.is_selector_available(ProviderSelector::Auto));
}

#[test]
fn test_duplicate_provider_names_rejected() {
    let providers: Vec<Arc<dyn SmsProvider>> = vec![
        Arc::new(MockProvider::succeeding("Aliyun")),
        Arc::new(MockProvider::succeeding("ALIYUN")),
    ];

    match SmsDispatcher::new(providers, failover_config()) {
        Err(SmsError::DuplicateProvider { name }) => assert_eq!(name, "ALIYUN"),
        Err(other) => panic!("Expected duplicate provider error, got {}", other),
        Ok(_) => panic!("Expected duplicate provider error"),
    }
}

#[test]
fn test_blank_provider_name_rejected() {
    let providers: Vec<Arc<dyn SmsProvider>> = vec![Arc::new(MockProvider::succeeding(" "))];
    assert!(matches!(
        SmsDispatcher::new(providers, failover_config()),
        Err(SmsError::InvalidArgument { .. })
    ));
}

#[tokio::test]
async fn test_concurrent_sends_share_one_dispatcher() {
    let aliyun = Arc::new(MockProvider::succeeding("Aliyun"));
    let service = Arc::new(dispatcher(&[aliyun.clone()], failover_config()));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .send(&request(), &CancellationToken::new())
                    .await
                    .unwrap()
                    .success
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap());
    }
    assert_eq!(aliyun.calls(), 8);
}
