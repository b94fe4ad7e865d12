//! Value objects

pub mod provider_selector;

pub use provider_selector::{ProviderSelector, ALIYUN_PROVIDER_NAME, TENCENT_PROVIDER_NAME};
