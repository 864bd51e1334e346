//! Provider 公共工具函数

use reqwest::Client;

use crate::PROVIDER_NAME;
use crate::config::PiholeConfig;
use crate::error::{ProviderError, Result};

// ============ HTTP Client ============

/// 创建带超时配置的 HTTP Client
///
/// The cookie store keeps the `sid` cookie Pi-hole sets on login, alongside the
/// explicit `sid` header the client sends.
pub fn create_http_client(config: &PiholeConfig) -> Result<Client> {
    let builder = Client::builder()
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
        .cookie_store(true);

    #[cfg(any(feature = "native-tls", feature = "rustls"))]
    let builder = builder.danger_accept_invalid_certs(config.tls_insecure_skip_verify);

    builder.build().map_err(|e| ProviderError::NetworkError {
        provider: PROVIDER_NAME.to_string(),
        detail: format!("Failed to create HTTP client: {e}"),
    })
}

// ============ 域名名称处理 ============

/// 去掉域名末尾的点
pub fn normalize_domain_name(name: &str) -> &str {
    name.trim_end_matches('.')
}
