use async_trait::async_trait;

use crate::PROVIDER_NAME;
use crate::domain_filter::DomainFilter;
use crate::error::{ProviderError, Result};
use crate::types::{Changes, Endpoint, RecordType};

/// 原始 API 错误（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// Pi-hole error key (`unauthorized`, `bad_request`, ...) or HTTP status
    pub code: Option<String>,
    /// 原始错误消息
    pub message: String,
}

impl RawApiError {
    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// 错误上下文信息（内部使用）
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// Local DNS entry the request was about (e.g. `1.2.3.4 host.example.com`)
    pub record: Option<String>,
}

impl ErrorContext {
    pub fn for_record(record: impl Into<String>) -> Self {
        Self {
            record: Some(record.into()),
        }
    }
}

/// Maps raw Pi-hole API errors onto [`ProviderError`]（内部使用）
pub(crate) trait ProviderErrorMapper {
    /// 将原始 API 错误映射到统一错误类型
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// 快捷方法：未知错误（fallback）
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: PROVIDER_NAME.to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// Record-level operations against the Pi-hole API（内部使用）
///
/// The reconciliation adapter only talks to Pi-hole through this trait.
#[async_trait]
pub(crate) trait PiholeApi: Send + Sync {
    /// Lists the entries of one record type as endpoints with a single target each.
    async fn list_records(&self, record_type: RecordType) -> Result<Vec<Endpoint>>;

    /// Creates one entry per target of the endpoint.
    async fn create_record(&self, endpoint: &Endpoint) -> Result<()>;

    /// Deletes one entry per target of the endpoint.
    async fn delete_record(&self, endpoint: &Endpoint) -> Result<()>;
}

/// The external-dns provider contract.
#[async_trait]
pub trait Provider: Send + Sync {
    /// 提供商标识符
    fn id(&self) -> &'static str;

    /// Domain filter advertised to external-dns during negotiation.
    fn domain_filter(&self) -> &DomainFilter;

    /// Current records managed by this provider.
    async fn records(&self) -> Result<Vec<Endpoint>>;

    /// Applies a change-set computed by external-dns.
    async fn apply_changes(&self, changes: &Changes) -> Result<()>;

    /// Lets the provider rewrite desired endpoints before external-dns plans changes.
    ///
    /// The default passes them through unchanged.
    async fn adjust_endpoints(&self, endpoints: Vec<Endpoint>) -> Result<Vec<Endpoint>> {
        Ok(endpoints)
    }
}
