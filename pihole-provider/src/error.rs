use serde::{Deserialize, Serialize};

/// Unified error type for all Pi-hole provider operations.
///
/// Each variant includes a `provider` field identifying the backend that produced
/// the error, plus variant-specific context. All variants are serializable so a
/// webhook layer can report them as structured JSON.
///
/// # Recovery
///
/// The only automatic recovery is a single re-authentication when Pi-hole answers
/// `401` on an authenticated request. Every other failure is returned as-is and the
/// caller (external-dns) retries on its next reconciliation loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    NetworkError {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The configured password was rejected, or the session could not be renewed.
    InvalidCredentials {
        /// Provider that produced the error.
        provider: String,
        /// Original error message from the Pi-hole API, if available.
        raw_message: Option<String>,
    },

    /// The authenticated session lacks permission for the requested operation.
    PermissionDenied {
        /// Provider that produced the error.
        provider: String,
        /// Original error message from the Pi-hole API, if available.
        raw_message: Option<String>,
    },

    /// The local DNS entry already exists.
    RecordExists {
        /// Provider that produced the error.
        provider: String,
        /// The conflicting entry (e.g. `1.2.3.4 host.example.com`).
        record: String,
        /// Original error message from the Pi-hole API, if available.
        raw_message: Option<String>,
    },

    /// The local DNS entry does not exist.
    RecordNotFound {
        /// Provider that produced the error.
        provider: String,
        /// The missing entry.
        record: String,
        /// Original error message from the Pi-hole API, if available.
        raw_message: Option<String>,
    },

    /// A request parameter or configuration value is invalid.
    InvalidParameter {
        /// Provider that produced the error.
        provider: String,
        /// Name of the invalid parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// The record type cannot be stored as a Pi-hole local DNS entry.
    UnsupportedRecordType {
        /// Provider that produced the error.
        provider: String,
        /// The unsupported record type string.
        record_type: String,
    },

    /// Pi-hole refused a new session because all API seats are taken.
    QuotaExceeded {
        /// Provider that produced the error.
        provider: String,
        /// Original error message from the Pi-hole API, if available.
        raw_message: Option<String>,
    },

    /// Pi-hole answered HTTP 429.
    RateLimited {
        /// Provider that produced the error.
        provider: String,
        /// Suggested wait time in seconds, if sent in `Retry-After`.
        retry_after: Option<u64>,
        /// Original response body, if available.
        raw_message: Option<String>,
    },

    /// The HTTP request timed out.
    Timeout {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// Failed to parse the Pi-hole API response.
    ParseError {
        /// Provider that produced the error.
        provider: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize a request body.
    SerializationError {
        /// Provider that produced the error.
        provider: String,
        /// Details about the serialization failure.
        detail: String,
    },

    /// An unrecognized error from the Pi-hole API (including unexpected status codes).
    Unknown {
        /// Provider that produced the error.
        provider: String,
        /// Raw error key or HTTP status, if available.
        raw_code: Option<String>,
        /// Raw error message.
        raw_message: String,
    },
}

impl ProviderError {
    /// 是否为预期行为（用户输入、资源不存在等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. }
                | Self::PermissionDenied { .. }
                | Self::RecordExists { .. }
                | Self::RecordNotFound { .. }
                | Self::InvalidParameter { .. }
                | Self::UnsupportedRecordType { .. }
                | Self::QuotaExceeded { .. }
        )
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { provider, detail } => {
                write!(f, "[{provider}] Network error: {detail}")
            }
            Self::InvalidCredentials {
                provider,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{provider}] Invalid credentials: {msg}")
                } else {
                    write!(f, "[{provider}] Invalid credentials")
                }
            }
            Self::PermissionDenied {
                provider,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{provider}] Permission denied: {msg}")
                } else {
                    write!(f, "[{provider}] Permission denied")
                }
            }
            Self::RecordExists {
                provider, record, ..
            } => {
                write!(f, "[{provider}] Record '{record}' already exists")
            }
            Self::RecordNotFound {
                provider, record, ..
            } => {
                write!(f, "[{provider}] Record '{record}' not found")
            }
            Self::InvalidParameter {
                provider,
                param,
                detail,
            } => {
                write!(f, "[{provider}] Invalid parameter '{param}': {detail}")
            }
            Self::UnsupportedRecordType {
                provider,
                record_type,
            } => {
                write!(f, "[{provider}] Unsupported record type: {record_type}")
            }
            Self::QuotaExceeded {
                provider,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{provider}] API seats exceeded: {msg}")
                } else {
                    write!(f, "[{provider}] API seats exceeded")
                }
            }
            Self::RateLimited {
                provider,
                retry_after,
                ..
            } => {
                if let Some(secs) = retry_after {
                    write!(f, "[{provider}] Rate limited (retry after {secs}s)")
                } else {
                    write!(f, "[{provider}] Rate limited")
                }
            }
            Self::Timeout { provider, detail } => {
                write!(f, "[{provider}] Request timeout: {detail}")
            }
            Self::ParseError { provider, detail } => {
                write!(f, "[{provider}] Parse error: {detail}")
            }
            Self::SerializationError { provider, detail } => {
                write!(f, "[{provider}] Serialization error: {detail}")
            }
            Self::Unknown {
                provider,
                raw_message,
                ..
            } => {
                write!(f, "[{provider}] {raw_message}")
            }
        }
    }
}

impl std::error::Error for ProviderError {}

/// Convenience type alias for `Result<T, ProviderError>`.
pub type Result<T> = std::result::Result<T, ProviderError>;
