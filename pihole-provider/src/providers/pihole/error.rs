//! Pi-hole error mapping

use crate::PROVIDER_NAME;
use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::PiholeClient;

/// Pi-hole error key mapping
/// Reference: the `error.key` values of the Pi-hole v6 API
impl ProviderErrorMapper for PiholeClient {
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        let record = || context.record.clone().unwrap_or_else(|| "<unknown>".to_string());

        match raw.code.as_deref() {
            Some("unauthorized") => ProviderError::InvalidCredentials {
                provider: PROVIDER_NAME.to_string(),
                raw_message: Some(raw.message),
            },

            Some("forbidden") => ProviderError::PermissionDenied {
                provider: PROVIDER_NAME.to_string(),
                raw_message: Some(raw.message),
            },

            Some("not_found") => ProviderError::RecordNotFound {
                provider: PROVIDER_NAME.to_string(),
                record: record(),
                raw_message: Some(raw.message),
            },

            // "Item already present"
            Some("bad_request") if raw.message.to_lowercase().contains("already present") => {
                ProviderError::RecordExists {
                    provider: PROVIDER_NAME.to_string(),
                    record: record(),
                    raw_message: Some(raw.message),
                }
            }

            Some("bad_request") => ProviderError::InvalidParameter {
                provider: PROVIDER_NAME.to_string(),
                param: context
                    .record
                    .clone()
                    .unwrap_or_else(|| "request".to_string()),
                detail: raw.message,
            },

            // Every API seat is held by another session
            Some("api_seats_exceeded") => ProviderError::QuotaExceeded {
                provider: PROVIDER_NAME.to_string(),
                raw_message: Some(raw.message),
            },

            _ => self.unknown_error(raw),
        }
    }
}
