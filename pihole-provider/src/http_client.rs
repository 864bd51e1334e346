//! Generic HTTP client tools
//!
//! Sending a request, logging it, classifying transport-level failures and
//! reading the body. Pi-hole specific handling (session header, re-authentication,
//! error bodies) lives in the client module on top of this.
//!
//! Transport failures are not retried here: external-dns runs the provider again on
//! its next reconciliation loop.

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::PROVIDER_NAME;
use crate::error::ProviderError;
use crate::utils::log_sanitizer::truncate_for_log;

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// Performs an HTTP request and returns the status and response text
    ///
    /// # Returns
    /// * `Ok((status, response_text))` for every status except the ones below
    /// * `Err(ProviderError::Timeout)` - the request timed out
    /// * `Err(ProviderError::NetworkError)` - connection failure, or HTTP 502/503/504
    /// * `Err(ProviderError::RateLimited)` - HTTP 429
    pub async fn execute_request(
        request_builder: RequestBuilder,
        method_name: &str,
        url: &str,
    ) -> Result<(StatusCode, String), ProviderError> {
        log::debug!("[{PROVIDER_NAME}] {method_name} {url}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout {
                    provider: PROVIDER_NAME.to_string(),
                    detail: e.to_string(),
                }
            } else {
                ProviderError::NetworkError {
                    provider: PROVIDER_NAME.to_string(),
                    detail: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        log::debug!("[{PROVIDER_NAME}] Response Status: {status}");

        // Extract Retry-After header (before consuming response body)
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        if status == StatusCode::TOO_MANY_REQUESTS {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{PROVIDER_NAME}] Rate limited (HTTP 429), retry_after={retry_after:?}");
            return Err(ProviderError::RateLimited {
                provider: PROVIDER_NAME.to_string(),
                retry_after,
                raw_message: Some(body),
            });
        }

        if matches!(status.as_u16(), 502..=504) {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{PROVIDER_NAME}] Server error (HTTP {status})");
            return Err(ProviderError::NetworkError {
                provider: PROVIDER_NAME.to_string(),
                detail: format!("HTTP {}: {}", status.as_u16(), truncate_for_log(&body)),
            });
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| ProviderError::NetworkError {
                provider: PROVIDER_NAME.to_string(),
                detail: format!("Failed to read response body: {e}"),
            })?;

        log::debug!(
            "[{PROVIDER_NAME}] Response Body: {}",
            truncate_for_log(&response_text)
        );

        Ok((status, response_text))
    }

    /// Parse JSON response
    ///
    /// # Returns
    /// * `Ok(T)` - successfully parsed
    /// * `Err(ProviderError::ParseError)` - parsing failed
    pub fn parse_json<T>(response_text: &str) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("[{PROVIDER_NAME}] JSON parse failed: {e}");
            log::error!(
                "[{PROVIDER_NAME}] Raw response: {}",
                truncate_for_log(response_text)
            );
            ProviderError::ParseError {
                provider: PROVIDER_NAME.to_string(),
                detail: e.to_string(),
            }
        })
    }

    /// Serialize a request body
    pub fn to_json<B>(body: &B) -> Result<String, ProviderError>
    where
        B: serde::Serialize,
    {
        serde_json::to_string(body).map_err(|e| ProviderError::SerializationError {
            provider: PROVIDER_NAME.to_string(),
            detail: e.to_string(),
        })
    }
}
