//! Pi-hole HTTP 请求方法：会话、重新认证与错误处理

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;

use crate::PROVIDER_NAME;
use crate::error::{ProviderError, Result};
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::utils::log_sanitizer::mask_secret;

use super::types::{ErrorResponse, LoginRequest, LoginResponse};
use super::{API_PREFIX, AUTH_PATH, PiholeClient, SID_HEADER};

impl PiholeClient {
    // ==================== 会话 ====================

    /// Logs in with the configured password and stores the new session.
    pub async fn authenticate(&self) -> Result<()> {
        if self.password.is_empty() {
            log::debug!("[{PROVIDER_NAME}] No password was supplied, requesting a session without one");
        }

        let payload = HttpUtils::to_json(&LoginRequest {
            password: &self.password,
        })?;
        // Goes through `send` directly: `request` re-authenticates on 401 and must not recurse here.
        let (status, text) = self.send(&Method::POST, AUTH_PATH, Some(&payload)).await?;
        self.handle_response_error(status, &text, ErrorContext::default())?;
        let login: LoginResponse = HttpUtils::parse_json(&text)?;

        if !login.session.valid {
            return Err(ProviderError::InvalidCredentials {
                provider: PROVIDER_NAME.to_string(),
                raw_message: login.session.message,
            });
        }

        log::debug!(
            "[{PROVIDER_NAME}] Authenticated, sid={}",
            login
                .session
                .sid
                .as_deref()
                .map_or_else(|| "<none>".to_string(), mask_secret)
        );
        *self.session.write().await = Some(login.session);
        Ok(())
    }

    /// Ends the current session on the server, freeing its API seat.
    pub async fn logout(&self) -> Result<()> {
        if self.current_sid().await.is_none() {
            *self.session.write().await = None;
            return Ok(());
        }

        let result = self
            .request(Method::DELETE, AUTH_PATH, None, ErrorContext::default())
            .await
            .map(|_| ());
        *self.session.write().await = None;
        result
    }

    async fn current_sid(&self) -> Option<String> {
        self.session
            .read()
            .await
            .as_ref()
            .and_then(|s| s.sid.clone())
    }

    // ==================== 请求分发 ====================

    /// Sends one request, attaching the session id when one is held.
    async fn send(
        &self,
        method: &Method,
        path: &str,
        payload: Option<&str>,
    ) -> Result<(StatusCode, String)> {
        let url = format!("{}{API_PREFIX}{path}", self.server);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json");
        if let Some(sid) = self.current_sid().await {
            request = request.header(SID_HEADER, sid);
        }
        if let Some(payload) = payload {
            request = request.body(payload.to_string());
        }

        HttpUtils::execute_request(request, method.as_str(), &url)
            .await
            .map_err(|e| self.refine_rate_limit(e))
    }

    /// Pi-hole answers `429` both for throttling and for exhausted API seats; the
    /// error body tells them apart.
    fn refine_rate_limit(&self, err: ProviderError) -> ProviderError {
        let ProviderError::RateLimited {
            raw_message: Some(body),
            ..
        } = &err
        else {
            return err;
        };
        match serde_json::from_str::<ErrorResponse>(body) {
            Ok(resp) if resp.error.key == "api_seats_exceeded" => self.map_error(
                RawApiError::with_code(resp.error.key.clone(), resp.error.full_message()),
                ErrorContext::default(),
            ),
            _ => err,
        }
    }

    /// Sends a request and returns the body of a successful response.
    ///
    /// A `401` on any path other than `/auth` triggers one re-authentication and one
    /// resend; a second `401` is reported as invalid credentials.
    pub(crate) async fn request(
        &self,
        method: Method,
        path: &str,
        payload: Option<String>,
        ctx: ErrorContext,
    ) -> Result<String> {
        let (mut status, mut text) = self.send(&method, path, payload.as_deref()).await?;

        if status == StatusCode::UNAUTHORIZED && path != AUTH_PATH {
            log::warn!("[{PROVIDER_NAME}] Session rejected on {method} {path}, re-authenticating");
            self.authenticate().await?;
            (status, text) = self.send(&method, path, payload.as_deref()).await?;
        }

        self.handle_response_error(status, &text, ctx)?;
        Ok(text)
    }

    /// 统一处理 Pi-hole 响应错误
    fn handle_response_error(&self, status: StatusCode, text: &str, ctx: ErrorContext) -> Result<()> {
        if matches!(
            status,
            StatusCode::OK | StatusCode::CREATED | StatusCode::NO_CONTENT
        ) {
            return Ok(());
        }

        // 尝试解析结构化错误
        if let Ok(body) = serde_json::from_str::<ErrorResponse>(text) {
            return Err(self.map_error(
                RawApiError::with_code(body.error.key.clone(), body.error.full_message()),
                ctx,
            ));
        }

        if status == StatusCode::UNAUTHORIZED {
            return Err(ProviderError::InvalidCredentials {
                provider: PROVIDER_NAME.to_string(),
                raw_message: None,
            });
        }

        // 回退到通用错误
        Err(self.unknown_error(RawApiError::with_code(
            status.as_u16().to_string(),
            format!("received non-200 status code from request: {status}"),
        )))
    }

    // ==================== 公开 API 方法 ====================

    /// 执行 GET 请求
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str, ctx: ErrorContext) -> Result<T> {
        let text = self.request(Method::GET, path, None, ctx).await?;
        HttpUtils::parse_json(&text)
    }

    /// 执行 PUT 请求（无请求体）
    pub(crate) async fn put(&self, path: &str, ctx: ErrorContext) -> Result<()> {
        self.request(Method::PUT, path, None, ctx).await.map(|_| ())
    }

    /// 执行 DELETE 请求
    pub(crate) async fn delete(&self, path: &str, ctx: ErrorContext) -> Result<()> {
        self.request(Method::DELETE, path, None, ctx).await.map(|_| ())
    }
}
