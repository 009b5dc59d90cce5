//! Access token refresh and the single-retry call wrapper.
//!
//! A call whose reply carries a token error code triggers one refresh. If the refresh
//! succeeds the call is repeated once with the new token. If the refresh fails, or the
//! repeated call is still rejected, the caller gets `ProxyError::TokenRefresh`.
//!
//! `TokenRefresh` reasons are fixed strings. Upstream text never reaches them because
//! refresh requests carry the refresh token in their URL.

use serde_json::Value;

use crate::credential::mask;
use crate::error::{ProxyError, Result};
use crate::gateway::ApiGateway;
use crate::types::{CallStyle, ErrorResponse, Params, TOKEN_ERROR_CODES, TokenResponse, paths};

/// True if `body` reports an invalid or expired access token.
///
/// Both the numeric and the named code are checked, whether they appear under
/// `error_response` or at the top level.
pub fn is_token_error(body: &Value) -> bool {
    let nested = body
        .get("error_response")
        .and_then(|e| serde_json::from_value::<ErrorResponse>(e.clone()).ok())
        .and_then(|e| e.code_str());
    let top_level = match body.get("code") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    [nested, top_level]
        .into_iter()
        .flatten()
        .any(|code| TOKEN_ERROR_CODES.contains(&code.as_str()))
}

/// Exchange the stored refresh token for a new access token.
///
/// On success the store is updated before returning. On any failure the stored
/// tokens are left as they were.
pub async fn refresh_access_token(gateway: &ApiGateway) -> Result<()> {
    tracing::info!("Access token is invalid or expired, attempting to refresh");

    let refresh_token = gateway.store().refresh_token().await;
    let mut params = Params::new();
    params.insert("refresh_token".to_string(), refresh_token);

    let body = gateway
        .call_system(paths::TOKEN_REFRESH, params)
        .await
        .map_err(|e| {
            tracing::error!("Token refresh request failed: {}", e);
            ProxyError::TokenRefresh("refresh request failed".to_string())
        })?;

    let reply: TokenResponse = serde_json::from_value(body.clone()).map_err(|e| {
        tracing::error!("Unexpected token refresh reply: {}", e);
        ProxyError::TokenRefresh("unexpected refresh reply".to_string())
    })?;

    match reply.access_token.filter(|t| !t.is_empty()) {
        Some(access_token) => {
            tracing::info!("Token refreshed ({})", mask(&access_token));
            let refresh_token = reply.refresh_token.filter(|t| !t.is_empty());
            gateway.store().update(access_token, refresh_token).await;
            Ok(())
        }
        None => {
            tracing::error!(
                "Token refresh reply has no access_token (code={:?}, message={:?})",
                reply.code,
                reply.message
            );
            Err(ProxyError::TokenRefresh(
                "refresh token rejected by upstream".to_string(),
            ))
        }
    }
}

/// A remote operation that can be repeated after a token refresh.
#[derive(Debug, Clone)]
pub struct SignedCall {
    pub method: &'static str,
    pub style: CallStyle,
    /// Path used for system-style calls
    pub path: &'static str,
    pub params: Params,
}

impl SignedCall {
    pub fn business(method: &'static str, params: Params) -> Self {
        Self {
            method,
            style: CallStyle::Business,
            path: "",
            params,
        }
    }

    pub fn system(method: &'static str, path: &'static str, params: Params) -> Self {
        Self {
            method,
            style: CallStyle::System,
            path,
            params,
        }
    }

    async fn execute(&self, gateway: &ApiGateway) -> Result<Value> {
        match self.style {
            CallStyle::Business => gateway.call(self.method, self.params.clone()).await,
            CallStyle::System => gateway.call_system(self.path, self.params.clone()).await,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    First,
    Retry,
}

/// Run `call`, refreshing the token and retrying exactly once on a token error.
///
/// A second token error is an error, even when the upstream sent it with HTTP 200.
pub async fn call_with_refresh(gateway: &ApiGateway, call: &SignedCall) -> Result<Value> {
    let mut attempt = Attempt::First;
    loop {
        let body = call.execute(gateway).await?;
        if !is_token_error(&body) {
            return Ok(body);
        }

        match attempt {
            Attempt::First => {
                refresh_access_token(gateway).await?;
                tracing::info!("Retrying {} with new token", call.method);
                attempt = Attempt::Retry;
            }
            Attempt::Retry => {
                tracing::warn!("{} still reports a token error after refresh", call.method);
                return Err(ProxyError::TokenRefresh(
                    "access token still rejected after refresh".to_string(),
                ));
            }
        }
    }
}
