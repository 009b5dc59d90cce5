//! Signed calls to the affiliate API.
//!
//! All parameters travel in the query string of a bodiless POST:
//! - business calls go to the sync endpoint with a `method` parameter and are signed
//!   without a path
//! - system calls go to `{rest}{path}` and sign the path together with the parameters

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde_json::Value;
use tokio::time::timeout;
use url::Url;
use wreq::Client;

use crate::credential::CredentialStore;
use crate::error::{ProxyError, Result};
use crate::refresh::is_token_error;
use crate::signer::{self, SIGN_METHOD};
use crate::types::Params;

pub const DEFAULT_SYNC_URL: &str = "https://api-sg.aliexpress.com/sync";
pub const DEFAULT_REST_URL: &str = "https://api-sg.aliexpress.com/rest";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Remote base URLs
#[derive(Debug, Clone)]
pub struct Endpoints {
    /// Business namespace, e.g. `https://api-sg.aliexpress.com/sync`
    pub sync_url: String,
    /// System namespace base, e.g. `https://api-sg.aliexpress.com/rest`
    pub rest_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            sync_url: DEFAULT_SYNC_URL.to_string(),
            rest_url: DEFAULT_REST_URL.to_string(),
        }
    }
}

/// Current Unix time in milliseconds, as sent in `timestamp`.
pub fn timestamp_millis() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
        .to_string()
}

#[derive(Debug, Clone)]
pub struct ApiGateway {
    http: Client,
    endpoints: Endpoints,
    app_key: String,
    app_secret: String,
    store: CredentialStore,
    timeout: Duration,
}

impl ApiGateway {
    pub fn new(
        http: Client,
        endpoints: Endpoints,
        app_key: impl Into<String>,
        app_secret: impl Into<String>,
        store: CredentialStore,
        timeout: Duration,
    ) -> Self {
        Self {
            http,
            endpoints,
            app_key: app_key.into(),
            app_secret: app_secret.into(),
            store,
            timeout,
        }
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Business call carrying the current access token.
    pub async fn call(&self, method: &str, extra: Params) -> Result<Value> {
        self.call_business(method, extra, true).await
    }

    /// Business call, optionally without the access token.
    pub async fn call_business(&self, method: &str, extra: Params, with_token: bool) -> Result<Value> {
        let mut params = self.base_params();
        params.insert("method".to_string(), method.to_string());
        if with_token {
            params.insert("access_token".to_string(), self.store.access_token().await);
        }
        params.extend(extra);

        let sign = signer::sign(&params, &self.app_secret, None);
        params.insert("sign".to_string(), sign);

        tracing::debug!("Business call {}", method);
        self.send(&self.endpoints.sync_url, &params).await
    }

    /// System call: path-prefixed signature, no access token.
    pub async fn call_system(&self, path: &str, extra: Params) -> Result<Value> {
        let mut params = self.base_params();
        params.extend(extra);

        let sign = signer::sign(&params, &self.app_secret, Some(path));
        params.insert("sign".to_string(), sign);

        let endpoint = format!("{}{}", self.endpoints.rest_url.trim_end_matches('/'), path);
        tracing::debug!("System call {}", path);
        self.send(&endpoint, &params).await
    }

    fn base_params(&self) -> Params {
        let mut params = Params::new();
        params.insert("app_key".to_string(), self.app_key.clone());
        params.insert("sign_method".to_string(), SIGN_METHOD.to_string());
        params.insert("timestamp".to_string(), timestamp_millis());
        params
    }

    async fn send(&self, endpoint: &str, params: &Params) -> Result<Value> {
        let url = Url::parse_with_params(endpoint, params.iter())?;

        let response = timeout(self.timeout, self.http.post(url.as_str()).send())
            .await
            .map_err(|_| self.timed_out(endpoint))?
            .map_err(|e| ProxyError::from_transport(e, endpoint, self.timeout))?;

        let status = response.status();
        let body = timeout(self.timeout, response.text())
            .await
            .map_err(|_| self.timed_out(endpoint))?
            .map_err(|e| ProxyError::from_transport(e, endpoint, self.timeout))?;

        if !status.is_success() {
            // Some deployments report token expiry with an error status; let the
            // refresh flow see those bodies.
            if let Ok(value) = serde_json::from_str::<Value>(&body)
                && is_token_error(&value)
            {
                return Ok(value);
            }
            tracing::warn!("{} returned HTTP {}", endpoint, status);
            return Err(ProxyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    fn timed_out(&self, endpoint: &str) -> ProxyError {
        tracing::warn!("{} timed out after {:?}", endpoint, self.timeout);
        ProxyError::Timeout {
            endpoint: endpoint.to_string(),
            timeout: self.timeout,
        }
    }
}
