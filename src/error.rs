//! Error types for outbound calls.

use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProxyError>;

#[derive(Debug, Error)]
pub enum ProxyError {
    /// The outbound call did not complete in time
    #[error("request to {endpoint} timed out after {timeout:?}")]
    Timeout { endpoint: String, timeout: Duration },

    /// Connection or protocol failure. Only the endpoint is kept: the full request
    /// URL carries tokens in its query string.
    #[error("request to {endpoint} failed: {reason}")]
    Transport {
        endpoint: String,
        reason: &'static str,
        connect: bool,
    },

    /// Non-2xx response
    #[error("upstream returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("upstream returned malformed JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Access token could not be renewed
    #[error("access token refresh failed: {0}")]
    TokenRefresh(String),
}

impl ProxyError {
    /// Timeouts and connection failures may succeed if tried again.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProxyError::Timeout { .. } => true,
            ProxyError::Transport { connect, .. } => *connect,
            ProxyError::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    pub(crate) fn from_transport(err: wreq::Error, endpoint: &str, timeout: Duration) -> Self {
        if err.is_timeout() {
            ProxyError::Timeout {
                endpoint: strip_query(endpoint),
                timeout,
            }
        } else {
            let connect = err.is_connect();
            let reason = if connect {
                "connection failed"
            } else {
                "request error"
            };
            ProxyError::Transport {
                endpoint: strip_query(endpoint),
                reason,
                connect,
            }
        }
    }
}

/// `endpoint` without query string or fragment.
pub(crate) fn strip_query(endpoint: &str) -> String {
    endpoint
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .to_string()
}
