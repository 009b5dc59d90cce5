//! Affiliate API credentials and the process-wide token store.

use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;

/// Credential set loaded at startup.
#[derive(Clone)]
pub struct Credentials {
    pub app_key: String,
    pub app_secret: String,
    pub access_token: String,
    pub refresh_token: String,
    pub tracking_id: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_key", &self.app_key)
            .field("app_secret", &"<redacted>")
            .field("access_token", &mask(&self.access_token))
            .field("refresh_token", &mask(&self.refresh_token))
            .field("tracking_id", &self.tracking_id)
            .finish()
    }
}

/// Show only the first few characters of a token.
pub(crate) fn mask(token: &str) -> String {
    let prefix: String = token.chars().take(6).collect();
    format!("{}…", prefix)
}

/// The access/refresh token pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Shared, mutable token state.
///
/// Clones share the same tokens. Readers take a snapshot; a successful refresh replaces
/// the access token (and the refresh token when a new one is issued). Concurrent
/// requests that see an expired token each refresh independently.
#[derive(Clone)]
pub struct CredentialStore {
    inner: Arc<RwLock<TokenPair>>,
}

impl CredentialStore {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(TokenPair {
                access_token: access_token.into(),
                refresh_token: refresh_token.into(),
            })),
        }
    }

    /// Current tokens.
    pub async fn tokens(&self) -> TokenPair {
        self.inner.read().await.clone()
    }

    pub async fn access_token(&self) -> String {
        self.inner.read().await.access_token.clone()
    }

    pub async fn refresh_token(&self) -> String {
        self.inner.read().await.refresh_token.clone()
    }

    /// Store the result of a successful refresh.
    pub async fn update(&self, access_token: String, refresh_token: Option<String>) {
        let mut tokens = self.inner.write().await;
        tracing::info!("Access token updated ({})", mask(&access_token));
        tokens.access_token = access_token;
        if let Some(refresh_token) = refresh_token {
            tokens.refresh_token = refresh_token;
        }
    }
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_update_replaces_access_token() {
        let store = CredentialStore::new("old-access", "old-refresh");
        store.update("new-access".to_string(), None).await;
        assert_eq!(
            store.tokens().await,
            TokenPair {
                access_token: "new-access".to_string(),
                refresh_token: "old-refresh".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_update_rotates_refresh_token() {
        let store = CredentialStore::new("a", "r");
        let shared = store.clone();
        shared
            .update("a2".to_string(), Some("r2".to_string()))
            .await;
        assert_eq!(store.access_token().await, "a2");
        assert_eq!(store.refresh_token().await, "r2");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = Credentials {
            app_key: "517514".to_string(),
            app_secret: "super-secret".to_string(),
            access_token: "5000050123456789".to_string(),
            refresh_token: "5000150123456789".to_string(),
            tracking_id: "tracker".to_string(),
        };
        let rendered = format!("{:?}", creds);
        assert!(!rendered.contains("super-secret"));
        assert!(!rendered.contains("5000050123456789"));
        assert!(rendered.contains("500005…"));
    }
}
