//! Query translation: the offline dictionary first, then an optional
//! machine-translation fallback for queries the dictionary only partly covers.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use url::Url;
use wreq::Client;

use crate::normalizer::KeywordNormalizer;

pub const DEFAULT_TRANSLATE_URL: &str = "https://translate.googleapis.com/translate_a/single";

/// A translation back-end.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` to English.
    async fn translate(&self, text: &str) -> Result<String>;
}

/// Google's public `translate_a/single` endpoint (`client=gtx`).
pub struct GoogleTranslator {
    http: Client,
    endpoint: String,
    timeout: Duration,
}

impl GoogleTranslator {
    pub fn new(http: Client, endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            timeout,
        }
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str) -> Result<String> {
        let url = Url::parse_with_params(
            &self.endpoint,
            &[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", "en"),
                ("dt", "t"),
                ("q", text),
            ],
        )
        .context("Invalid translation endpoint")?;

        let response = tokio::time::timeout(self.timeout, self.http.get(url.as_str()).send())
            .await
            .context("Translation request timed out")?
            .context("Translation request failed")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read translation body")?;
        if !status.is_success() {
            anyhow::bail!("Translation endpoint returned {}", status);
        }

        let json: Value = serde_json::from_str(&body).context("Translation reply is not JSON")?;
        parse_gtx_reply(&json).ok_or_else(|| anyhow::anyhow!("Unexpected translation reply"))
    }
}

/// Join the translated segments of a `[[["text", "source", ...], ...], ...]` reply.
fn parse_gtx_reply(json: &Value) -> Option<String> {
    let segments = json.get(0)?.as_array()?;
    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0)?.as_str())
        .collect();
    let text = text.trim().to_string();
    (!text.is_empty()).then_some(text)
}

/// Dictionary normalization with an optional fallback translator.
#[derive(Clone)]
pub struct QueryTranslator {
    normalizer: Arc<KeywordNormalizer>,
    fallback: Option<Arc<dyn Translator>>,
}

impl QueryTranslator {
    pub fn new(normalizer: KeywordNormalizer) -> Self {
        Self {
            normalizer: Arc::new(normalizer),
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, translator: Arc<dyn Translator>) -> Self {
        self.fallback = Some(translator);
        self
    }

    pub fn normalizer(&self) -> &KeywordNormalizer {
        &self.normalizer
    }

    /// Translate a search query.
    ///
    /// The fallback only runs when the dictionary left Hebrew tokens behind. Its
    /// failures are logged and the dictionary result is used instead.
    pub async fn translate(&self, input: &str) -> String {
        let normalized = self.normalizer.normalize_detailed(input);
        if !normalized.is_partial() {
            return normalized.query;
        }

        let Some(fallback) = &self.fallback else {
            return normalized.query;
        };

        match fallback.translate(input).await {
            Ok(translated) if !translated.trim().is_empty() => {
                tracing::info!("Fallback translated {:?} to {:?}", input, translated);
                translated
            }
            Ok(_) => normalized.query,
            Err(e) => {
                tracing::warn!("Fallback translation failed for {:?}: {:#}", input, e);
                normalized.query
            }
        }
    }
}

impl Default for QueryTranslator {
    fn default() -> Self {
        Self::new(KeywordNormalizer::default())
    }
}
