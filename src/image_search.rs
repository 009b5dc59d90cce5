//! Client for the external image-search API.
//!
//! The uploaded image is base64-encoded and posted as a form field together with the
//! API key. This path shares nothing with the affiliate credentials or the signer.

use std::time::Duration;

use base64::Engine;
use serde_json::Value;
use tokio::time::timeout;
use url::form_urlencoded;
use wreq::{Client, header};

use crate::error::{ProxyError, Result};

pub const DEFAULT_IMAGE_SEARCH_URL: &str = "https://api.imagesearch.example.com/v1/search";

#[derive(Debug, Clone)]
pub struct ImageSearchClient {
    http: Client,
    endpoint: String,
    api_key: String,
    timeout: Duration,
}

impl ImageSearchClient {
    pub fn new(
        http: Client,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            timeout,
        }
    }

    /// Form body sent for `image`.
    pub fn form_body(&self, image: &[u8]) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(image);
        form_urlencoded::Serializer::new(String::new())
            .append_pair("api_key", &self.api_key)
            .append_pair("image", &encoded)
            .finish()
    }

    /// Search by image and return the API's JSON unchanged.
    pub async fn search(&self, image: &[u8]) -> Result<Value> {
        tracing::info!("Image search with {} byte upload", image.len());

        let request = self
            .http
            .post(self.endpoint.as_str())
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(self.form_body(image))
            .send();

        let response = timeout(self.timeout, request)
            .await
            .map_err(|_| self.timed_out())?
            .map_err(|e| ProxyError::from_transport(e, &self.endpoint, self.timeout))?;

        let status = response.status();
        let body = timeout(self.timeout, response.text())
            .await
            .map_err(|_| self.timed_out())?
            .map_err(|e| ProxyError::from_transport(e, &self.endpoint, self.timeout))?;

        if !status.is_success() {
            tracing::warn!("Image search returned HTTP {}", status);
            return Err(ProxyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    fn timed_out(&self) -> ProxyError {
        ProxyError::Timeout {
            endpoint: self.endpoint.clone(),
            timeout: self.timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_body_encodes_image() {
        let client = ImageSearchClient::new(
            Client::builder().build().unwrap(),
            DEFAULT_IMAGE_SEARCH_URL,
            "key+1",
            Duration::from_secs(5),
        );
        // base64 of [0xfb, 0xff] is "+/8=", which must be percent-encoded in a form.
        let body = client.form_body(&[0xfb, 0xff]);
        assert_eq!(body, "api_key=key%2B1&image=%2B%2F8%3D");
    }
}
