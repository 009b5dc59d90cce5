//! Environment configuration.

use std::env;
use std::time::Duration;

use crate::credential::Credentials;
use crate::gateway::{DEFAULT_REST_URL, DEFAULT_SYNC_URL, DEFAULT_TIMEOUT, Endpoints};
use crate::image_search::DEFAULT_IMAGE_SEARCH_URL;
use crate::translate::DEFAULT_TRANSLATE_URL;
use crate::types::CallStyle;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Variables holding the affiliate credential set, in `Credentials` field order.
pub const CREDENTIAL_VARS: [&str; 5] = [
    "ALIEXPRESS_APP_KEY",
    "ALIEXPRESS_APP_SECRET",
    "ALIEXPRESS_ACCESS_TOKEN",
    "ALIEXPRESS_REFRESH_TOKEN",
    "ALIEXPRESS_TRACKING_ID",
];

/// Proxy configuration
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub port: u16,
    pub app_key: Option<String>,
    pub app_secret: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub tracking_id: Option<String>,
    pub endpoints: Endpoints,
    pub target_language: String,
    pub default_page_size: Option<u32>,
    pub category_call: CallStyle,
    pub timeout: Duration,
    pub image_search_api_key: Option<String>,
    pub image_search_url: String,
    /// Enable the machine-translation fallback
    pub translate_fallback: bool,
    pub translate_url: String,
    pub max_upload_bytes: usize,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            app_key: None,
            app_secret: None,
            access_token: None,
            refresh_token: None,
            tracking_id: None,
            endpoints: Endpoints::default(),
            target_language: "EN".to_string(),
            default_page_size: None,
            category_call: CallStyle::System,
            timeout: DEFAULT_TIMEOUT,
            image_search_api_key: None,
            image_search_url: DEFAULT_IMAGE_SEARCH_URL.to_string(),
            translate_fallback: false,
            translate_url: DEFAULT_TRANSLATE_URL.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ProxyConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        Self {
            port: parse_or(get("PORT"), "PORT", defaults.port),
            app_key: get(CREDENTIAL_VARS[0]),
            app_secret: get(CREDENTIAL_VARS[1]),
            access_token: get(CREDENTIAL_VARS[2]),
            refresh_token: get(CREDENTIAL_VARS[3]),
            tracking_id: get(CREDENTIAL_VARS[4]),
            endpoints: Endpoints {
                sync_url: get("ALIEXPRESS_SYNC_URL").unwrap_or(defaults.endpoints.sync_url),
                rest_url: get("ALIEXPRESS_REST_URL").unwrap_or(defaults.endpoints.rest_url),
            },
            target_language: get("TARGET_LANGUAGE").unwrap_or(defaults.target_language),
            default_page_size: get("PAGE_SIZE").and_then(|v| match v.parse() {
                Ok(size) => Some(size),
                Err(_) => {
                    tracing::warn!("Ignoring invalid PAGE_SIZE {:?}", v);
                    None
                }
            }),
            category_call: match get("CATEGORY_CALL_STYLE") {
                Some(v) => CallStyle::parse(&v).unwrap_or_else(|| {
                    tracing::warn!("Unknown CATEGORY_CALL_STYLE {:?}, using system", v);
                    CallStyle::System
                }),
                None => defaults.category_call,
            },
            timeout: Duration::from_secs(parse_or(
                get("UPSTREAM_TIMEOUT_SECS"),
                "UPSTREAM_TIMEOUT_SECS",
                defaults.timeout.as_secs(),
            )),
            image_search_api_key: get("IMAGE_SEARCH_API_KEY"),
            image_search_url: get("IMAGE_SEARCH_URL").unwrap_or(defaults.image_search_url),
            translate_fallback: get("TRANSLATE_FALLBACK")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
                .unwrap_or(false),
            translate_url: get("TRANSLATE_URL").unwrap_or(defaults.translate_url),
            max_upload_bytes: parse_or(
                get("MAX_UPLOAD_BYTES"),
                "MAX_UPLOAD_BYTES",
                defaults.max_upload_bytes,
            ),
        }
    }

    /// Names of the credential variables that are not set.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        [
            &self.app_key,
            &self.app_secret,
            &self.access_token,
            &self.refresh_token,
            &self.tracking_id,
        ]
        .into_iter()
        .zip(CREDENTIAL_VARS)
        .filter(|(value, _)| value.is_none())
        .map(|(_, name)| name)
        .collect()
    }

    /// The full credential set, or the names of the missing variables.
    pub fn credentials(&self) -> Result<Credentials, Vec<&'static str>> {
        match (
            &self.app_key,
            &self.app_secret,
            &self.access_token,
            &self.refresh_token,
            &self.tracking_id,
        ) {
            (Some(app_key), Some(app_secret), Some(access_token), Some(refresh_token), Some(tracking_id)) => {
                Ok(Credentials {
                    app_key: app_key.clone(),
                    app_secret: app_secret.clone(),
                    access_token: access_token.clone(),
                    refresh_token: refresh_token.clone(),
                    tracking_id: tracking_id.clone(),
                })
            }
            _ => Err(self.missing_credentials()),
        }
    }
}

fn parse_or<T: std::str::FromStr + Copy>(value: Option<String>, name: &str, default: T) -> T {
    match value {
        Some(v) => v.parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid {} {:?}", name, v);
            default
        }),
        None => default,
    }
}
