//! HTTP surface of the proxy.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::{
        DefaultBodyLimit, Multipart, Query, State,
        multipart::{MultipartError, MultipartRejection},
        rejection::QueryRejection,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use wreq::Client;

use crate::client::{AffiliateClient, ClientOptions, filter_products, rewrite_category_names};
use crate::config::ProxyConfig;
use crate::credential::CredentialStore;
use crate::error::ProxyError;
use crate::gateway::ApiGateway;
use crate::image_search::ImageSearchClient;
use crate::normalizer::KeywordNormalizer;
use crate::terms::TermTable;
use crate::translate::{GoogleTranslator, QueryTranslator};
use crate::types::ProductQuery;

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    /// `None` when the credential set is incomplete
    client: Option<Arc<AffiliateClient>>,
    missing_credentials: Arc<Vec<&'static str>>,
    images: Option<Arc<ImageSearchClient>>,
    translator: QueryTranslator,
    category_names: Arc<TermTable>,
    max_upload_bytes: usize,
}

impl AppState {
    /// Wire up clients from configuration. Missing credentials are reported per request.
    pub fn from_config(config: &ProxyConfig) -> Result<Self> {
        let http = Client::builder()
            .gzip(true)
            .build()
            .context("Failed to build HTTP client")?;

        let missing_credentials = config.missing_credentials();
        let client = match config.credentials() {
            Ok(creds) => {
                let store = CredentialStore::new(creds.access_token, creds.refresh_token);
                let gateway = ApiGateway::new(
                    http.clone(),
                    config.endpoints.clone(),
                    creds.app_key,
                    creds.app_secret,
                    store,
                    config.timeout,
                );
                let options = ClientOptions {
                    tracking_id: creds.tracking_id,
                    target_language: config.target_language.clone(),
                    default_page_size: config.default_page_size,
                    category_call: config.category_call,
                };
                Some(Arc::new(AffiliateClient::new(gateway, options)))
            }
            Err(missing) => {
                tracing::warn!("Missing credentials: {}", missing.join(", "));
                None
            }
        };

        let images = match &config.image_search_api_key {
            Some(key) => Some(Arc::new(ImageSearchClient::new(
                http.clone(),
                config.image_search_url.clone(),
                key.clone(),
                config.timeout,
            ))),
            None => {
                tracing::warn!("IMAGE_SEARCH_API_KEY not set, image search disabled");
                None
            }
        };

        let mut translator = QueryTranslator::new(KeywordNormalizer::new(&TermTable::search_terms()));
        if config.translate_fallback {
            tracing::info!("Translation fallback enabled ({})", config.translate_url);
            translator = translator.with_fallback(Arc::new(GoogleTranslator::new(
                http,
                config.translate_url.clone(),
                config.timeout,
            )));
        }

        Ok(Self {
            client,
            missing_credentials: Arc::new(missing_credentials),
            images,
            translator,
            category_names: Arc::new(TermTable::category_names()),
            max_upload_bytes: config.max_upload_bytes,
        })
    }

    fn client(&self) -> Result<&AffiliateClient, ApiError> {
        self.client.as_deref().ok_or_else(|| {
            ApiError::Config(format!(
                "Server is missing configuration: {}",
                self.missing_credentials.join(", ")
            ))
        })
    }
}

/// Build the Axum application with routes and middleware
pub fn build_app(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .route("/health", get(health_check))
        .route("/search", get(search))
        .route("/categories", get(categories))
        .route("/search-by-image", post(search_by_image))
        .route("/translate", get(translate))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Debug, Default, Deserialize)]
struct SearchParams {
    keywords: Option<String>,
    #[serde(rename = "categoryId")]
    category_id: Option<String>,
    page_no: Option<u32>,
    page_size: Option<u32>,
    filter: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Query flags accept the usual spellings; absent means off.
fn parse_flag(name: &str, value: Option<&str>) -> Result<bool, ApiError> {
    let Some(value) = value else {
        return Ok(false);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "0" | "no" | "off" => Ok(false),
        "true" | "1" | "yes" | "on" => Ok(true),
        _ => Err(ApiError::BadRequest(format!(
            "{} must be true or false",
            name
        ))),
    }
}

/// Search products by keyword and/or category
async fn search(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(params) = params?;
    let filter = parse_flag("filter", params.filter.as_deref())?;
    let keywords = non_empty(params.keywords);
    let category_id = non_empty(params.category_id);
    if keywords.is_none() && category_id.is_none() {
        return Err(ApiError::BadRequest(
            "keywords or categoryId parameter is required".to_string(),
        ));
    }

    let client = state.client()?;

    let keywords = match keywords {
        Some(raw) => Some(state.translator.translate(&raw).await),
        None => None,
    };

    let query = ProductQuery {
        keywords,
        category_id,
        page_no: params.page_no,
        page_size: params.page_size,
    };

    let data = client.search_products(&query).await.map_err(|e| {
        tracing::error!("Search error: {}", e);
        ApiError::from(e)
    })?;

    if filter
        && let Some(keyword) = &query.keywords
    {
        let filtered = filter_products(&data, keyword);
        tracing::info!("Filtered search results down to {}", filtered.len());
        return Ok(Json(json!({ "original": data, "filtered": filtered })));
    }

    Ok(Json(data))
}

/// Category list with Hebrew display names
async fn categories(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let client = state.client()?;

    let mut data = client.list_categories().await.map_err(|e| {
        tracing::error!("Category list error: {}", e);
        ApiError::from(e)
    })?;

    let replaced = rewrite_category_names(&mut data, &state.category_names);
    tracing::debug!("Rewrote {} category names", replaced);

    Ok(Json(data))
}

/// Search by an uploaded image (multipart field `image`)
async fn search_by_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ApiError> {
    let mut multipart = multipart?;
    let mut image = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::from_multipart(e, "Invalid multipart body"))?
    {
        if field.name() == Some("image") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::from_multipart(e, "Failed to read image"))?;
            image = Some(bytes);
            break;
        }
    }

    let image = image
        .filter(|bytes| !bytes.is_empty())
        .ok_or_else(|| ApiError::BadRequest("No image file uploaded".to_string()))?;

    let images = state.images.as_deref().ok_or_else(|| {
        ApiError::Config("Server is missing configuration: IMAGE_SEARCH_API_KEY".to_string())
    })?;

    let data = images.search(&image).await.map_err(|e| {
        tracing::error!("Image search error: {}", e);
        ApiError::from(e)
    })?;

    Ok(Json(data))
}

#[derive(Debug, Deserialize)]
struct TranslateParams {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
struct TranslateResponse {
    original: String,
    translated: String,
}

/// Show how a query would be translated
async fn translate(
    State(state): State<AppState>,
    params: Result<Query<TranslateParams>, QueryRejection>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let Query(params) = params?;
    let translated = state.translator.translate(&params.text).await;
    Ok(Json(TranslateResponse {
        original: params.text,
        translated,
    }))
}

/// API error types
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    PayloadTooLarge(String),
    Config(String),
    Timeout(String),
    InternalError(String),
}

impl From<ProxyError> for ApiError {
    fn from(err: ProxyError) -> Self {
        match err {
            ProxyError::TokenRefresh(reason) => ApiError::Unauthorized(format!(
                "Failed to refresh access token ({}). The refresh token may have expired. Please re-authorize.",
                reason
            )),
            ProxyError::Timeout { .. } => ApiError::Timeout(err.to_string()),
            _ => ApiError::InternalError("Failed to fetch data from upstream API".to_string()),
        }
    }
}

impl ApiError {
    /// Upload over the body limit is 413, any other multipart failure is 400.
    fn from_multipart(err: MultipartError, context: &str) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge("Uploaded image is too large".to_string())
        } else {
            ApiError::BadRequest(format!("{}: {}", context, err.body_text()))
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(format!(
            "Invalid query parameters: {}",
            rejection.body_text()
        ))
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            ApiError::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::Timeout(msg) => (StatusCode::GATEWAY_TIMEOUT, msg),
            ApiError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "success": false,
            "error": message
        }));

        (status, body).into_response()
    }
}
