use serde::Deserialize;
use serde_json::Value;

/// Outbound parameter set. Keys are unique; the signer sorts them.
pub type Params = std::collections::BTreeMap<String, String>;

/// Remote method names
pub mod methods {
    pub const PRODUCT_QUERY: &str = "aliexpress.affiliate.product.query";
    pub const CATEGORY_GET: &str = "aliexpress.affiliate.category.get";
}

/// System API paths
pub mod paths {
    pub const TOKEN_REFRESH: &str = "/auth/token/refresh";
    pub const CATEGORY_GET: &str = "/aliexpress/affiliate/category/get";
}

/// Error codes the remote API uses for an invalid or expired access token.
pub const TOKEN_ERROR_CODES: &[&str] = &["27", "IllegalAccessToken"];

/// Product search parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub keywords: Option<String>,
    pub category_id: Option<String>,
    pub page_no: Option<u32>,
    pub page_size: Option<u32>,
}

impl ProductQuery {
    /// A search needs keywords or a category filter.
    pub fn is_empty(&self) -> bool {
        self.keywords.is_none() && self.category_id.is_none()
    }
}

/// `error_response` object in a remote reply
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub code: Option<Value>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
}

impl ErrorResponse {
    /// Code as a string; the API returns it as either a string or a number.
    pub fn code_str(&self) -> Option<String> {
        match self.code.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Reply from the token refresh endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<Value>,
    #[serde(default)]
    pub code: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Which remote namespace a call goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStyle {
    /// `/sync?method=...`, signed without a path, carries the access token
    Business,
    /// `/rest{path}`, signed with the path prefix, no access token
    System,
}

impl CallStyle {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "business" => Some(Self::Business),
            "system" => Some(Self::System),
            _ => None,
        }
    }
}
