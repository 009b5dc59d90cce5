use serde_json::Value;

use crate::error::Result;
use crate::gateway::ApiGateway;
use crate::refresh::{self, SignedCall, call_with_refresh};
use crate::terms::TermTable;
use crate::types::{CallStyle, Params, ProductQuery, methods, paths};

/// Options that shape outbound product/category calls.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub tracking_id: String,
    /// `target_language` sent with searches
    pub target_language: String,
    /// Page size used when the query does not set one
    pub default_page_size: Option<u32>,
    /// How the category list is requested
    pub category_call: CallStyle,
}

impl ClientOptions {
    pub fn new(tracking_id: impl Into<String>) -> Self {
        Self {
            tracking_id: tracking_id.into(),
            target_language: "EN".to_string(),
            default_page_size: None,
            category_call: CallStyle::System,
        }
    }
}

/// Product search and category listing with transparent token refresh.
#[derive(Debug, Clone)]
pub struct AffiliateClient {
    gateway: ApiGateway,
    options: ClientOptions,
}

impl AffiliateClient {
    pub fn new(gateway: ApiGateway, options: ClientOptions) -> Self {
        Self { gateway, options }
    }

    pub fn gateway(&self) -> &ApiGateway {
        &self.gateway
    }

    /// Parameters for a product query. Keywords are forwarded as given.
    pub fn search_params(&self, query: &ProductQuery) -> Params {
        let mut params = Params::new();
        params.insert("tracking_id".to_string(), self.options.tracking_id.clone());
        params.insert(
            "target_language".to_string(),
            self.options.target_language.clone(),
        );
        if let Some(keywords) = &query.keywords {
            params.insert("keywords".to_string(), keywords.clone());
        }
        if let Some(category_id) = &query.category_id {
            params.insert("category_id".to_string(), category_id.clone());
        }
        if let Some(page_no) = query.page_no {
            params.insert("page_no".to_string(), page_no.to_string());
        }
        if let Some(page_size) = query.page_size.or(self.options.default_page_size) {
            params.insert("page_size".to_string(), page_size.to_string());
        }
        params
    }

    /// Run a product query and return the remote JSON unchanged.
    pub async fn search_products(&self, query: &ProductQuery) -> Result<Value> {
        tracing::info!(
            "Product query keywords={:?} category={:?} page={:?}",
            query.keywords,
            query.category_id,
            query.page_no
        );
        let call = SignedCall::business(methods::PRODUCT_QUERY, self.search_params(query));
        call_with_refresh(&self.gateway, &call).await
    }

    /// Fetch the category list and return the remote JSON unchanged.
    pub async fn list_categories(&self) -> Result<Value> {
        let call = match self.options.category_call {
            CallStyle::System => {
                SignedCall::system(methods::CATEGORY_GET, paths::CATEGORY_GET, Params::new())
            }
            CallStyle::Business => SignedCall::business(methods::CATEGORY_GET, Params::new()),
        };
        call_with_refresh(&self.gateway, &call).await
    }

    /// Force a token refresh.
    pub async fn refresh_access_token(&self) -> Result<()> {
        refresh::refresh_access_token(&self.gateway).await
    }
}

/// Replace every `category_name` string found in `body` that has a display name.
///
/// Returns how many names were replaced.
pub fn rewrite_category_names(body: &mut Value, names: &TermTable) -> usize {
    match body {
        Value::Object(map) => {
            let mut replaced = 0;
            for (key, value) in map.iter_mut() {
                if key == "category_name"
                    && let Value::String(name) = value
                {
                    if let Some(display) = names.get(name) {
                        *name = display.to_string();
                        replaced += 1;
                    }
                } else {
                    replaced += rewrite_category_names(value, names);
                }
            }
            replaced
        }
        Value::Array(items) => items
            .iter_mut()
            .map(|item| rewrite_category_names(item, names))
            .sum(),
        _ => 0,
    }
}

/// Products from a product query reply, wherever the reply nests them.
pub fn extract_products(body: &Value) -> Vec<&Value> {
    let list = body
        .pointer("/aliexpress_affiliate_product_query_response/resp_result/result/products/product")
        .or_else(|| body.pointer("/resp_result/result/products/product"))
        .or_else(|| body.pointer("/products/product"));
    match list {
        Some(Value::Array(items)) => items.iter().collect(),
        _ => Vec::new(),
    }
}

/// Products whose title or category name contains `keyword`, ignoring case.
///
/// Order follows the remote reply.
pub fn filter_products(body: &Value, keyword: &str) -> Vec<Value> {
    let needle = keyword.trim().to_lowercase();
    if needle.is_empty() {
        return extract_products(body).into_iter().cloned().collect();
    }

    const FIELDS: &[&str] = &[
        "product_title",
        "first_level_category_name",
        "second_level_category_name",
    ];

    extract_products(body)
        .into_iter()
        .filter(|product| {
            FIELDS.iter().any(|field| {
                product
                    .get(*field)
                    .and_then(Value::as_str)
                    .is_some_and(|text| text.to_lowercase().contains(&needle))
            })
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_rewrite_category_names() {
        let mut body = json!({
            "aliexpress_affiliate_category_get_response": {
                "resp_result": {
                    "result": {
                        "categories": {
                            "category": [
                                {"category_id": 3, "category_name": "Shoes"},
                                {"category_id": 7, "category_name": "Gadgets & Gizmos"},
                                {"category_id": 9, "category_name": "Watches", "parent_category_id": 1}
                            ]
                        }
                    }
                }
            }
        });
        let replaced = rewrite_category_names(&mut body, &TermTable::category_names());
        assert_eq!(replaced, 2);

        let categories = body
            .pointer("/aliexpress_affiliate_category_get_response/resp_result/result/categories/category")
            .and_then(Value::as_array)
            .unwrap();
        assert_eq!(categories[0]["category_name"], "נעליים");
        assert_eq!(categories[1]["category_name"], "Gadgets & Gizmos");
        assert_eq!(categories[2]["category_name"], "שעונים");
        assert_eq!(categories[2]["category_id"], 9);
    }

    #[test]
    fn test_filter_products_keeps_order() {
        let body = json!({
            "aliexpress_affiliate_product_query_response": {
                "resp_result": {
                    "result": {
                        "products": {
                            "product": [
                                {"product_id": 1, "product_title": "Red Shirt Cotton"},
                                {"product_id": 2, "product_title": "Blue Jeans"},
                                {"product_id": 3, "product_title": "Mug", "first_level_category_name": "red shirt gifts"}
                            ]
                        }
                    }
                }
            }
        });
        let filtered = filter_products(&body, "red shirt");
        let ids: Vec<i64> = filtered
            .iter()
            .filter_map(|p| p["product_id"].as_i64())
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_filter_products_without_products() {
        assert!(filter_products(&json!({"error_response": {}}), "shirt").is_empty());
    }
}
