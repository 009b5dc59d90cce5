#![allow(dead_code)]

use std::collections::BTreeMap;
use std::time::Duration;

use aliproxy_rs::{AppState, Endpoints, ProxyConfig, build_app};
use wiremock::{MockServer, Request};

pub const APP_KEY: &str = "517514";
pub const APP_SECRET: &str = "test-secret";
pub const ACCESS_TOKEN: &str = "old-access";
pub const REFRESH_TOKEN: &str = "old-refresh";
pub const TRACKING_ID: &str = "tracker";
pub const IMAGE_KEY: &str = "image-key";

/// Configuration pointing every outbound call at `upstream`.
pub fn config_for(upstream: &MockServer) -> ProxyConfig {
    ProxyConfig {
        app_key: Some(APP_KEY.to_string()),
        app_secret: Some(APP_SECRET.to_string()),
        access_token: Some(ACCESS_TOKEN.to_string()),
        refresh_token: Some(REFRESH_TOKEN.to_string()),
        tracking_id: Some(TRACKING_ID.to_string()),
        endpoints: Endpoints {
            sync_url: format!("{}/sync", upstream.uri()),
            rest_url: format!("{}/rest", upstream.uri()),
        },
        image_search_api_key: Some(IMAGE_KEY.to_string()),
        image_search_url: format!("{}/image-search", upstream.uri()),
        translate_url: format!("{}/translate_a/single", upstream.uri()),
        timeout: Duration::from_secs(5),
        ..Default::default()
    }
}

/// Serve the proxy on an ephemeral port and return its base URL.
pub async fn spawn_proxy(config: ProxyConfig) -> String {
    let state = AppState::from_config(&config).expect("state");
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{}", addr)
}

/// Query parameters of a received request.
pub fn query_map(request: &Request) -> BTreeMap<String, String> {
    request.url.query_pairs().into_owned().collect()
}

/// Recompute the signature of a received request and compare it with its `sign`.
pub fn assert_signed(request: &Request, path: Option<&str>) {
    let mut params = query_map(request);
    let sign = params.remove("sign").expect("sign parameter");
    assert_eq!(sign, aliproxy_rs::sign(&params, APP_SECRET, path));
}
