use std::env;

use anyhow::{Context, Result};
use wreq::Client;

use aliproxy_rs::{
    AffiliateClient, ApiGateway, ClientOptions, CredentialStore, ProductQuery, ProxyConfig,
    QueryTranslator,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aliproxy_rs=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <keywords> [page_no]", args[0]);
        eprintln!("  keywords: search text, Hebrew is translated to English");
        eprintln!("  page_no:  result page (default: 1)");
        eprintln!("Credentials are read from ALIEXPRESS_* environment variables.");
        std::process::exit(1);
    }

    let page_no = match args.get(2) {
        Some(p) => Some(
            p.parse::<u32>()
                .with_context(|| format!("Invalid page number: {}", p))?,
        ),
        None => None,
    };

    let config = ProxyConfig::from_env();
    let creds = config.credentials().map_err(|missing| {
        anyhow::anyhow!("Missing environment variables: {}", missing.join(", "))
    })?;

    let keywords = QueryTranslator::default().translate(&args[1]).await;
    if keywords != args[1] {
        eprintln!("Translated query: {}", keywords);
    }

    let http = Client::builder()
        .gzip(true)
        .build()
        .context("Failed to build HTTP client")?;
    let gateway = ApiGateway::new(
        http,
        config.endpoints.clone(),
        creds.app_key,
        creds.app_secret,
        CredentialStore::new(creds.access_token, creds.refresh_token),
        config.timeout,
    );
    let client = AffiliateClient::new(
        gateway,
        ClientOptions {
            tracking_id: creds.tracking_id,
            target_language: config.target_language.clone(),
            default_page_size: config.default_page_size,
            category_call: config.category_call,
        },
    );

    let response = client
        .search_products(&ProductQuery {
            keywords: Some(keywords),
            page_no,
            ..Default::default()
        })
        .await
        .context("Product search failed")?;

    println!("{}", serde_json::to_string_pretty(&response)?);

    let tokens = client.gateway().store().tokens().await;
    if tokens.access_token != config.access_token.unwrap_or_default() {
        eprintln!("Access token was refreshed during this run; update ALIEXPRESS_ACCESS_TOKEN.");
    }

    Ok(())
}
