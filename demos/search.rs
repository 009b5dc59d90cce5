use anyhow::{Context, Result};
use aliproxy_rs::client::{extract_products, filter_products, rewrite_category_names};
use aliproxy_rs::{
    AffiliateClient, ApiGateway, ClientOptions, CredentialStore, ProductQuery, ProxyConfig,
    QueryTranslator, TermTable,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ProxyConfig::from_env();
    let creds = config.credentials().map_err(|missing| {
        anyhow::anyhow!("Missing environment variables: {}", missing.join(", "))
    })?;

    let http = wreq::Client::builder()
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
    let client = AffiliateClient::new(gateway, ClientOptions::new(creds.tracking_id));

    let keywords = QueryTranslator::default().translate("אוזניות אלחוטיות").await;
    println!("Query: {}", keywords);

    let response = client
        .search_products(&ProductQuery {
            keywords: Some(keywords.clone()),
            page_size: Some(10),
            ..Default::default()
        })
        .await?;

    for product in extract_products(&response) {
        println!(
            "  {} - {}",
            product["product_id"],
            product["product_title"].as_str().unwrap_or("N/A")
        );
    }

    let matching = filter_products(&response, &keywords);
    println!("{} titles contain \"{}\"", matching.len(), keywords);

    let mut categories = client.list_categories().await?;
    let renamed = rewrite_category_names(&mut categories, &TermTable::category_names());
    println!("\nCategories ({} with Hebrew names):", renamed);
    println!("{}", serde_json::to_string_pretty(&categories)?);

    Ok(())
}
