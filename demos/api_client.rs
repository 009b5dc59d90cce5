/// Example HTTP client calling a running proxy
///
/// Run the server first:
/// ```bash
/// cargo run --bin server
/// ```
///
/// Then run this example:
/// ```bash
/// cargo run --example api_client
/// ```
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize, Debug)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Deserialize, Debug)]
struct TranslateResponse {
    original: String,
    translated: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = std::env::var("API_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let client = reqwest::Client::new();

    println!("=== AliExpress proxy demo ===\n");

    println!("1. Checking server health...");
    let health: HealthResponse = client
        .get(format!("{}/health", base_url))
        .send()
        .await?
        .json()
        .await?;
    println!("   Server status: {}", health.status);
    println!("   Version: {}\n", health.version);

    println!("2. Translating a Hebrew query...");
    let translation: TranslateResponse = client
        .get(format!("{}/translate", base_url))
        .query(&[("text", "נעלי ספורט")])
        .send()
        .await?
        .json()
        .await?;
    println!("   {} -> {}\n", translation.original, translation.translated);

    println!("3. Searching products...");
    let response = client
        .get(format!("{}/search", base_url))
        .query(&[("keywords", "נעלי ספורט"), ("page_size", "5"), ("filter", "true")])
        .send()
        .await?;
    if response.status().is_success() {
        let body: Value = response.json().await?;
        let filtered = body["filtered"].as_array().map(Vec::len).unwrap_or(0);
        println!("   {} products matched the query locally\n", filtered);
    } else {
        let status = response.status();
        println!("   Error {}: {}\n", status, response.text().await?);
    }

    println!("4. Listing categories...");
    let response = client.get(format!("{}/categories", base_url)).send().await?;
    if response.status().is_success() {
        let body: Value = response.json().await?;
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        let status = response.status();
        println!("   Error {}: {}", status, response.text().await?);
    }

    println!("\n=== Demo Complete ===");

    Ok(())
}
