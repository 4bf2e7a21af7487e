//! Twitter Credentials Check Script
//!
//! This script signs a request to `account/verify_credentials.json` with the
//! four OAuth 1.0a secrets from the environment and prints which account they
//! belong to. Run it before the first `whistleblower publish`.

use whistleblower::{build_oauth1_header, Config, TwitterClient, API_BASE};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    println!("🐦 Twitter Credentials Check");
    println!("============================");

    if dotenvy::dotenv().is_ok() {
        println!("📄 Loaded .env file");
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            println!("❌ {}", e);
            return Err(e.into());
        }
    };
    println!("🔑 Credentials: {:?}", config.credentials);

    // Validate that a client can be built with the configured timeout
    TwitterClient::new(config.credentials.clone(), config.http_timeout)?;

    let url = format!("{}/account/verify_credentials.json", API_BASE);
    let auth_header = build_oauth1_header(&config.credentials, "GET", &url, &[])?;
    println!("📤 Sending GET request to {}", url);

    let response = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()?
        .get(&url)
        .header("Authorization", auth_header)
        .send()
        .await?;
    let status = response.status();
    let body: serde_json::Value = response.json().await.unwrap_or_default();
    println!("📊 Received response with status: {}", status);

    if status.is_success() {
        let screen_name = body
            .get("screen_name")
            .and_then(|v| v.as_str())
            .unwrap_or("<unknown>");
        println!("✅ Credentials belong to @{}", screen_name);
        if screen_name != config.screen_name {
            println!(
                "⚠️  TWITTER_SCREEN_NAME is @{}, provisioning will read that timeline instead",
                config.screen_name
            );
        }
        Ok(())
    } else {
        println!("❌ Credentials rejected: {}", body);
        Err(format!("Twitter API error ({})", status).into())
    }
}
