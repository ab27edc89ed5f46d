use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::FeedError;
use crate::traits::PriceSource;

const DEFAULT_BASE_URL: &str = "https://www.goldapi.io";

#[derive(Debug, Deserialize)]
pub struct GoldPriceResponse {
    pub price: f64,
}

/// goldapi.io XAU/USD spot price, authenticated with an access-token header.
pub struct GoldApiSource {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GoldApiSource {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to build HTTP client."),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl PriceSource for GoldApiSource {
    fn name(&self) -> &'static str {
        "gold-api"
    }

    async fn fetch_price(&self) -> Result<f64, FeedError> {
        let url = format!("{}/api/XAU/USD", self.base_url);
        let resp = self
            .client
            .get(&url)
            .header("x-access-token", &self.api_key)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FeedError::Transient(format!("HTTP {status}")));
        }

        let body = resp.json::<GoldPriceResponse>().await?;
        Ok(body.price)
    }
}
