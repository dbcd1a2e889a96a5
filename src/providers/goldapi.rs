use crate::core::error::DataUnavailable;
use crate::core::price::{GoldPriceProvider, GoldQuote, SpotPrice};
use crate::providers::util::{http_client, transport_error};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

const FEED: &str = "gold price";

/// Spot prices from goldapi.io, authenticated with an access token.
pub struct GoldApiProvider {
    base_url: String,
    metal: String,
    currency: String,
    access_token: Option<String>,
    timeout: Duration,
}

impl GoldApiProvider {
    pub fn new(
        base_url: &str,
        metal: &str,
        currency: &str,
        access_token: Option<String>,
        timeout: Duration,
    ) -> Self {
        GoldApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            metal: metal.to_string(),
            currency: currency.to_string(),
            access_token,
            timeout,
        }
    }
}

#[derive(Deserialize, Debug)]
struct GoldApiResponse {
    price: Option<f64>,
    currency: Option<String>,
    metal: Option<String>,
    timestamp: Option<i64>,
    price_gram_24k: Option<f64>,
    error: Option<String>,
}

#[async_trait]
impl GoldPriceProvider for GoldApiProvider {
    #[instrument(
        name = "GoldApiFetch",
        skip(self),
        fields(metal = %self.metal, currency = %self.currency)
    )]
    async fn fetch_spot_price(&self) -> Result<GoldQuote, DataUnavailable> {
        let token = self
            .access_token
            .as_deref()
            .ok_or_else(|| DataUnavailable::new(FEED, "no access token configured"))?;

        let url = format!("{}/api/{}/{}", self.base_url, self.metal, self.currency);
        debug!("Requesting gold price from {}", url);

        let client = http_client(FEED, self.timeout)?;
        let response = client
            .get(&url)
            .header("x-access-token", token)
            .send()
            .await
            .map_err(|e| transport_error(FEED, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataUnavailable::new(FEED, format!("HTTP error: {status}")));
        }

        let text = response.text().await.map_err(|e| transport_error(FEED, e))?;
        let data: GoldApiResponse = serde_json::from_str(&text)
            .map_err(|e| DataUnavailable::new(FEED, format!("Failed to parse JSON response: {e}")))?;

        if let Some(error) = data.error {
            return Err(DataUnavailable::new(FEED, error));
        }
        let price = data
            .price
            .ok_or_else(|| DataUnavailable::new(FEED, "response has no price field"))?;
        SpotPrice::available(price)?;

        debug!(price, "Received gold price");

        Ok(GoldQuote {
            price,
            currency: data.currency.unwrap_or_else(|| self.currency.clone()),
            metal: data.metal.unwrap_or_else(|| self.metal.clone()),
            price_per_gram_24k: data.price_gram_24k,
            quoted_at: data
                .timestamp
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
        })
    }
}
