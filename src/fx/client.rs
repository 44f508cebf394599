//! External rate source client
//!
//! HTTP client for a currencylayer-style quote API. The free tier of these
//! sources only quotes against USD, so every conversion goes through the
//! USD pivot (see [`super::rates::RateSheet`]).

use std::collections::HashMap;

use reqwest::Client as HttpClient;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::CurrencyCode;

use super::error::FxError;
use super::rates::RateSheet;
use super::{Conversion, CurrencyConverter};

/// Currencies requested from the rate source on every refresh.
const SUPPORTED_CURRENCIES: &str = "USD,NGN,GBP,GHS,EUR";

/// Quote API response body.
#[derive(Debug, Deserialize)]
struct LayerResponse {
    success: bool,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    quotes: Option<HashMap<String, Decimal>>,
    #[serde(default)]
    error: Option<LayerError>,
}

#[derive(Debug, Deserialize)]
struct LayerError {
    #[allow(dead_code)]
    code: i64,
    info: String,
}

/// Rate source client backed by a currencylayer-style HTTP API.
pub struct LayerRateClient {
    http_client: HttpClient,
    endpoint: String,
    access_key: String,
}

impl LayerRateClient {
    /// Create a new client against the given endpoint and access key.
    pub fn new(endpoint: String, access_key: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            endpoint,
            access_key,
        }
    }

    /// Fetch a fresh rate sheet from the source.
    pub async fn fetch_sheet(&self) -> Result<RateSheet, FxError> {
        let url = format!(
            "{}?access_key={}&currencies={}&source=USD&format=1",
            self.endpoint, self.access_key, SUPPORTED_CURRENCIES
        );

        let response = self.http_client.get(&url).send().await?;
        let body: LayerResponse = response.json().await?;

        if !body.success {
            let info = body
                .error
                .map(|e| e.info)
                .unwrap_or_else(|| "Failed to fetch currency rates".to_string());
            return Err(FxError::Api(info));
        }

        let quotes = body
            .quotes
            .ok_or_else(|| FxError::Api("Rate source returned no quotes".to_string()))?;

        let pivot = body
            .source
            .as_deref()
            .unwrap_or("USD")
            .parse::<CurrencyCode>()
            .map_err(|e| FxError::Api(format!("Invalid pivot currency: {}", e)))?;

        Ok(RateSheet::new(pivot, quotes))
    }
}

#[async_trait::async_trait]
impl CurrencyConverter for LayerRateClient {
    async fn convert(
        &self,
        amount: Decimal,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<Conversion, FxError> {
        // Same currency needs no rate lookup
        if from == to {
            return Ok(Conversion::identity(amount));
        }

        let sheet = self.fetch_sheet().await?;
        let conversion = sheet.convert(amount, from, to)?;

        tracing::debug!(
            %amount,
            from = %from,
            to = %to,
            rate = %conversion.rate,
            converted = %conversion.amount,
            "Currency conversion"
        );

        Ok(conversion)
    }
}
