use crate::config::CONFIG;
use crate::core::errors::SplitLedgerError;
use crate::core::models::RateTable;
use crate::infrastructure::rates::RateFetcher;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::info;

#[derive(Deserialize)]
struct EodRatesResponse {
    base_code: String,
    rates: HashMap<String, f64>,
}

/// Fetches a full day's rate table for one base currency over HTTP.
/// Requests carry a hard timeout so a slow rate source cannot stall
/// settlement generation.
pub struct HttpRateFetcher {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpRateFetcher {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        HttpRateFetcher {
            client: Client::new(),
            base_url,
            timeout,
        }
    }

    pub fn from_config() -> Self {
        Self::new(
            CONFIG.rate_source_url.clone(),
            Duration::from_secs(CONFIG.rate_fetch_timeout_secs),
        )
    }
}

#[async_trait]
impl RateFetcher for HttpRateFetcher {
    async fn fetch(&self, base_currency: &str) -> Result<RateTable, SplitLedgerError> {
        let url = format!("{}/{}", self.base_url, base_currency);
        info!(url = %url, "fetching EOD rates");

        let fetch_err = |e: reqwest::Error| SplitLedgerError::RateFetchFailed {
            base: base_currency.to_string(),
            reason: e.to_string(),
        };

        let response: EodRatesResponse = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(fetch_err)?
            .error_for_status()
            .map_err(fetch_err)?
            .json()
            .await
            .map_err(fetch_err)?;

        Ok(RateTable {
            base: response.base_code,
            date: Utc::now().date_naive(),
            rates: response.rates,
        })
    }
}
