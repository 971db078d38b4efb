use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::info;

use crate::provider::truncate_body;

use super::TemperatureProvider;

const DEFAULT_BASE_URL: &str = "http://api.weatherapi.com";

#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: String) -> Self {
        Self { api_key, base_url: DEFAULT_BASE_URL.to_string(), http: Client::new() }
    }

    /// Point the provider at another host, e.g. a local stub server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    current: WaCurrent,
}

fn parse_celsius(body: &str) -> Result<f64> {
    let parsed: WaResponse =
        serde_json::from_str(body).context("Failed to parse WeatherAPI current JSON")?;
    Ok(parsed.current.temp_c)
}

#[async_trait]
impl TemperatureProvider for WeatherApiProvider {
    async fn temperature(&self, city: &str) -> Result<f64> {
        let url = format!("{}/v1/current.json", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("q", city)])
            .send()
            .await
            .context("Failed to send request to WeatherAPI.com")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read WeatherAPI response body")?;

        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "WeatherAPI request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let celsius = parse_celsius(&body)?;
        info!("weatherapi: {city}: {celsius:.2}");

        Ok(celsius)
    }
}
