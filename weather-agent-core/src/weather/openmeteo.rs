use async_trait::async_trait;
use reqwest::Client;

use crate::error::ClientError;

use super::{ForecastPayload, WeatherClient, WeatherQuery};

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com";

const FIELD: &str = "temperature_2m";

#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    http: Client,
    base_url: String,
    query: WeatherQuery,
}

impl OpenMeteoClient {
    pub fn new(http: Client, base_url: impl Into<String>, query: WeatherQuery) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            query,
        }
    }

    pub fn query(&self) -> &WeatherQuery {
        &self.query
    }

    fn forecast_url(&self) -> String {
        format!("{}/v1/forecast", self.base_url)
    }
}

#[async_trait]
impl WeatherClient for OpenMeteoClient {
    async fn fetch_forecast(&self) -> Result<ForecastPayload, ClientError> {
        let url = self.forecast_url();
        tracing::debug!(%url, latitude = self.query.latitude, longitude = self.query.longitude, "requesting forecast");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("latitude", self.query.latitude.to_string()),
                ("longitude", self.query.longitude.to_string()),
                ("hourly", FIELD.to_string()),
                ("current", FIELD.to_string()),
                ("past_days", self.query.past_days.to_string()),
                ("forecast_days", self.query.forecast_days.to_string()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(ClientError::http_status(status, &body));
        }

        Ok(serde_json::from_str(&body)?)
    }
}
