use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, sync::Arc};

use crate::{Config, error::ClientError};

pub mod model;
pub mod openmeteo;
pub mod store;

pub use model::{ForecastPayload, HourlyPoint, TemperatureBand, TemperatureRange, WeatherSnapshot};
pub use openmeteo::OpenMeteoClient;
pub use store::WeatherDataStore;

pub const DEFAULT_LATITUDE: f64 = -1.2833;
pub const DEFAULT_LONGITUDE: f64 = 36.8167;

/// Location and window of a forecast request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub past_days: u32,
    pub forecast_days: u32,
}

impl Default for WeatherQuery {
    fn default() -> Self {
        Self {
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
            past_days: 2,
            forecast_days: 14,
        }
    }
}

/// Source of raw forecast payloads.
#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    async fn fetch_forecast(&self) -> Result<ForecastPayload, ClientError>;
}

/// Build a weather store pointed at the configured endpoint.
pub fn weather_store_from_config(config: &Config, http: Client) -> WeatherDataStore {
    let client = OpenMeteoClient::new(http, &config.weather.base_url, config.weather.query());
    WeatherDataStore::new(Arc::new(client))
}
