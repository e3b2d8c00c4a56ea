use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Forecast body as returned by Open-Meteo, reduced to the fields we request.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastPayload {
    pub current: CurrentBlock,
    pub hourly: HourlyBlock,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentBlock {
    pub temperature_2m: f64,
}

/// Two parallel series; index `i` of each describes the same hour.
#[derive(Debug, Clone, Deserialize)]
pub struct HourlyBlock {
    pub time: Vec<String>,
    pub temperature_2m: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyPoint {
    /// Local wall-clock time at the forecast location.
    pub time: NaiveDateTime,
    /// Degrees Celsius.
    pub temperature: f64,
}

/// Point-in-time forecast. Replaced wholesale on every successful fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSnapshot {
    current_temperature: f64,
    hourly: Vec<HourlyPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureRange {
    pub min: f64,
    pub max: f64,
}

impl WeatherSnapshot {
    pub fn new(current_temperature: f64, hourly: Vec<HourlyPoint>) -> Self {
        Self {
            current_temperature,
            hourly,
        }
    }

    pub fn current_temperature(&self) -> f64 {
        self.current_temperature
    }

    pub fn hourly(&self) -> &[HourlyPoint] {
        &self.hourly
    }

    /// The first `hours` entries of the series, in upstream order.
    pub fn upcoming(&self, hours: usize) -> &[HourlyPoint] {
        &self.hourly[..hours.min(self.hourly.len())]
    }

    /// Lowest and highest hourly temperature, `None` for an empty series.
    pub fn range(&self) -> Option<TemperatureRange> {
        let mut temps = self.hourly.iter().map(|p| p.temperature);
        let first = temps.next()?;
        let (min, max) = temps.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t)));
        Some(TemperatureRange { min, max })
    }

    /// Mean hourly temperature, `None` for an empty series.
    pub fn average(&self) -> Option<f64> {
        if self.hourly.is_empty() {
            return None;
        }
        let sum: f64 = self.hourly.iter().map(|p| p.temperature).sum();
        Some(sum / self.hourly.len() as f64)
    }
}

impl TryFrom<ForecastPayload> for WeatherSnapshot {
    type Error = ClientError;

    /// Zips the hourly series positionally. Extra entries in the longer
    /// series are dropped.
    fn try_from(payload: ForecastPayload) -> Result<Self, Self::Error> {
        let HourlyBlock {
            time,
            temperature_2m,
        } = payload.hourly;

        if time.len() != temperature_2m.len() {
            tracing::debug!(
                times = time.len(),
                temperatures = temperature_2m.len(),
                "hourly series lengths differ, truncating to the shorter one"
            );
        }

        let hourly = time
            .iter()
            .zip(temperature_2m)
            .map(|(raw, temperature)| {
                Ok(HourlyPoint {
                    time: parse_local_time(raw)?,
                    temperature,
                })
            })
            .collect::<Result<Vec<_>, ClientError>>()?;

        Ok(WeatherSnapshot::new(payload.current.temperature_2m, hourly))
    }
}

/// ISO-8601 local date-time without offset; seconds are optional.
pub fn parse_local_time(raw: &str) -> Result<NaiveDateTime, ClientError> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .map_err(|_| ClientError::Decode(format!("invalid hourly timestamp '{raw}'")))
}

/// Coarse description of a temperature, used for headlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureBand {
    Hot,
    Warm,
    Pleasant,
    Cool,
    Cold,
    VeryCold,
}

impl TemperatureBand {
    pub fn classify(celsius: f64) -> Self {
        match celsius {
            t if t >= 30.0 => TemperatureBand::Hot,
            t if t >= 25.0 => TemperatureBand::Warm,
            t if t >= 20.0 => TemperatureBand::Pleasant,
            t if t >= 15.0 => TemperatureBand::Cool,
            t if t >= 10.0 => TemperatureBand::Cold,
            _ => TemperatureBand::VeryCold,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureBand::Hot => "Hot",
            TemperatureBand::Warm => "Warm",
            TemperatureBand::Pleasant => "Pleasant",
            TemperatureBand::Cool => "Cool",
            TemperatureBand::Cold => "Cold",
            TemperatureBand::VeryCold => "Very Cold",
        }
    }
}

impl std::fmt::Display for TemperatureBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
