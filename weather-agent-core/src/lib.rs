//! Core library for the weather agent.
//!
//! This crate defines:
//! - An observable async-state container with an in-flight guard
//! - The weather pipeline (Open-Meteo client, snapshot mapping, store)
//! - The chat pipeline (webhook agent client, message log, store)
//! - Configuration and the shared HTTP client settings
//!
//! It is used by `weather-agent-cli`, but any front end can drive the
//! stores and render their state.

pub mod chat;
pub mod config;
pub mod error;
pub mod http;
pub mod state;
pub mod weather;

pub use chat::{AgentClient, ChatMessage, ChatSessionState, ChatStore, chat_store_from_config};
pub use config::Config;
pub use error::ClientError;
pub use http::HttpSettings;
pub use state::{AsyncState, StateCell};
pub use weather::{
    HourlyPoint, WeatherClient, WeatherDataStore, WeatherQuery, WeatherSnapshot,
    weather_store_from_config,
};
