//! Core library for the `skycast` weather dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - An async client for the OpenWeatherMap HTTP API
//! - Location resolution (free-text queries and coordinate pairs)
//! - Per-search aggregation of required and optional data sources
//! - Day bucketing and display classification for forecast rendering
//!
//! It is used by `skycast-cli`, but can also be reused by other frontends or
//! services.

pub mod aggregate;
pub mod classify;
pub mod client;
pub mod config;
pub mod daily;
pub mod error;
pub mod geocoding;
pub mod model;

pub use aggregate::WeatherAggregator;
pub use client::{OpenWeatherClient, WeatherApi};
pub use config::Config;
pub use daily::{DailyBucket, average_temp, group_by_day};
pub use error::{Error, Result};
pub use model::{
    AirQuality, Alert, CurrentConditions, ForecastSample, Location, UvIndex, WeatherBundle,
};
