//! Async client for the OpenWeatherMap HTTP API.
//!
//! One [`OpenWeatherClient`] value serves a whole dashboard session: it owns
//! the API key and a shared connection pool, and exposes one method per
//! upstream endpoint. The [`WeatherApi`] trait is the seam the aggregator is
//! generic over, so it can be exercised against a fake in tests.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::model::{AirQuality, Alert, CurrentConditions, ForecastSample, Location, UvIndex};

const DATA_URL: &str = "https://api.openweathermap.org/data/2.5";
const ONECALL_URL: &str = "https://api.openweathermap.org/data/3.0/onecall";
const GEO_URL: &str = "https://api.openweathermap.org/geo/1.0";

/// Everything the aggregator needs from the upstream API.
#[async_trait]
pub trait WeatherApi: Send + Sync {
    async fn resolve(&self, query: &str) -> Result<Location>;
    async fn resolve_from_coordinates(&self, lat: f64, lon: f64) -> Result<Location>;
    async fn current_weather(&self, location: &str) -> Result<CurrentConditions>;
    async fn forecast(&self, location: &str) -> Result<Vec<ForecastSample>>;
    async fn air_quality(&self, lat: f64, lon: f64) -> Result<AirQuality>;
    async fn alerts(&self, lat: f64, lon: f64) -> Result<Vec<Alert>>;
    async fn uv_index(&self, lat: f64, lon: f64) -> Result<UvIndex>;
}

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    http: Client,
    data_url: String,
    onecall_url: String,
    geo_url: String,
}

impl OpenWeatherClient {
    /// Build a client against the production endpoints. Refuses to construct
    /// without an API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_urls(
            api_key.into(),
            DATA_URL.to_string(),
            ONECALL_URL.to_string(),
            GEO_URL.to_string(),
        )
    }

    /// Point every endpoint family at one alternate host, keeping the
    /// upstream path layout. Used by tests against a local mock server.
    pub fn with_base_url(api_key: impl Into<String>, base: &str) -> Result<Self> {
        Self::with_urls(
            api_key.into(),
            format!("{base}/data/2.5"),
            format!("{base}/data/3.0/onecall"),
            format!("{base}/geo/1.0"),
        )
    }

    fn with_urls(
        api_key: String,
        data_url: String,
        onecall_url: String,
        geo_url: String,
    ) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(Error::MissingApiKey);
        }

        Ok(Self {
            api_key,
            http: Client::new(),
            data_url,
            onecall_url,
            geo_url,
        })
    }

    /// Current conditions for a place name. A 404 means the upstream doesn't
    /// know the place, which surfaces as [`Error::NotFound`] carrying the
    /// query so the caller's message names the location.
    pub async fn current_weather(&self, location: &str) -> Result<CurrentConditions> {
        let url = format!("{}/weather", self.data_url);
        match self
            .get_json(&url, &[("q", location), ("units", "metric")])
            .await
        {
            Err(Error::Service {
                status: Some(404), ..
            }) => Err(Error::NotFound {
                query: location.to_string(),
            }),
            other => other,
        }
    }

    /// 5-day / 3-hourly forecast series for a place name, in the upstream's
    /// non-decreasing timestamp order.
    pub async fn forecast(&self, location: &str) -> Result<Vec<ForecastSample>> {
        let url = format!("{}/forecast", self.data_url);
        let envelope: ForecastEnvelope = self
            .get_json(&url, &[("q", location), ("units", "metric")])
            .await?;

        Ok(envelope.list)
    }

    /// Air quality at a coordinate. An empty upstream list is "no data for
    /// this location", not a transport failure.
    pub async fn air_quality(&self, lat: f64, lon: f64) -> Result<AirQuality> {
        let url = format!("{}/air_pollution", self.data_url);
        let (lat, lon) = (lat.to_string(), lon.to_string());
        let envelope: AirPollutionEnvelope =
            self.get_json(&url, &[("lat", &lat), ("lon", &lon)]).await?;

        let entry = envelope
            .list
            .into_iter()
            .next()
            .ok_or(Error::Unavailable("air quality"))?;

        Ok(AirQuality {
            index: entry.main.aqi,
            components: entry.components,
            observed_at: entry.dt,
        })
    }

    /// Severe weather alerts at a coordinate.
    ///
    /// The One Call 3.0 endpoint needs a paid subscription; the deprecated
    /// 2.5 endpoint still answers for some keys. The candidates are tried in
    /// order and the first success wins; the error of the last candidate is
    /// returned only when every one fails.
    pub async fn alerts(&self, lat: f64, lon: f64) -> Result<Vec<Alert>> {
        let candidates = [
            self.onecall_url.clone(),
            format!("{}/onecall", self.data_url),
        ];
        let (lat, lon) = (lat.to_string(), lon.to_string());

        let mut last = Error::Unavailable("alerts");
        for url in &candidates {
            let query = [
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("exclude", "minutely,hourly,daily"),
            ];
            match self.get_json::<OneCallEnvelope>(url, &query).await {
                Ok(envelope) => return Ok(envelope.alerts),
                Err(err) => {
                    tracing::debug!(endpoint = url.as_str(), error = %err, "alerts endpoint failed");
                    last = err;
                }
            }
        }

        Err(last)
    }

    /// UV index at a coordinate.
    pub async fn uv_index(&self, lat: f64, lon: f64) -> Result<UvIndex> {
        let url = format!("{}/uvi", self.data_url);
        let (lat, lon) = (lat.to_string(), lon.to_string());
        self.get_json(&url, &[("lat", &lat), ("lon", &lon)]).await
    }

    pub(crate) fn geo_endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.geo_url, name)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let res = self
            .http
            .get(url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(upstream_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|err| Error::Service {
            status: None,
            message: format!("unexpected response body: {err}"),
        })
    }
}

#[async_trait]
impl WeatherApi for OpenWeatherClient {
    async fn resolve(&self, query: &str) -> Result<Location> {
        OpenWeatherClient::resolve(self, query).await
    }

    async fn resolve_from_coordinates(&self, lat: f64, lon: f64) -> Result<Location> {
        OpenWeatherClient::resolve_from_coordinates(self, lat, lon).await
    }

    async fn current_weather(&self, location: &str) -> Result<CurrentConditions> {
        OpenWeatherClient::current_weather(self, location).await
    }

    async fn forecast(&self, location: &str) -> Result<Vec<ForecastSample>> {
        OpenWeatherClient::forecast(self, location).await
    }

    async fn air_quality(&self, lat: f64, lon: f64) -> Result<AirQuality> {
        OpenWeatherClient::air_quality(self, lat, lon).await
    }

    async fn alerts(&self, lat: f64, lon: f64) -> Result<Vec<Alert>> {
        OpenWeatherClient::alerts(self, lat, lon).await
    }

    async fn uv_index(&self, lat: f64, lon: f64) -> Result<UvIndex> {
        OpenWeatherClient::uv_index(self, lat, lon).await
    }
}

#[derive(Debug, Deserialize)]
struct ForecastEnvelope {
    list: Vec<ForecastSample>,
}

#[derive(Debug, Deserialize)]
struct AirPollutionEnvelope {
    list: Vec<AirPollutionEntry>,
}

#[derive(Debug, Deserialize)]
struct AirPollutionEntry {
    main: AqiMain,
    components: crate::model::Pollutants,
    dt: i64,
}

#[derive(Debug, Deserialize)]
struct AqiMain {
    aqi: u8,
}

#[derive(Debug, Deserialize)]
struct OneCallEnvelope {
    #[serde(default)]
    alerts: Vec<Alert>,
}

fn upstream_error(status: StatusCode, body: &str) -> Error {
    if status == StatusCode::UNAUTHORIZED {
        return Error::InvalidApiKey;
    }

    #[derive(Deserialize)]
    struct ApiErrorBody {
        message: Option<String>,
    }

    let message = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| truncate_body(body));

    Error::Service {
        status: Some(status.as_u16()),
        message,
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}
