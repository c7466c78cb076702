//! Per-search fan-out and merge.
//!
//! One search resolves the location once, fetches every data source
//! concurrently, and composes a [`WeatherBundle`]. Current conditions and
//! the forecast are required; air quality, alerts and UV index degrade to
//! "absent" without failing the search.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::client::WeatherApi;
use crate::error::Result;
use crate::model::{Location, WeatherBundle};

#[derive(Debug)]
pub struct WeatherAggregator<A> {
    api: A,
    generation: AtomicU64,
}

impl<A: WeatherApi> WeatherAggregator<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            generation: AtomicU64::new(0),
        }
    }

    /// Generation of the most recently started search.
    pub fn latest_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Whether a bundle from `generation` is still the newest search. A
    /// frontend that fires overlapping searches drops any bundle for which
    /// this is false instead of rendering a stale response over a newer one.
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.latest_generation()
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Full dashboard fetch for a free-text location.
    pub async fn fetch_all(&self, location: &str) -> Result<WeatherBundle> {
        let generation = self.next_generation();
        let resolved = self.api.resolve(location).await?;
        self.fetch_resolved(generation, location, resolved).await
    }

    /// Full dashboard fetch for device-provided coordinates: reverse-geocode
    /// to a place label, then the same flow as [`Self::fetch_all`].
    pub async fn fetch_all_from_coordinates(&self, lat: f64, lon: f64) -> Result<WeatherBundle> {
        let generation = self.next_generation();
        let resolved = self.api.resolve_from_coordinates(lat, lon).await?;
        let query = resolved.label();
        self.fetch_resolved(generation, &query, resolved).await
    }

    async fn fetch_resolved(
        &self,
        generation: u64,
        query: &str,
        location: Location,
    ) -> Result<WeatherBundle> {
        let (lat, lon) = (location.latitude, location.longitude);

        // Name-keyed and coordinate-keyed sources all describe the same
        // resolved point; the join waits for every outcome before deciding.
        let (current, forecast, air_quality, alerts, uv_index) = tokio::join!(
            self.api.current_weather(query),
            self.api.forecast(query),
            self.api.air_quality(lat, lon),
            self.api.alerts(lat, lon),
            self.api.uv_index(lat, lon),
        );

        let current = current?;
        let forecast = forecast?;

        let air_quality = match air_quality {
            Ok(reading) => Some(reading),
            Err(err) => {
                tracing::warn!(error = %err, "air quality unavailable");
                None
            }
        };
        let alerts = match alerts {
            Ok(alerts) => alerts,
            Err(err) => {
                tracing::warn!(error = %err, "weather alerts unavailable");
                Vec::new()
            }
        };
        let uv_index = match uv_index {
            Ok(reading) => Some(reading),
            Err(err) => {
                tracing::warn!(error = %err, "UV index unavailable");
                None
            }
        };

        Ok(WeatherBundle {
            generation,
            location,
            current,
            forecast,
            air_quality,
            alerts,
            uv_index,
        })
    }
}
