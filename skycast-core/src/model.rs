//! Domain model: serde mirrors of the OpenWeatherMap JSON plus the composite
//! bundle one search produces.
//!
//! Everything here is a value object: built once per request, never mutated,
//! never cached.

use serde::{Deserialize, Serialize};

/// A resolved geographic location, as returned by the geocoding endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

impl Location {
    /// Display label, e.g. "Nairobi, KE". Used as the query string when a
    /// location was reached via reverse geocoding.
    pub fn label(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }
}

/// One entry of the `weather` array: the primary condition code and text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    pub id: u32,
    /// Condition group, e.g. "Clear", "Clouds", "Rain".
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MainMetrics {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    /// hPa.
    pub pressure: f64,
    /// Percent.
    pub humidity: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wind {
    /// m/s (metric units).
    pub speed: f64,
    /// Meteorological degrees.
    #[serde(default)]
    pub deg: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gust: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Clouds {
    /// Cloud cover percent.
    pub all: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coord {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sys {
    #[serde(default)]
    pub country: String,
    /// Epoch seconds, UTC.
    pub sunrise: i64,
    /// Epoch seconds, UTC.
    pub sunset: i64,
}

/// Snapshot of current conditions for one place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub name: String,
    pub coord: Coord,
    pub weather: Vec<Condition>,
    pub main: MainMetrics,
    pub wind: Wind,
    #[serde(default)]
    pub clouds: Clouds,
    /// Meters; the upstream omits it in some regions.
    #[serde(default)]
    pub visibility: Option<u32>,
    pub sys: Sys,
    /// Offset from UTC in seconds for the location.
    pub timezone: i32,
    /// Observation time, epoch seconds.
    pub dt: i64,
}

impl CurrentConditions {
    pub fn primary_condition(&self) -> Option<&Condition> {
        self.weather.first()
    }
}

/// One 3-hourly forecast sample. The upstream delivers samples in
/// non-decreasing `dt` order over a 5-day horizon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSample {
    /// Sample time, epoch seconds.
    pub dt: i64,
    pub main: MainMetrics,
    pub weather: Vec<Condition>,
    pub wind: Wind,
    #[serde(default)]
    pub clouds: Clouds,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dt_txt: Option<String>,
}

impl ForecastSample {
    pub fn primary_condition(&self) -> Option<&Condition> {
        self.weather.first()
    }
}

/// Pollutant concentrations in μg/m³.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Pollutants {
    pub co: f64,
    pub no: f64,
    pub no2: f64,
    pub o3: f64,
    pub so2: f64,
    pub pm2_5: f64,
    pub pm10: f64,
    pub nh3: f64,
}

/// Air quality reading; `index` is the upstream AQI scale 1..=5.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirQuality {
    pub index: u8,
    pub components: Pollutants,
    /// Epoch seconds.
    pub observed_at: i64,
}

/// A government-issued severe weather alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "sender_name", default)]
    pub sender: String,
    pub event: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "start")]
    pub start_time: i64,
    #[serde(rename = "end")]
    pub end_time: i64,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UvIndex {
    pub value: f64,
    #[serde(rename = "date")]
    pub observed_at: i64,
}

/// Composite result of one search.
///
/// `current` and `forecast` are always populated; the optional sources
/// degrade to `None` / empty on failure without failing the search.
/// `generation` identifies the search that produced the bundle so a frontend
/// issuing overlapping searches can discard superseded results.
#[derive(Debug, Clone)]
pub struct WeatherBundle {
    pub generation: u64,
    pub location: Location,
    pub current: CurrentConditions,
    pub forecast: Vec<ForecastSample>,
    pub air_quality: Option<AirQuality>,
    pub alerts: Vec<Alert>,
    pub uv_index: Option<UvIndex>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_deserializes_geocoding_entry() {
        let json = r#"{
            "name": "Nairobi",
            "lat": -1.2833,
            "lon": 36.8167,
            "country": "KE"
        }"#;
        let location: Location = serde_json::from_str(json).expect("valid entry");

        assert_eq!(location.name, "Nairobi");
        assert_eq!(location.country, "KE");
        assert!(location.state.is_none());
        assert!((location.latitude - -1.2833).abs() < 1e-9);
    }

    #[test]
    fn location_label_skips_empty_country() {
        let location = Location {
            name: "Somewhere".to_string(),
            country: String::new(),
            state: None,
            latitude: 0.0,
            longitude: 0.0,
        };
        assert_eq!(location.label(), "Somewhere");
    }

    #[test]
    fn forecast_sample_tolerates_missing_optionals() {
        let json = r#"{
            "dt": 1714557600,
            "main": {
                "temp": 18.2, "feels_like": 17.9,
                "temp_min": 16.0, "temp_max": 19.5,
                "pressure": 1013, "humidity": 64
            },
            "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}],
            "wind": {"speed": 3.4, "deg": 140}
        }"#;
        let sample: ForecastSample = serde_json::from_str(json).expect("valid sample");

        assert_eq!(sample.clouds.all, 0);
        assert!(sample.dt_txt.is_none());
        assert_eq!(
            sample.primary_condition().map(|c| c.main.as_str()),
            Some("Clouds")
        );
    }

    #[test]
    fn alert_renames_upstream_fields() {
        let json = r#"{
            "sender_name": "NWS Tulsa",
            "event": "Heat Advisory",
            "start": 1684952747,
            "end": 1684988747,
            "description": "HEAT ADVISORY REMAINS IN EFFECT",
            "tags": ["Extreme temperature value"]
        }"#;
        let alert: Alert = serde_json::from_str(json).expect("valid alert");

        assert_eq!(alert.sender, "NWS Tulsa");
        assert_eq!(alert.start_time, 1684952747);
        assert_eq!(alert.tags.len(), 1);
    }
}
