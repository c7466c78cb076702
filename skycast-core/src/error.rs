use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure taxonomy for the retrieval layer.
///
/// Required-source errors surface to the caller as a single human-readable
/// message; optional-source errors are caught at the aggregator boundary and
/// collapse to "no data".
#[derive(Debug, Error)]
pub enum Error {
    /// The geocoder had no match for the query, or the upstream returned 404
    /// for it.
    #[error("location \"{query}\" not found")]
    NotFound { query: String },

    /// Refused at construction time; the client never fails lazily on the
    /// first request instead.
    #[error("OpenWeather API key is not configured")]
    MissingApiKey,

    /// Upstream 401.
    #[error("invalid API key")]
    InvalidApiKey,

    /// Upstream rejected the request; carries the upstream `message` field
    /// when one was parseable, the raw body otherwise.
    #[error("weather service error: {message}")]
    Service { status: Option<u16>, message: String },

    /// The request never produced an HTTP status.
    #[error("failed to fetch weather data")]
    Transport(#[from] reqwest::Error),

    #[error("coordinates ({lat}, {lon}) are out of range")]
    InvalidCoordinates { lat: f64, lon: f64 },

    /// An optional data source had nothing for this location. Swallowed by
    /// the aggregator and logged, never shown to the user as an error.
    #[error("{0} data not available")]
    Unavailable(&'static str),
}
