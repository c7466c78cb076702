//! Location resolution: free-text queries and coordinate pairs to a
//! canonical [`Location`].
//!
//! The upstream geocoder ranks its own candidates; `resolve` trusts that
//! ranking and takes the first match.

use crate::client::OpenWeatherClient;
use crate::error::{Error, Result};
use crate::model::Location;

impl OpenWeatherClient {
    /// Resolve a free-text place name to its best-ranked location.
    ///
    /// An empty query and a query with zero matches both fail with
    /// [`Error::NotFound`].
    pub async fn resolve(&self, query: &str) -> Result<Location> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::NotFound {
                query: query.to_string(),
            });
        }

        let mut matches = self.search_locations(query, 1).await?;
        if matches.is_empty() {
            return Err(Error::NotFound {
                query: query.to_string(),
            });
        }

        Ok(matches.swap_remove(0))
    }

    /// All geocoding candidates for a query, up to `limit`, in upstream rank
    /// order. An empty query yields no candidates without a network call.
    pub async fn search_locations(&self, query: &str, limit: u8) -> Result<Vec<Location>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.geo_endpoint("direct");
        let limit = limit.to_string();
        self.get_json(&url, &[("q", query), ("limit", &limit)]).await
    }

    /// Reverse-geocode device-provided coordinates to a place.
    pub async fn resolve_from_coordinates(&self, lat: f64, lon: f64) -> Result<Location> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(Error::InvalidCoordinates { lat, lon });
        }

        let url = self.geo_endpoint("reverse");
        let (lat_s, lon_s) = (lat.to_string(), lon.to_string());
        let matches: Vec<Location> = self
            .get_json(&url, &[("lat", &lat_s), ("lon", &lon_s)])
            .await?;

        matches.into_iter().next().ok_or_else(|| Error::NotFound {
            query: format!("{lat:.4},{lon:.4}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> OpenWeatherClient {
        OpenWeatherClient::with_base_url("test-key", &server.uri()).expect("client")
    }

    fn offline_client() -> OpenWeatherClient {
        // Never contacted by the cases that use it.
        OpenWeatherClient::with_base_url("test-key", "http://127.0.0.1:9").expect("client")
    }

    #[tokio::test]
    async fn resolve_returns_first_ranked_match_in_valid_ranges() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .and(query_param("q", "Nairobi"))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"name": "Nairobi", "lat": -1.2833, "lon": 36.8167, "country": "KE"}
            ])))
            .mount(&server)
            .await;

        let location = test_client(&server).resolve("Nairobi").await.expect("match");

        assert_eq!(location.name, "Nairobi");
        assert!((-90.0..=90.0).contains(&location.latitude));
        assert!((-180.0..=180.0).contains(&location.longitude));
    }

    #[tokio::test]
    async fn resolve_empty_query_fails_without_network() {
        let err = offline_client().resolve("   ").await.expect_err("must fail");
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[tokio::test]
    async fn resolve_zero_matches_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let err = test_client(&server)
            .resolve("Atlantis")
            .await
            .expect_err("must fail");

        assert!(err.to_string().contains("Atlantis"));
    }

    #[tokio::test]
    async fn search_locations_returns_candidates_in_rank_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .and(query_param("limit", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"name": "Springfield", "lat": 39.80, "lon": -89.64, "country": "US", "state": "Illinois"},
                {"name": "Springfield", "lat": 42.10, "lon": -72.59, "country": "US", "state": "Massachusetts"}
            ])))
            .mount(&server)
            .await;

        let matches = test_client(&server)
            .search_locations("Springfield", 5)
            .await
            .expect("candidates");

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].state.as_deref(), Some("Illinois"));
    }

    #[tokio::test]
    async fn search_locations_empty_query_short_circuits() {
        let matches = offline_client()
            .search_locations("", 5)
            .await
            .expect("no candidates");
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn reverse_geocode_rejects_out_of_range_coordinates() {
        let err = offline_client()
            .resolve_from_coordinates(-91.0, 10.0)
            .await
            .expect_err("must fail");
        assert!(matches!(err, Error::InvalidCoordinates { .. }));

        let err = offline_client()
            .resolve_from_coordinates(10.0, 181.0)
            .await
            .expect_err("must fail");
        assert!(matches!(err, Error::InvalidCoordinates { .. }));
    }

    #[tokio::test]
    async fn reverse_geocode_returns_place_for_coordinates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/reverse"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"name": "Nairobi", "lat": -1.2833, "lon": 36.8167, "country": "KE"}
            ])))
            .mount(&server)
            .await;

        let location = test_client(&server)
            .resolve_from_coordinates(-1.2833, 36.8167)
            .await
            .expect("place");

        assert_eq!(location.label(), "Nairobi, KE");
    }
}
