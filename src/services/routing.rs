// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OpenRouteService client for geocoding and route summaries.
//!
//! Handles:
//! - Geocoding free-text places to coordinates
//! - Directions summaries (distance/duration) per travel mode
//!
//! Provider numbers are untrusted: negative or non-finite values become 0.

use crate::error::AppError;
use crate::models::TravelMode;
use crate::rounding::{non_negative_or_zero, round_dp};
use serde::Deserialize;

/// Profile used for modes ORS has no dedicated profile for.
const FALLBACK_PROFILE: &str = "driving-car";

/// Distance and duration for one routed itinerary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteLeg {
    pub distance_km: f64,
    pub duration_min: f64,
}

/// OpenRouteService API client.
#[derive(Clone)]
pub struct RoutingClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl RoutingClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key,
        }
    }

    fn api_key(&self) -> Result<&str, AppError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AppError::Upstream("ORS_API_KEY not set on server".to_string()))
    }

    /// Route from `origin` to `destination` for `mode`.
    pub async fn route(
        &self,
        origin: &str,
        destination: &str,
        mode: TravelMode,
    ) -> Result<RouteLeg, AppError> {
        let (from, to) = tokio::try_join!(self.geocode(origin), self.geocode(destination))?;
        self.directions(from, to, mode).await
    }

    /// Route the same trip for two modes, geocoding each place once.
    pub async fn route_pair(
        &self,
        origin: &str,
        destination: &str,
        mode_a: TravelMode,
        mode_b: TravelMode,
    ) -> Result<(RouteLeg, RouteLeg), AppError> {
        let (from, to) = tokio::try_join!(self.geocode(origin), self.geocode(destination))?;
        tokio::try_join!(
            self.directions(from, to, mode_a),
            self.directions(from, to, mode_b),
        )
    }

    /// Directions summary between two `[lon, lat]` points.
    pub async fn directions(
        &self,
        from: [f64; 2],
        to: [f64; 2],
        mode: TravelMode,
    ) -> Result<RouteLeg, AppError> {
        let profile = mode.ors_profile().unwrap_or(FALLBACK_PROFILE);

        tracing::debug!(?from, ?to, %mode, profile, "Requesting ORS directions");

        let url = format!("{}/v2/directions/{}", self.base_url, profile);
        let body = serde_json::json!({ "coordinates": [from, to] });

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, self.api_key()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        let directions: DirectionsResponse = self.check_response_json(response).await?;
        let summary = directions
            .routes
            .into_iter()
            .next()
            .map(|r| r.summary)
            .ok_or_else(|| AppError::NotFound("No route returned from ORS".to_string()))?;

        Ok(summary.into_leg())
    }

    /// Resolve a place name to `[lon, lat]`.
    pub async fn geocode(&self, place: &str) -> Result<[f64; 2], AppError> {
        let url = format!("{}/geocode/search", self.base_url);

        let response = self
            .http
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, self.api_key()?)
            .query(&[("text", place), ("size", "1")])
            .send()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        let geocode: GeocodeResponse = self.check_response_json(response).await?;
        geocode
            .features
            .into_iter()
            .next()
            .map(|f| f.geometry.coordinates)
            .ok_or_else(|| AppError::NotFound(format!("Location not found: {}", place)))
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                tracing::warn!("ORS rate limit hit (429)");
            }

            return Err(AppError::Upstream(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("JSON parse error: {}", e)))
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    features: Vec<GeocodeFeature>,
}

#[derive(Debug, Deserialize)]
struct GeocodeFeature {
    geometry: PointGeometry,
}

#[derive(Debug, Deserialize)]
struct PointGeometry {
    coordinates: [f64; 2],
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    summary: RouteSummary,
}

/// ORS summary in meters and seconds. Either field may be absent for
/// zero-length routes.
#[derive(Debug, Deserialize)]
struct RouteSummary {
    distance: Option<f64>,
    duration: Option<f64>,
}

impl RouteSummary {
    fn into_leg(self) -> RouteLeg {
        RouteLeg {
            distance_km: round_dp(non_negative_or_zero(self.distance) / 1000.0, 2),
            duration_min: round_dp(non_negative_or_zero(self.duration) / 60.0, 2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_converts_units() {
        let summary: RouteSummary =
            serde_json::from_str(r#"{"distance": 12340.0, "duration": 1530.0}"#).unwrap();
        assert_eq!(
            summary.into_leg(),
            RouteLeg {
                distance_km: 12.34,
                duration_min: 25.5
            }
        );
    }

    #[test]
    fn test_summary_missing_fields_are_zero() {
        let summary: RouteSummary = serde_json::from_str("{}").unwrap();
        assert_eq!(
            summary.into_leg(),
            RouteLeg {
                distance_km: 0.0,
                duration_min: 0.0
            }
        );
    }

    #[test]
    fn test_summary_negative_distance_clamped() {
        let summary = RouteSummary {
            distance: Some(-500.0),
            duration: Some(60.0),
        };
        assert_eq!(summary.into_leg().distance_km, 0.0);
    }

    #[tokio::test]
    async fn test_missing_api_key_is_upstream_error() {
        let client = RoutingClient::new("http://127.0.0.1:9", None);
        let err = client.geocode("Pune").await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }
}
