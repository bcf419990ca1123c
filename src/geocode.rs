use crate::error::{MarketError, Result};
use crate::models::GeoPoint;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Address resolved by the geocoding service
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAddress {
    /// Normalized formatted address, replaces the free-text input
    pub formatted: String,
    pub point: GeoPoint,
}

/// Free-text address lookup; zero results is an error, not an empty answer
#[async_trait]
pub trait GeocodeService: Send + Sync {
    async fn lookup(&self, address: &str) -> Result<ResolvedAddress>;
}

/// Geocoder speaking the usual lookup API: address in, a status plus a
/// result list out.
pub struct HttpGeocoder {
    http: Client,
    endpoint: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: Option<String>,
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Option<LatLng>,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: Option<f64>,
    lng: Option<f64>,
}

impl HttpGeocoder {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            api_key,
        })
    }
}

/// Pull a usable address out of the raw response, or reject it.
fn resolve(response: GeocodeResponse) -> Result<ResolvedAddress> {
    if response.status == "ZERO_RESULTS" || response.results.is_empty() {
        return Err(MarketError::Geocode("no results for address".into()));
    }

    let first = &response.results[0];

    // A missing or literal "undefined" echo means the service could not
    // actually resolve the input.
    let formatted = match first.formatted_address.as_deref() {
        Some(addr) if !addr.is_empty() && addr != "undefined" => addr.to_string(),
        _ => return Err(MarketError::Geocode("address could not be resolved".into())),
    };

    let location = first.geometry.as_ref().and_then(|g| g.location.as_ref());
    let point = GeoPoint {
        lat: location.and_then(|l| l.lat).unwrap_or(0.0),
        lng: location.and_then(|l| l.lng).unwrap_or(0.0),
    };

    Ok(ResolvedAddress { formatted, point })
}

#[async_trait]
impl GeocodeService for HttpGeocoder {
    async fn lookup(&self, address: &str) -> Result<ResolvedAddress> {
        debug!(address, "geocoding address");

        let mut query: Vec<(&str, &str)> = vec![("address", address)];
        if let Some(key) = &self.api_key {
            query.push(("key", key));
        }

        let resp = self
            .http
            .get(&self.endpoint)
            .query(&query)
            .send()
            .await
            .map_err(|e| MarketError::Geocode(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(MarketError::Geocode(format!(
                "geocoder returned {}",
                resp.status()
            )));
        }

        let body: GeocodeResponse = resp
            .json()
            .await
            .map_err(|e| MarketError::Geocode(e.to_string()))?;

        let resolved = resolve(body)?;
        debug!(formatted = %resolved.formatted, "address resolved");
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> GeocodeResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn zero_results_is_rejected() {
        let response = parse(json!({ "status": "ZERO_RESULTS", "results": [] }));
        assert!(matches!(resolve(response), Err(MarketError::Geocode(_))));
    }

    #[test]
    fn empty_result_list_is_rejected() {
        let response = parse(json!({ "status": "OK", "results": [] }));
        assert!(matches!(resolve(response), Err(MarketError::Geocode(_))));
    }

    #[test]
    fn undefined_address_echo_is_rejected() {
        let response = parse(json!({
            "status": "OK",
            "results": [{ "formatted_address": "undefined" }]
        }));
        assert!(matches!(resolve(response), Err(MarketError::Geocode(_))));
    }

    #[test]
    fn missing_coordinates_default_to_zero() {
        let response = parse(json!({
            "status": "OK",
            "results": [{ "formatted_address": "1 Main Street, Springfield" }]
        }));
        let resolved = resolve(response).unwrap();
        assert_eq!(resolved.formatted, "1 Main Street, Springfield");
        assert_eq!(resolved.point, GeoPoint { lat: 0.0, lng: 0.0 });
    }

    #[test]
    fn full_result_resolves() {
        let response = parse(json!({
            "status": "OK",
            "results": [{
                "formatted_address": "1 Main Street, Springfield",
                "geometry": { "location": { "lat": 12.5, "lng": -3.25 } }
            }]
        }));
        let resolved = resolve(response).unwrap();
        assert_eq!(resolved.point, GeoPoint { lat: 12.5, lng: -3.25 });
    }
}
