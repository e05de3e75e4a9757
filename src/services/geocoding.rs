use crate::config::ClientConfig;
use crate::error::{AppError, Result};
use crate::models::Coordinates;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// Resolves a free-text place name to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` when the name does not resolve to any place.
    async fn geocode(&self, query: &str) -> Result<Option<Coordinates>>;
}

/// Geocoder backed by a Nominatim-compatible `/search` endpoint.
#[derive(Clone)]
pub struct NominatimClient {
    client: Client,
    base_url: String,
}

impl NominatimClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.geocoder_user_agent.clone())
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Geocoding(format!("Failed to build HTTP client: {}", e)))?;

        Ok(NominatimClient {
            client,
            base_url: config.geocoder_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn geocode(&self, query: &str) -> Result<Option<Coordinates>> {
        let url = format!("{}/search", self.base_url);
        tracing::debug!(query = %query, "Geocoding '{}'", query);

        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| AppError::Geocoding(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(status = %status, "Geocoder HTTP error {}: {}", status, error_text);
            return Err(AppError::Geocoding(format!("HTTP {}: {}", status, error_text)));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| AppError::Geocoding(format!("Failed to parse response: {}", e)))?;

        match places.first() {
            Some(place) => {
                let coordinates = place.coordinates()?;
                tracing::debug!(
                    lat = coordinates.lat,
                    lng = coordinates.lng,
                    "Resolved '{}' to {}",
                    query,
                    place.display_name
                );
                Ok(Some(coordinates))
            }
            None => {
                tracing::info!("No geocoding result for '{}'", query);
                Ok(None)
            }
        }
    }
}

// Nominatim response types

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String, // decimal degrees as text
    lon: String,
    #[serde(default)]
    display_name: String,
}

impl NominatimPlace {
    fn coordinates(&self) -> Result<Coordinates> {
        let lat: f64 = self
            .lat
            .parse()
            .map_err(|_| AppError::Geocoding(format!("Invalid latitude '{}'", self.lat)))?;
        let lng: f64 = self
            .lon
            .parse()
            .map_err(|_| AppError::Geocoding(format!("Invalid longitude '{}'", self.lon)))?;
        Coordinates::new(lat, lng).map_err(AppError::Geocoding)
    }
}
