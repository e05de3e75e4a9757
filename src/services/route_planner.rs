use crate::error::{AppError, Result};
use crate::models::{Coordinates, PredictionResult, TripAttributes, TripParameters};
use crate::services::geocoding::Geocoder;
use crate::services::prediction_client::PredictionClient;
use std::sync::Arc;

/// Two resolved places and the geodesic distance between them.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRoute {
    pub from: String,
    pub to: String,
    pub from_coordinates: Coordinates,
    pub to_coordinates: Coordinates,
    pub distance_km: f64,
}

/// A priced route, ready to be rendered.
#[derive(Debug, Clone)]
pub struct RouteEstimate {
    pub route: ResolvedRoute,
    pub trip: TripAttributes,
    pub prediction: PredictionResult,
}

/// Route mode: geocode two place names, measure the distance between them
/// and price the trip with that distance.
pub struct RoutePlanner {
    geocoder: Arc<dyn Geocoder>,
}

impl RoutePlanner {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        RoutePlanner { geocoder }
    }

    /// Geocode both places. Fails with every name that did not resolve.
    pub async fn resolve(&self, from: &str, to: &str) -> Result<ResolvedRoute> {
        let from_coordinates = self.geocoder.geocode(from).await?;
        let to_coordinates = self.geocoder.geocode(to).await?;

        match (from_coordinates, to_coordinates) {
            (Some(from_coordinates), Some(to_coordinates)) => {
                let distance_km = from_coordinates.distance_to(&to_coordinates);
                tracing::info!(
                    distance_km = %format!("{:.2}", distance_km),
                    "Route {} -> {}: {:.2}km",
                    from,
                    to,
                    distance_km
                );
                Ok(ResolvedRoute {
                    from: from.to_string(),
                    to: to.to_string(),
                    from_coordinates,
                    to_coordinates,
                    distance_km,
                })
            }
            (from_coordinates, to_coordinates) => {
                let mut missing = Vec::new();
                if from_coordinates.is_none() {
                    missing.push(from.to_string());
                }
                if to_coordinates.is_none() {
                    missing.push(to.to_string());
                }
                Err(AppError::LocationNotFound(missing))
            }
        }
    }

    /// Resolve the route, then price it. The prediction service is never
    /// called when either place fails to resolve.
    pub async fn estimate(
        &self,
        from: &str,
        to: &str,
        parameters: &TripParameters,
        client: &PredictionClient,
    ) -> Result<RouteEstimate> {
        let route = self.resolve(from, to).await?;
        let trip = parameters.with_distance(route.distance_km);
        let prediction = client.predict(&trip).await?;

        Ok(RouteEstimate {
            route,
            trip,
            prediction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct FixedGeocoder(HashMap<&'static str, Coordinates>);

    #[async_trait]
    impl Geocoder for FixedGeocoder {
        async fn geocode(&self, query: &str) -> Result<Option<Coordinates>> {
            Ok(self.0.get(query).copied())
        }
    }

    fn planner() -> RoutePlanner {
        let mut places = HashMap::new();
        places.insert("Equator", Coordinates::new(0.0, 0.0).unwrap());
        places.insert("North", Coordinates::new(1.0, 0.0).unwrap());
        RoutePlanner::new(Arc::new(FixedGeocoder(places)))
    }

    #[tokio::test]
    async fn test_resolve_measures_distance() {
        let route = planner().resolve("Equator", "North").await.unwrap();
        assert!((route.distance_km - 110.57).abs() < 0.1);
        assert_eq!(route.from, "Equator");
    }

    #[tokio::test]
    async fn test_unresolved_names_are_reported() {
        let err = planner().resolve("Atlantis", "Lemuria").await.unwrap_err();
        match err {
            AppError::LocationNotFound(names) => assert_eq!(names, vec!["Atlantis", "Lemuria"]),
            other => panic!("expected LocationNotFound, got {:?}", other),
        }

        let err = planner().resolve("Equator", "Lemuria").await.unwrap_err();
        assert!(matches!(err, AppError::LocationNotFound(ref names) if names == &["Lemuria"]));
    }

    #[tokio::test]
    async fn test_estimate_skips_prediction_when_unresolved() {
        // Nothing listens on this address; reaching predict would be a Connection error
        let config = ClientConfig {
            predict_api_url: "http://127.0.0.1:9".to_string(),
            ..ClientConfig::default()
        };
        let client = PredictionClient::new(&config).unwrap();
        let err = planner()
            .estimate("Equator", "Atlantis", &TripParameters::default(), &client)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::LocationNotFound(_)));
    }
}
