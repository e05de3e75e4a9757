use geo::{Distance, Geodesic, Point};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Result<Self, String> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(format!(
                "Invalid latitude: {} (must be between -90 and 90)",
                lat
            ));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(format!(
                "Invalid longitude: {} (must be between -180 and 180)",
                lng
            ));
        }
        Ok(Coordinates { lat, lng })
    }

    /// Geodesic distance on the WGS-84 ellipsoid, in kilometers
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        Geodesic.distance(self.to_point(), other.to_point()) / 1000.0
    }

    /// Point halfway between the two coordinates in lat/lng space
    pub fn midpoint(&self, other: &Coordinates) -> Coordinates {
        Coordinates {
            lat: (self.lat + other.lat) / 2.0,
            lng: (self.lng + other.lng) / 2.0,
        }
    }

    fn to_point(self) -> Point<f64> {
        // geo points are (x = lng, y = lat)
        Point::new(self.lng, self.lat)
    }
}
