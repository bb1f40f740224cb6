use serde::{Deserialize, Serialize};

/// WGS84 equatorial earth radius in meters
const EARTH_RADIUS: f64 = 6378137.0;

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }

    /// Calculates the distance to another LatLng using the Haversine formula
    pub fn distance_to(&self, other: &LatLng) -> f64 {
        let lat1_rad = self.lat.to_radians();
        let lat2_rad = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lng = (other.lng - self.lng).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS * c
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a point in screen or projected coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a bounding box of geographical coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Creates bounds from individual coordinates
    pub fn from_coords(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self::new(LatLng::new(south, west), LatLng::new(north, east))
    }

    /// Creates the minimal bounds covering all given points
    pub fn from_points(points: &[LatLng]) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = Self::new(*first, *first);
        for point in &points[1..] {
            bounds.extend(point);
        }
        Some(bounds)
    }

    /// Checks if the bounds contain a point
    pub fn contains(&self, point: &LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }

    /// Checks if the bounds intersect with another bounds
    pub fn intersects(&self, other: &LatLngBounds) -> bool {
        !(other.north_east.lat < self.south_west.lat
            || other.south_west.lat > self.north_east.lat
            || other.north_east.lng < self.south_west.lng
            || other.south_west.lng > self.north_east.lng)
    }

    /// Extends the bounds to include a point
    pub fn extend(&mut self, point: &LatLng) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }

    /// Gets the center point of the bounds
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }

    /// Returns the union of this bounds with another bounds
    pub fn union(&self, other: &LatLngBounds) -> LatLngBounds {
        let south = self.south_west.lat.min(other.south_west.lat);
        let west = self.south_west.lng.min(other.south_west.lng);
        let north = self.north_east.lat.max(other.north_east.lat);
        let east = self.north_east.lng.max(other.north_east.lng);

        LatLngBounds::new(LatLng::new(south, west), LatLng::new(north, east))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lat_lng_creation() {
        let coord = LatLng::new(46.7633, 23.6031);
        assert_eq!(coord.lat, 46.7633);
        assert_eq!(coord.lng, 23.6031);
        assert!(coord.is_valid());
    }

    #[test]
    fn test_lat_lng_distance() {
        let cluj = LatLng::new(46.7712, 23.6236);
        let bucharest = LatLng::new(44.4268, 26.1025);

        // Roughly 324 km between the two city centers
        let distance = cluj.distance_to(&bucharest);
        assert!((distance - 324000.0).abs() < 10000.0);
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = LatLngBounds::from_coords(46.0, 23.0, 47.0, 24.0);
        let inside = LatLng::new(46.5, 23.5);
        let outside = LatLng::new(48.0, 23.5);

        assert!(bounds.contains(&inside));
        assert!(!bounds.contains(&outside));
    }

    #[test]
    fn test_bounds_from_points() {
        let points = vec![
            LatLng::new(46.0, 23.5),
            LatLng::new(46.8, 23.1),
            LatLng::new(46.4, 23.9),
        ];
        let bounds = LatLngBounds::from_points(&points).unwrap();
        assert_eq!(bounds.south_west.lat, 46.0);
        assert_eq!(bounds.south_west.lng, 23.1);
        assert_eq!(bounds.north_east.lat, 46.8);
        assert_eq!(bounds.north_east.lng, 23.9);

        assert!(LatLngBounds::from_points(&[]).is_none());
    }
}
