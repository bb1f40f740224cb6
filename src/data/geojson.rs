use crate::core::geo::{LatLng, LatLngBounds};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// GeoJSON geometry types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    Point {
        coordinates: [f64; 2],
    },
    LineString {
        coordinates: Vec<[f64; 2]>,
    },
    Polygon {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPoint {
        coordinates: Vec<[f64; 2]>,
    },
    MultiLineString {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<[f64; 2]>>>,
    },
    GeometryCollection {
        geometries: Vec<GeoJsonGeometry>,
    },
}

/// GeoJSON feature with geometry and properties
///
/// Properties keep insertion order irrelevant for lookups but attribute
/// tables need a deterministic column order, so they are stored sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonFeature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    pub geometry: Option<GeoJsonGeometry>,
    pub properties: Option<BTreeMap<String, serde_json::Value>>,
}

/// Root GeoJSON object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJson {
    Feature(GeoJsonFeature),
    FeatureCollection { features: Vec<GeoJsonFeature> },
    Geometry(GeoJsonGeometry),
}

impl GeoJson {
    /// Parses a GeoJSON document from its textual form
    pub fn from_str(geojson_str: &str) -> crate::Result<Self> {
        serde_json::from_str(geojson_str)
            .map_err(|e| crate::Error::ParseError(format!("Invalid GeoJSON: {}", e)))
    }

    /// An empty feature collection
    pub fn empty() -> Self {
        GeoJson::FeatureCollection {
            features: Vec::new(),
        }
    }

    /// All features contained in this document, in order
    pub fn features(&self) -> Vec<&GeoJsonFeature> {
        match self {
            GeoJson::Feature(feature) => vec![feature],
            GeoJson::FeatureCollection { features } => features.iter().collect(),
            // Bare geometries carry no feature wrapper to hand out
            GeoJson::Geometry(_) => Vec::new(),
        }
    }

    /// The first feature, if any
    pub fn first_feature(&self) -> Option<&GeoJsonFeature> {
        self.features().into_iter().next()
    }

    /// Gets the bounding box of all features
    pub fn bounds(&self) -> Option<LatLngBounds> {
        let mut bounds: Option<LatLngBounds> = None;

        for feature in self.features() {
            if let Some(geometry) = &feature.geometry {
                if let Some(geom_bounds) = geometry.bounds() {
                    bounds = Some(match bounds {
                        Some(b) => b.union(&geom_bounds),
                        None => geom_bounds,
                    });
                }
            }
        }

        bounds
    }
}

impl GeoJsonFeature {
    /// Name of the geometry type, as shown in attribute tables
    pub fn geometry_type(&self) -> &'static str {
        match &self.geometry {
            Some(GeoJsonGeometry::Point { .. }) => "Point",
            Some(GeoJsonGeometry::LineString { .. }) => "LineString",
            Some(GeoJsonGeometry::Polygon { .. }) => "Polygon",
            Some(GeoJsonGeometry::MultiPoint { .. }) => "MultiPoint",
            Some(GeoJsonGeometry::MultiLineString { .. }) => "MultiLineString",
            Some(GeoJsonGeometry::MultiPolygon { .. }) => "MultiPolygon",
            Some(GeoJsonGeometry::GeometryCollection { .. }) => "GeometryCollection",
            None => "N/A",
        }
    }

    /// A property rendered as plain text; strings lose their quotes, other
    /// JSON values keep their serialized form, missing values are empty.
    pub fn property_text(&self, key: &str) -> String {
        match self.properties.as_ref().and_then(|p| p.get(key)) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(value) => value.to_string(),
            None => String::new(),
        }
    }

    /// A string property, if present and a string
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties
            .as_ref()
            .and_then(|p| p.get(key))
            .and_then(|v| v.as_str())
    }
}

impl GeoJsonGeometry {
    /// Converts coordinates to LatLng points
    pub fn to_lat_lng_points(&self) -> Vec<LatLng> {
        match self {
            GeoJsonGeometry::Point { coordinates } => {
                vec![LatLng::new(coordinates[1], coordinates[0])]
            }
            GeoJsonGeometry::LineString { coordinates }
            | GeoJsonGeometry::MultiPoint { coordinates } => coordinates
                .iter()
                .map(|c| LatLng::new(c[1], c[0]))
                .collect(),
            GeoJsonGeometry::Polygon { coordinates }
            | GeoJsonGeometry::MultiLineString { coordinates } => coordinates
                .iter()
                .flatten()
                .map(|c| LatLng::new(c[1], c[0]))
                .collect(),
            GeoJsonGeometry::MultiPolygon { coordinates } => coordinates
                .iter()
                .flatten()
                .flatten()
                .map(|c| LatLng::new(c[1], c[0]))
                .collect(),
            GeoJsonGeometry::GeometryCollection { geometries } => geometries
                .iter()
                .flat_map(|geom| geom.to_lat_lng_points())
                .collect(),
        }
    }

    /// Gets the bounding box of the geometry
    pub fn bounds(&self) -> Option<LatLngBounds> {
        LatLngBounds::from_points(&self.to_lat_lng_points())
    }
}

/// Style information for rendering features; the renderer decides how to
/// interpret it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureStyle {
    pub stroke: String,
    pub stroke_width: f64,
    pub stroke_opacity: f64,
    pub fill: String,
    pub fill_opacity: f64,
    pub marker_radius: f64,
}

impl Default for FeatureStyle {
    fn default() -> Self {
        Self {
            stroke: "#FF8000".to_string(),
            stroke_width: 7.0,
            stroke_opacity: 1.0,
            fill: "#FD831E".to_string(),
            fill_opacity: 1.0,
            marker_radius: 8.0,
        }
    }
}

impl FeatureStyle {
    /// The style applied to map features mirrored from selected table rows
    pub fn highlight() -> Self {
        Self {
            stroke: "#ffff00".to_string(),
            stroke_width: 5.0,
            stroke_opacity: 1.0,
            fill: "#ffff00".to_string(),
            fill_opacity: 0.6,
            marker_radius: 8.0,
        }
    }

    /// The style applied to route start/end point markers
    pub fn route_marker(fill: &str) -> Self {
        Self {
            stroke: "#000".to_string(),
            stroke_width: 1.0,
            stroke_opacity: 1.0,
            fill: fill.to_string(),
            fill_opacity: 0.8,
            marker_radius: 8.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geojson_parsing() {
        let geojson_str = r#"
        {
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {"postcode": "400656", "city": "Cluj-Napoca"},
                    "geometry": {
                        "type": "Point",
                        "coordinates": [23.6031, 46.7633]
                    }
                }
            ]
        }
        "#;

        let data = GeoJson::from_str(geojson_str).unwrap();
        let features = data.features();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].property_str("postcode"), Some("400656"));
        assert_eq!(features[0].geometry_type(), "Point");
    }

    #[test]
    fn test_invalid_geojson_is_a_parse_error() {
        let result = GeoJson::from_str("{not valid json");
        assert!(matches!(result, Err(crate::Error::ParseError(_))));
    }

    #[test]
    fn test_bounds_calculation() {
        let geojson = GeoJson::FeatureCollection {
            features: vec![
                GeoJsonFeature {
                    id: None,
                    properties: None,
                    geometry: Some(GeoJsonGeometry::Point {
                        coordinates: [23.6031, 46.7633],
                    }),
                },
                GeoJsonFeature {
                    id: None,
                    properties: None,
                    geometry: Some(GeoJsonGeometry::Point {
                        coordinates: [23.5895, 46.7712],
                    }),
                },
            ],
        };

        let bounds = geojson.bounds().unwrap();
        assert_eq!(bounds.south_west.lat, 46.7633);
        assert_eq!(bounds.north_east.lat, 46.7712);
    }

    #[test]
    fn test_property_text_formats() {
        let feature = GeoJsonFeature {
            id: None,
            geometry: None,
            properties: Some(
                [
                    ("name".to_string(), serde_json::json!("Strada Câmpului")),
                    ("length".to_string(), serde_json::json!(1204.5)),
                ]
                .into_iter()
                .collect(),
            ),
        };

        assert_eq!(feature.property_text("name"), "Strada Câmpului");
        assert_eq!(feature.property_text("length"), "1204.5");
        assert_eq!(feature.property_text("missing"), "");
    }
}
