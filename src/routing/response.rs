use crate::data::geojson::{FeatureStyle, GeoJson, GeoJsonFeature};
use crate::{Error, Result};
use serde::Deserialize;

/// Leg colors for multiple-destination routes
pub const MULTI_ROUTE_COLORS: [&str; 6] = [
    "#ff7800", "#0078ff", "#00ff78", "#ff0078", "#7800ff", "#78ff00",
];

/// Sequential leg colors for round trips
pub const ROUND_TRIP_COLORS: [&str; 7] = [
    "#ff4444", "#ff8800", "#ffbb00", "#88ff00", "#00ff88", "#0088ff", "#4400ff",
];

/// Raw response body; the backend signals variants through boolean flags and
/// embeds GeoJSON documents as strings.
#[derive(Debug, Deserialize)]
struct WireResponse {
    error: Option<String>,
    start: Option<String>,
    #[serde(default)]
    routes: Vec<WireLeg>,
    #[serde(default)]
    is_multiple: bool,
    #[serde(default)]
    is_roundtrip: bool,
    total_distance: Option<f64>,
    waypoint_sequence: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireLeg {
    end: String,
    route: String,
}

/// One destination of a route query: the end point and the route geometry
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLeg {
    pub end: GeoJson,
    pub route: GeoJson,
}

impl RouteLeg {
    fn from_wire(leg: WireLeg) -> Result<Self> {
        Ok(Self {
            end: GeoJson::from_str(&leg.end)?,
            route: GeoJson::from_str(&leg.route)?,
        })
    }

    /// The feature mirrored when this leg's table row is selected: the route
    /// geometry when present, the end point otherwise
    pub fn feature(&self) -> Option<&GeoJsonFeature> {
        self.route.first_feature().or_else(|| self.end.first_feature())
    }

    /// A route property as table text, with the backend's fallback value
    pub fn property_or(&self, key: &str, fallback: &str) -> String {
        let text = self
            .route
            .first_feature()
            .map(|f| f.property_text(key))
            .unwrap_or_default();
        if text.is_empty() {
            fallback.to_string()
        } else {
            text
        }
    }
}

/// A routing result, decoded from the backend's flag-driven wire shape into
/// an explicit variant carrying only the fields valid for it.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteResponse {
    /// One origin, one destination
    Single { start: GeoJson, leg: RouteLeg },
    /// One origin, several independent destinations
    Multi { start: GeoJson, legs: Vec<RouteLeg> },
    /// A circular tour visiting every waypoint and returning to the origin
    RoundTrip {
        start: GeoJson,
        legs: Vec<RouteLeg>,
        total_distance: f64,
        waypoint_sequence: String,
    },
}

impl RouteResponse {
    /// Decodes a backend response body.
    ///
    /// A malformed leg is logged and skipped without aborting its siblings;
    /// an `error` field in the body becomes an `Err`.
    pub fn from_wire(value: serde_json::Value) -> Result<Self> {
        let wire: WireResponse = serde_json::from_value(value)?;

        if let Some(error) = wire.error {
            return Err(Error::Routing(error));
        }

        let start = GeoJson::from_str(
            &wire
                .start
                .ok_or_else(|| Error::Routing("response has no start point".to_string()))?,
        )?;

        let legs: Vec<RouteLeg> = wire
            .routes
            .into_iter()
            .enumerate()
            .filter_map(|(index, leg)| match RouteLeg::from_wire(leg) {
                Ok(leg) => Some(leg),
                Err(e) => {
                    log::error!("skipping malformed route leg {}: {}", index + 1, e);
                    None
                }
            })
            .collect();

        if wire.is_roundtrip {
            Ok(RouteResponse::RoundTrip {
                start,
                legs,
                total_distance: wire.total_distance.unwrap_or(0.0),
                waypoint_sequence: wire
                    .waypoint_sequence
                    .unwrap_or_else(|| "Round Trip".to_string()),
            })
        } else if wire.is_multiple {
            Ok(RouteResponse::Multi { start, legs })
        } else {
            let leg = legs
                .into_iter()
                .next()
                .ok_or_else(|| Error::Routing("response has no routes".to_string()))?;
            Ok(RouteResponse::Single { start, leg })
        }
    }

    pub fn start(&self) -> &GeoJson {
        match self {
            RouteResponse::Single { start, .. }
            | RouteResponse::Multi { start, .. }
            | RouteResponse::RoundTrip { start, .. } => start,
        }
    }

    pub fn legs(&self) -> &[RouteLeg] {
        match self {
            RouteResponse::Single { leg, .. } => std::slice::from_ref(leg),
            RouteResponse::Multi { legs, .. } | RouteResponse::RoundTrip { legs, .. } => legs,
        }
    }

    /// Overlay-control name for the layer built from this response
    pub fn layer_name(&self) -> String {
        match self {
            RouteResponse::Single { .. } => "Routes".to_string(),
            RouteResponse::Multi { .. } => "Multiple Routes".to_string(),
            RouteResponse::RoundTrip {
                waypoint_sequence, ..
            } => waypoint_sequence.clone(),
        }
    }

    /// Title of the result table built from this response
    pub fn table_title(&self) -> String {
        match self {
            RouteResponse::Single { .. } => "Route Results".to_string(),
            RouteResponse::Multi { .. } => "Multiple Routes Results".to_string(),
            RouteResponse::RoundTrip { total_distance, .. } => {
                format!("Round Trip: {}m total", total_distance)
            }
        }
    }

    /// Stroke color for the given leg, cycling the variant's palette
    pub fn leg_color(&self, index: usize) -> &'static str {
        match self {
            RouteResponse::RoundTrip { .. } => ROUND_TRIP_COLORS[index % ROUND_TRIP_COLORS.len()],
            _ => MULTI_ROUTE_COLORS[index % MULTI_ROUTE_COLORS.len()],
        }
    }

    /// Render style for the given leg's route line
    pub fn leg_style(&self, index: usize) -> FeatureStyle {
        let roundtrip = matches!(self, RouteResponse::RoundTrip { .. });
        FeatureStyle {
            stroke: self.leg_color(index).to_string(),
            stroke_width: if roundtrip { 5.0 } else { 4.0 },
            stroke_opacity: if roundtrip { 0.9 } else { 0.8 },
            ..FeatureStyle::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point_doc() -> String {
        r#"{"type":"FeatureCollection","features":[{"type":"Feature","geometry":{"type":"Point","coordinates":[23.6,46.77]},"properties":{}}]}"#
            .to_string()
    }

    fn route_doc(postcode: &str, length: f64) -> String {
        format!(
            r#"{{"type":"FeatureCollection","features":[{{"type":"Feature","geometry":{{"type":"LineString","coordinates":[[23.6,46.77],[23.61,46.78]]}},"properties":{{"address":"Strada Câmpului","city":"Cluj-Napoca","postcode":"{}","length":{:?}}}}}]}}"#,
            postcode, length
        )
    }

    fn wire(is_multiple: bool, is_roundtrip: bool, legs: usize) -> serde_json::Value {
        let routes: Vec<serde_json::Value> = (0..legs)
            .map(|i| {
                serde_json::json!({
                    "end": point_doc(),
                    "route": route_doc(&format!("40000{}", i), 100.0 + i as f64),
                })
            })
            .collect();

        let mut body = serde_json::json!({
            "start": point_doc(),
            "routes": routes,
            "routes_html": "<table></table>",
            "is_multiple": is_multiple,
        });
        if is_roundtrip {
            body["is_roundtrip"] = serde_json::json!(true);
            body["total_distance"] = serde_json::json!(1234.5);
            body["waypoint_sequence"] = serde_json::json!("400001 → 400656 → 400001");
        }
        body
    }

    #[test]
    fn test_single_route_decodes() {
        let response = RouteResponse::from_wire(wire(false, false, 1)).unwrap();
        assert!(matches!(response, RouteResponse::Single { .. }));
        assert_eq!(response.legs().len(), 1);
        assert_eq!(response.layer_name(), "Routes");
        assert_eq!(response.table_title(), "Route Results");
    }

    #[test]
    fn test_multi_route_decodes() {
        let response = RouteResponse::from_wire(wire(true, false, 3)).unwrap();
        assert!(matches!(response, RouteResponse::Multi { .. }));
        assert_eq!(response.legs().len(), 3);
        assert_eq!(response.layer_name(), "Multiple Routes");
    }

    #[test]
    fn test_roundtrip_decodes_with_metadata() {
        let response = RouteResponse::from_wire(wire(true, true, 2)).unwrap();
        match &response {
            RouteResponse::RoundTrip {
                total_distance,
                waypoint_sequence,
                legs,
                ..
            } => {
                assert_eq!(*total_distance, 1234.5);
                assert_eq!(waypoint_sequence, "400001 → 400656 → 400001");
                assert_eq!(legs.len(), 2);
            }
            other => panic!("expected round trip, got {:?}", other),
        }
        assert_eq!(response.table_title(), "Round Trip: 1234.5m total");
    }

    #[test]
    fn test_malformed_leg_is_skipped() {
        let mut body = wire(true, false, 2);
        body["routes"][0]["route"] = serde_json::json!("{broken");
        let response = RouteResponse::from_wire(body).unwrap();
        assert_eq!(response.legs().len(), 1);
    }

    #[test]
    fn test_error_body_becomes_err() {
        let body = serde_json::json!({"error": "Start postcode 999999 not found"});
        let result = RouteResponse::from_wire(body);
        match result {
            Err(Error::Routing(message)) => {
                assert_eq!(message, "Start postcode 999999 not found")
            }
            other => panic!("expected routing error, got {:?}", other),
        }
    }

    #[test]
    fn test_leg_table_properties() {
        let response = RouteResponse::from_wire(wire(false, false, 1)).unwrap();
        let leg = &response.legs()[0];
        assert_eq!(leg.property_or("postcode", "N/A"), "400000");
        assert_eq!(leg.property_or("length", "0"), "100.0");
        assert_eq!(leg.property_or("missing", "N/A"), "N/A");
        assert!(leg.feature().is_some());
    }

    #[test]
    fn test_palettes_cycle() {
        let response = RouteResponse::from_wire(wire(true, false, 1)).unwrap();
        assert_eq!(response.leg_color(0), MULTI_ROUTE_COLORS[0]);
        assert_eq!(response.leg_color(6), MULTI_ROUTE_COLORS[0]);
        assert_eq!(response.leg_style(1).stroke_width, 4.0);
    }
}
