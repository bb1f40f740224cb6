//! # Routemap
//!
//! A Rust-native core for an interactive routing map application.
//!
//! The crate models the state behind a Leaflet-style map frontend: drawn
//! shapes and uploaded GeoJSON registered as layers, free-text location
//! suggestions with scored lookup, start/destination selections, route
//! queries against an external routing backend, and attribute tables with
//! column search, sorting, row selection and map-highlight mirroring.
//! Rendering stays with the external consumer; every operation here only
//! annotates the in-memory model.

pub mod core;
pub mod data;
pub mod layers;
pub mod prelude;
pub mod routing;
pub mod suggest;
pub mod table;

// Re-export public API
pub use crate::core::{
    config::AppConfig,
    controller::{AppController, RoutingMode},
    geo::{LatLng, LatLngBounds, Point},
};

pub use crate::data::geojson::{GeoJson, GeoJsonFeature, GeoJsonGeometry};

pub use crate::suggest::{
    index::{LocationRecord, ScoredSuggestion, SuggestionIndex, SuggestionOutcome},
    selection::{DestinationSelection, StartSelection},
};

pub use crate::table::{
    filter::FilterAction,
    model::{AttributeTable, RowId},
};

pub use crate::layers::{
    highlight::{HighlightMirror, HighlightSink},
    registry::{Layer, LayerId, LayerRegistry},
};

pub use crate::routing::{client::RoutingBackend, response::RouteResponse};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Routing error: {0}")]
    Routing(String),

    #[error("Invalid input: {0}")]
    Input(String),
}

/// Error type alias for convenience
pub type Error = MapError;
