//! Prelude module for common routemap types and traits
//!
//! Re-exports the most commonly used types and functions for easy importing
//! with `use routemap::prelude::*;`

pub use crate::core::{
    config::{AppConfig, ClientConfig, SuggestConfig, TableConfig},
    controller::{AppController, RoutingMode},
    geo::{LatLng, LatLngBounds, Point},
};

pub use crate::data::geojson::{GeoJson, GeoJsonFeature, GeoJsonGeometry};

pub use crate::suggest::{
    index::{LocationRecord, ScoredSuggestion, SuggestionIndex, SuggestionOutcome},
    selection::{Chip, DestinationSelection, StartSelection},
    source::{LocationSource, StaticLocationSource},
};

pub use crate::table::{
    engine::TableEngine,
    filter::FilterAction,
    model::{AttributeTable, Cell, Row, RowId, RowKind},
    sort::SortDirection,
};

pub use crate::layers::{
    highlight::{HighlightMirror, HighlightSink},
    registry::{Layer, LayerId, LayerKind, LayerRegistry},
};

pub use crate::routing::{
    client::{HttpRoutingBackend, RoutingBackend},
    response::{RouteLeg, RouteResponse},
};

pub use crate::{Error as MapError, Result};

pub use std::sync::Arc;

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
