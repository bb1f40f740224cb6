use crate::data::geojson::{GeoJson, GeoJsonFeature};
use crate::routing::response::RouteResponse;
use crate::{Error, Result};

/// Stable layer identifier from a monotonically increasing counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u64);

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "layer-{}", self.0)
    }
}

/// What a registered layer carries
pub enum LayerKind {
    /// Shapes the user drew on the map
    Drawn { features: Vec<GeoJsonFeature> },
    /// An uploaded GeoJSON file
    GeoJson { data: GeoJson },
    /// The result of a routing query
    Route { response: RouteResponse },
}

/// One registered overlay layer
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub kind: LayerKind,
    pub visible: bool,
}

impl Layer {
    /// The features of a drawn or uploaded layer (route layers expose their
    /// geometry per leg instead)
    pub fn features(&self) -> Vec<&GeoJsonFeature> {
        match &self.kind {
            LayerKind::Drawn { features } => features.iter().collect(),
            LayerKind::GeoJson { data } => data.features(),
            LayerKind::Route { .. } => Vec::new(),
        }
    }

    pub fn route_response(&self) -> Option<&RouteResponse> {
        match &self.kind {
            LayerKind::Route { response } => Some(response),
            _ => None,
        }
    }
}

/// The set of overlay layers currently on the map, in insertion order.
///
/// Owned by the application controller; ids are never reused, so a stale id
/// can only miss, not alias a different layer.
pub struct LayerRegistry {
    layers: Vec<Layer>,
    next_id: u64,
}

impl LayerRegistry {
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn add_drawn(&mut self, name: impl Into<String>, features: Vec<GeoJsonFeature>) -> LayerId {
        self.push(name.into(), LayerKind::Drawn { features })
    }

    pub fn add_geojson(&mut self, name: impl Into<String>, data: GeoJson) -> LayerId {
        self.push(name.into(), LayerKind::GeoJson { data })
    }

    pub fn add_route(&mut self, response: RouteResponse) -> LayerId {
        let name = response.layer_name();
        self.push(name, LayerKind::Route { response })
    }

    fn push(&mut self, name: String, kind: LayerKind) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;
        log::debug!("registered layer {} ({})", id, name);
        self.layers.push(Layer {
            id,
            name,
            kind,
            visible: true,
        });
        id
    }

    pub fn remove(&mut self, id: LayerId) -> Result<Layer> {
        let idx = self
            .layers
            .iter()
            .position(|layer| layer.id == id)
            .ok_or_else(|| Error::Layer(format!("no such layer: {}", id)))?;
        Ok(self.layers.remove(idx))
    }

    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|layer| layer.id == id)
    }

    pub fn set_visible(&mut self, id: LayerId, visible: bool) {
        if let Some(layer) = self.get_mut(id) {
            layer.visible = visible;
        }
    }

    /// Layers in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    /// The most recently added route layer, the one an open route table
    /// refers to
    pub fn latest_route(&self) -> Option<&Layer> {
        self.layers
            .iter()
            .rev()
            .find(|layer| matches!(layer.kind, LayerKind::Route { .. }))
    }

    /// The most recently added GeoJSON layer with features, the one an open
    /// attribute table refers to
    pub fn latest_geojson(&self) -> Option<&Layer> {
        self.layers.iter().rev().find(|layer| {
            matches!(&layer.kind, LayerKind::GeoJson { data } if !data.features().is_empty())
        })
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn clear(&mut self) {
        self.layers.clear();
    }
}

impl Default for LayerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
