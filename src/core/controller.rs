use crate::core::config::AppConfig;
use crate::data::geojson::{GeoJson, GeoJsonFeature};
use crate::layers::highlight::{HighlightMirror, HighlightSink};
use crate::layers::registry::{LayerId, LayerRegistry};
use crate::routing::client::{RoutingBackend, ZipRouteQuery};
use crate::suggest::index::{LocationRecord, SuggestionIndex, SuggestionOutcome};
use crate::suggest::selection::{DestinationSelection, StartSelection};
use crate::suggest::source::LocationSource;
use crate::table::engine::TableEngine;
use crate::table::filter::FilterAction;
use crate::table::model::{AttributeTable, RowId};
use crate::{Error, Result};

/// How destination zipcodes are routed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingMode {
    /// Independent routes A → B, A → C, A → D
    Multiple,
    /// A circular route A → B → C → ... → A
    RoundTrip,
}

/// Top-level application state owner.
///
/// Every piece of mutable state lives here and is passed by reference to the
/// component that needs it; nothing is ambient. Construction and [`reset`]
/// are the explicit lifecycle; dropping the controller is the "page reload".
///
/// [`reset`]: AppController::reset
pub struct AppController {
    config: AppConfig,
    backend: Box<dyn RoutingBackend>,
    suggestions: SuggestionIndex,
    start: StartSelection,
    destinations: DestinationSelection,
    layers: LayerRegistry,
    highlights: HighlightMirror,
    table: Option<TableEngine>,
}

impl AppController {
    pub fn new(config: AppConfig, backend: Box<dyn RoutingBackend>) -> Self {
        let suggestions = SuggestionIndex::new(config.suggest.clone());
        Self {
            config,
            backend,
            suggestions,
            start: StartSelection::new(),
            destinations: DestinationSelection::new(),
            layers: LayerRegistry::new(),
            highlights: HighlightMirror::new(),
            table: None,
        }
    }

    /// Clears selections, layers, highlights and the open table. The
    /// suggestion index and its cache survive; they are tied to the
    /// controller's lifetime, not to a session.
    pub fn reset(&mut self) {
        self.start.clear();
        self.destinations.clear();
        self.layers.clear();
        self.highlights.clear_highlights();
        self.table = None;
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    // --- suggestions ---------------------------------------------------

    /// One-shot bulk load of the location record set; a failure disables
    /// suggestions and is not retried.
    pub async fn load_suggestions(&mut self, source: &dyn LocationSource) {
        self.suggestions.load(source).await;
    }

    pub fn suggestions(&self) -> &SuggestionIndex {
        &self.suggestions
    }

    /// Scored lookup for the text the user typed before pressing Enter
    pub fn query_suggestions(&mut self, term: &str) -> SuggestionOutcome {
        self.suggestions.query(term)
    }

    /// Accepts a suggestion for the start field, replacing any previous one
    pub fn accept_start(&mut self, record: LocationRecord) {
        self.start.accept(record);
    }

    /// Accepts a suggestion for the destination field; duplicates are
    /// rejected and leave the chip stack unchanged
    pub fn accept_destination(&mut self, record: LocationRecord) -> bool {
        self.destinations.accept(record)
    }

    pub fn remove_destination(&mut self, full_address: &str) {
        self.destinations.remove(full_address);
    }

    pub fn start_selection(&self) -> &StartSelection {
        &self.start
    }

    pub fn destination_selection(&self) -> &DestinationSelection {
        &self.destinations
    }

    // --- layers ---------------------------------------------------------

    pub fn layers(&self) -> &LayerRegistry {
        &self.layers
    }

    pub fn highlights(&self) -> &HighlightMirror {
        &self.highlights
    }

    /// Parses and registers an uploaded GeoJSON file, then persists it.
    /// A parse failure aborts with no partial effect; a persistence failure
    /// is logged and the layer stays on the map.
    pub async fn import_geojson(&mut self, name: &str, text: &str) -> Result<LayerId> {
        let data = GeoJson::from_str(text)?;
        let id = self.layers.add_geojson(name, data);
        self.persist_layer(id).await;
        Ok(id)
    }

    /// Registers shapes drawn on the map as a layer and persists them
    pub async fn add_drawn_features(&mut self, features: Vec<GeoJsonFeature>) -> Result<LayerId> {
        if features.is_empty() {
            return Err(Error::Input("no drawn shapes to add".to_string()));
        }
        let id = self.layers.add_drawn("Points Added", features);
        self.persist_layer(id).await;
        Ok(id)
    }

    async fn persist_layer(&mut self, id: LayerId) {
        let Some(layer) = self.layers.get(id) else {
            return;
        };
        let data = GeoJson::FeatureCollection {
            features: layer.features().into_iter().cloned().collect(),
        };
        if let Err(e) = self.backend.store_layer(id, &data).await {
            log::warn!("failed to persist {}: {}", id, e);
        }
    }

    /// Removes a layer, its highlights and any table showing it, then asks
    /// the backend to forget it
    pub async fn remove_layer(&mut self, id: LayerId) -> Result<()> {
        self.layers.remove(id)?;
        self.close_table();
        if let Err(e) = self.backend.delete_layer(id).await {
            log::warn!("failed to delete {} on the backend: {}", id, e);
        }
        Ok(())
    }

    // --- routing --------------------------------------------------------

    /// Runs a routing query for the current selections. Missing endpoint
    /// input aborts before anything is sent; a backend error is terminal
    /// for this action. On success the route layer is registered and its
    /// result table opened.
    pub async fn route(&mut self, mode: RoutingMode) -> Result<LayerId> {
        let query = ZipRouteQuery::from_selections(&self.start, &self.destinations)?;

        let response = match mode {
            RoutingMode::Multiple => self.backend.zip_routes(&query).await?,
            RoutingMode::RoundTrip => self.backend.zip_roundtrip(&query).await?,
        };

        let id = self.register_route(response);
        Ok(id)
    }

    /// Routes between two geocoded addresses
    pub async fn route_addresses(
        &mut self,
        start: crate::core::geo::LatLng,
        end: crate::core::geo::LatLng,
    ) -> Result<LayerId> {
        if !start.is_valid() || !end.is_valid() {
            return Err(Error::Input("invalid address coordinates".to_string()));
        }
        let response = self.backend.address_route(&start, &end).await?;
        let id = self.register_route(response);
        Ok(id)
    }

    fn register_route(&mut self, response: crate::routing::response::RouteResponse) -> LayerId {
        let table = AttributeTable::from_route_legs(response.table_title(), response.legs());
        let id = self.layers.add_route(response);

        self.close_table();
        self.table = Some(TableEngine::new(table, self.config.table.clone()));
        log::info!("route layer {} registered", id);
        id
    }

    // --- tables ---------------------------------------------------------

    /// Opens the table for a registered layer: property columns for feature
    /// layers, the leg table for route layers. Replaces any open table.
    pub fn open_table(&mut self, id: LayerId) -> Result<()> {
        let layer = self
            .layers
            .get(id)
            .ok_or_else(|| Error::Layer(format!("no such layer: {}", id)))?;

        let table = match layer.route_response() {
            Some(response) => {
                AttributeTable::from_route_legs(response.table_title(), response.legs())
            }
            None => AttributeTable::from_features(layer.name.clone(), &layer.features()),
        };

        self.close_table();
        self.table = Some(TableEngine::new(table, self.config.table.clone()));
        Ok(())
    }

    /// Fetches a stored layer's feature data from the backend and opens its
    /// attribute table
    pub async fn open_stored_table(&mut self, id: LayerId) -> Result<()> {
        let name = self
            .layers
            .get(id)
            .map(|layer| layer.name.clone())
            .unwrap_or_else(|| id.to_string());
        let data = self.backend.layer_data(id).await?;

        let table = AttributeTable::from_features(name, &data.features());
        self.close_table();
        self.table = Some(TableEngine::new(table, self.config.table.clone()));
        Ok(())
    }

    /// Closes the open table and drops every highlight mirrored from it
    pub fn close_table(&mut self) {
        if self.table.take().is_some() {
            self.highlights.clear_highlights();
        }
    }

    pub fn table(&self) -> Option<&TableEngine> {
        self.table.as_ref()
    }

    /// Column search on the open table
    pub fn search_table(&mut self, column: usize, term: &str) {
        if let Some(engine) = self.table.as_mut() {
            engine.search(column, term);
        }
    }

    /// Header click on the open table
    pub fn sort_table(&mut self, column: usize) {
        if let Some(engine) = self.table.as_mut() {
            engine.sort_by(column);
        }
    }

    /// Row click on the open table; the selection change is mirrored into
    /// the highlight layer
    pub fn toggle_table_row(&mut self, id: RowId) {
        if let Some(engine) = self.table.as_mut() {
            engine.toggle_row(id, &mut self.highlights);
        }
    }

    /// Filter button on the open table
    pub fn apply_table_filter(&mut self, action: FilterAction) {
        if let Some(engine) = self.table.as_mut() {
            engine.apply_filter(action, &mut self.highlights);
        }
    }
}
