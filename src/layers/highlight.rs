use crate::data::geojson::{FeatureStyle, GeoJsonFeature};
use crate::prelude::HashMap;
use crate::table::model::RowId;

/// Receiver for selection-driven highlight changes.
///
/// The table engine calls into this when rows are selected or deselected;
/// the implementation owns the map-side bookkeeping. Rendering details are
/// not part of the contract.
pub trait HighlightSink {
    /// Mirrors a newly selected row onto the map
    fn add_highlight(&mut self, row: RowId, feature: &GeoJsonFeature);

    /// Removes the mirror for a deselected row
    fn remove_highlight(&mut self, row: RowId);

    /// Drops every highlight
    fn clear_highlights(&mut self);
}

/// One mirrored feature
#[derive(Debug, Clone)]
pub struct HighlightEntry {
    pub feature: GeoJsonFeature,
}

/// The map-side echo of selected table rows, keyed by stable row id.
///
/// Invariant: a row has at most one entry, and the owning controller keeps
/// an entry present exactly while the row is selected.
pub struct HighlightMirror {
    entries: HashMap<RowId, HighlightEntry>,
    style: FeatureStyle,
}

impl HighlightMirror {
    pub fn new() -> Self {
        Self {
            entries: HashMap::default(),
            style: FeatureStyle::highlight(),
        }
    }

    /// The style renderers apply to mirrored features
    pub fn style(&self) -> &FeatureStyle {
        &self.style
    }

    pub fn contains(&self, row: RowId) -> bool {
        self.entries.contains_key(&row)
    }

    pub fn feature(&self, row: RowId) -> Option<&GeoJsonFeature> {
        self.entries.get(&row).map(|entry| &entry.feature)
    }

    /// Highlighted rows with their features, in unspecified order
    pub fn entries(&self) -> impl Iterator<Item = (RowId, &GeoJsonFeature)> {
        self.entries.iter().map(|(row, entry)| (*row, &entry.feature))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for HighlightMirror {
    fn default() -> Self {
        Self::new()
    }
}

impl HighlightSink for HighlightMirror {
    fn add_highlight(&mut self, row: RowId, feature: &GeoJsonFeature) {
        self.entries.insert(
            row,
            HighlightEntry {
                feature: feature.clone(),
            },
        );
    }

    fn remove_highlight(&mut self, row: RowId) {
        self.entries.remove(&row);
    }

    fn clear_highlights(&mut self) {
        self.entries.clear();
    }
}
