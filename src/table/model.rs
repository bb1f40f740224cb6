use crate::data::geojson::GeoJsonFeature;
use crate::routing::response::RouteLeg;

/// Fixed marker texts for system message rows. Rows carrying one of these
/// are never searched, sorted or selected.
pub const MSG_NO_FEATURES: &str = "No features found";
pub const MSG_NO_DATA: &str = "No data available";
pub const MSG_NONE_SELECTED: &str = "No rows selected";
pub const MSG_ALL_SELECTED: &str = "All rows are selected";
pub const MSG_NONE_SELECTED_IN_SEARCH: &str = "No selected rows in search results";
pub const MSG_ALL_SEARCH_SELECTED: &str = "All search results are selected";

/// Message shown when a column search matches nothing
pub fn no_matches_message(term: &str) -> String {
    format!("No matches found for \"{}\"", term)
}

/// Stable row identifier, assigned from a monotonic counter at build time.
/// Unlike positional indices, it survives sorting and filtering, so a
/// highlight keyed by it cannot be misattributed after reordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(pub u64);

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row-{}", self.0)
    }
}

/// One table cell. `content` is what the renderer shows and may carry
/// highlight markup; the pre-highlight text is cached so clearing a search
/// restores it byte-for-byte.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    content: String,
    original: Option<String>,
}

impl Cell {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            original: None,
        }
    }

    /// Current display content, possibly with highlight markup
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The unhighlighted text: the cached original if a highlight is
    /// applied, the content itself otherwise
    pub fn raw(&self) -> &str {
        self.original.as_deref().unwrap_or(&self.content)
    }

    pub fn is_highlighted(&self) -> bool {
        self.original.is_some()
    }

    /// Replaces the content with a marked-up version, caching the original
    /// on first application
    pub(crate) fn apply_markup(&mut self, marked: String) {
        if self.original.is_none() {
            self.original = Some(self.content.clone());
        }
        self.content = marked;
    }

    /// Restores the cached original content, if any
    pub(crate) fn restore(&mut self) {
        if let Some(original) = self.original.take() {
            self.content = original;
        }
    }
}

/// Row category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// An actual record row
    Data,
    /// A build-time placeholder (e.g. empty source collection); kept until
    /// the table is rebuilt
    Placeholder,
    /// An engine-inserted message (no search matches, empty filter view);
    /// removed whenever the view is re-derived
    Notice,
}

/// One table row
#[derive(Debug, Clone)]
pub struct Row {
    pub id: RowId,
    kind: RowKind,
    cells: Vec<Cell>,
    pub selected: bool,
    pub hidden: bool,
    feature: Option<GeoJsonFeature>,
}

impl Row {
    pub fn kind(&self) -> RowKind {
        self.kind
    }

    pub fn is_data(&self) -> bool {
        self.kind == RowKind::Data
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, column: usize) -> Option<&Cell> {
        self.cells.get(column)
    }

    pub(crate) fn cell_mut(&mut self, column: usize) -> Option<&mut Cell> {
        self.cells.get_mut(column)
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// The map feature mirrored when this row is selected
    pub fn feature(&self) -> Option<&GeoJsonFeature> {
        self.feature.as_ref()
    }
}

/// A rendered attribute table: a header row and body rows, annotated in
/// place by the search/sort/filter engine.
#[derive(Debug, Clone)]
pub struct AttributeTable {
    title: String,
    columns: Vec<String>,
    rows: Vec<Row>,
    next_row_id: u64,
}

impl AttributeTable {
    pub fn new(title: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            title: title.into(),
            columns,
            rows: Vec::new(),
            next_row_id: 0,
        }
    }

    /// Builds the property table for a feature collection: "Feature ID" and
    /// "Geometry Type" columns, then the union of property keys in
    /// first-seen order. An empty collection yields a single placeholder.
    pub fn from_features(title: impl Into<String>, features: &[&GeoJsonFeature]) -> Self {
        let mut keys: Vec<String> = Vec::new();
        for feature in features {
            if let Some(properties) = &feature.properties {
                for key in properties.keys() {
                    if !keys.iter().any(|k| k == key) {
                        keys.push(key.clone());
                    }
                }
            }
        }

        let mut columns = vec!["Feature ID".to_string(), "Geometry Type".to_string()];
        columns.extend(keys.iter().cloned());

        let mut table = Self::new(title, columns);
        if features.is_empty() {
            table.push_placeholder(MSG_NO_FEATURES);
            return table;
        }

        for (index, feature) in features.iter().enumerate() {
            let mut cells = vec![(index + 1).to_string(), feature.geometry_type().to_string()];
            cells.extend(keys.iter().map(|key| feature.property_text(key)));
            table.push_data_row(cells, Some((*feature).clone()));
        }
        table
    }

    /// Builds the result table for a route response: one row per leg with
    /// the backend's address/city/postcode/length columns.
    pub fn from_route_legs(title: impl Into<String>, legs: &[RouteLeg]) -> Self {
        let columns = vec![
            "address".to_string(),
            "city".to_string(),
            "postcode".to_string(),
            "length".to_string(),
        ];

        let mut table = Self::new(title, columns);
        if legs.is_empty() {
            table.push_placeholder(MSG_NO_DATA);
            return table;
        }

        for leg in legs {
            let cells = vec![
                leg.property_or("address", "N/A"),
                leg.property_or("city", "N/A"),
                leg.property_or("postcode", "N/A"),
                leg.property_or("length", "0"),
            ];
            table.push_data_row(cells, leg.feature().cloned());
        }
        table
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut Vec<Row> {
        &mut self.rows
    }

    /// Appends a data row, assigning the next stable row id
    pub fn push_data_row(
        &mut self,
        cells: Vec<String>,
        feature: Option<GeoJsonFeature>,
    ) -> RowId {
        let id = self.allocate_row_id();
        self.rows.push(Row {
            id,
            kind: RowKind::Data,
            cells: cells.into_iter().map(Cell::new).collect(),
            selected: false,
            hidden: false,
            feature,
        });
        id
    }

    /// Appends a build-time placeholder row
    pub fn push_placeholder(&mut self, message: &str) -> RowId {
        self.push_message(RowKind::Placeholder, message)
    }

    /// Appends an engine notice row
    pub(crate) fn push_notice(&mut self, message: &str) -> RowId {
        self.push_message(RowKind::Notice, message)
    }

    fn push_message(&mut self, kind: RowKind, message: &str) -> RowId {
        let id = self.allocate_row_id();
        self.rows.push(Row {
            id,
            kind,
            cells: vec![Cell::new(message)],
            selected: false,
            hidden: false,
            feature: None,
        });
        id
    }

    fn allocate_row_id(&mut self) -> RowId {
        let id = RowId(self.next_row_id);
        self.next_row_id += 1;
        id
    }

    /// Drops every engine-inserted notice row
    pub(crate) fn remove_notices(&mut self) {
        self.rows.retain(|row| row.kind != RowKind::Notice);
    }

    pub fn row(&self, id: RowId) -> Option<&Row> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub(crate) fn row_mut(&mut self, id: RowId) -> Option<&mut Row> {
        self.rows.iter_mut().find(|row| row.id == id)
    }

    pub fn data_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|row| row.is_data())
    }

    pub(crate) fn data_rows_mut(&mut self) -> impl Iterator<Item = &mut Row> {
        self.rows.iter_mut().filter(|row| row.is_data())
    }

    /// Data rows currently shown to the user
    pub fn visible_data_rows(&self) -> impl Iterator<Item = &Row> {
        self.data_rows().filter(|row| !row.hidden)
    }

    pub fn selected_row_ids(&self) -> Vec<RowId> {
        self.data_rows()
            .filter(|row| row.selected)
            .map(|row| row.id)
            .collect()
    }

    pub fn data_row_count(&self) -> usize {
        self.data_rows().count()
    }

    /// Notice rows currently present (for renderers and tests)
    pub fn notice_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|row| row.kind == RowKind::Notice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::geojson::{GeoJsonFeature, GeoJsonGeometry};

    fn feature(postcode: &str) -> GeoJsonFeature {
        GeoJsonFeature {
            id: None,
            geometry: Some(GeoJsonGeometry::Point {
                coordinates: [23.6, 46.77],
            }),
            properties: Some(
                [
                    ("postcode".to_string(), serde_json::json!(postcode)),
                    ("city".to_string(), serde_json::json!("Cluj-Napoca")),
                ]
                .into_iter()
                .collect(),
            ),
        }
    }

    #[test]
    fn test_from_features_builds_columns_and_rows() {
        let f1 = feature("400656");
        let f2 = feature("400001");
        let table = AttributeTable::from_features("uploaded", &[&f1, &f2]);

        assert_eq!(
            table.columns(),
            &["Feature ID", "Geometry Type", "city", "postcode"]
        );
        assert_eq!(table.data_row_count(), 2);

        let first = table.rows().first().unwrap();
        assert_eq!(first.cell(0).unwrap().content(), "1");
        assert_eq!(first.cell(1).unwrap().content(), "Point");
        assert_eq!(first.cell(3).unwrap().content(), "400656");
        assert!(first.feature().is_some());
    }

    #[test]
    fn test_empty_collection_gets_placeholder() {
        let table = AttributeTable::from_features("empty", &[]);
        assert_eq!(table.data_row_count(), 0);
        assert_eq!(table.rows().len(), 1);
        assert_eq!(table.rows()[0].kind(), RowKind::Placeholder);
        assert_eq!(table.rows()[0].cell(0).unwrap().content(), MSG_NO_FEATURES);
    }

    #[test]
    fn test_row_ids_are_stable_and_unique() {
        let f1 = feature("400656");
        let f2 = feature("400001");
        let mut table = AttributeTable::from_features("t", &[&f1, &f2]);

        let ids: Vec<RowId> = table.rows().iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);

        // Reordering keeps identities intact
        table.rows_mut().reverse();
        assert_eq!(table.row(ids[0]).unwrap().id, ids[0]);
    }

    #[test]
    fn test_cell_markup_cache_restores_exactly() {
        let mut cell = Cell::new("Strada Câmpului");
        cell.apply_markup("Strada <mark>Câmp</mark>ului".to_string());
        assert!(cell.is_highlighted());
        assert_eq!(cell.raw(), "Strada Câmpului");

        // A second markup application keeps the first cached original
        cell.apply_markup("<mark>Strada</mark> Câmpului".to_string());
        cell.restore();
        assert_eq!(cell.content(), "Strada Câmpului");
        assert!(!cell.is_highlighted());
    }
}
