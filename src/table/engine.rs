use crate::core::config::TableConfig;
use crate::layers::highlight::HighlightSink;
use crate::table::filter::{self, FilterAction};
use crate::table::model::{AttributeTable, RowId};
use crate::table::search::{self, SearchState};
use crate::table::sort::{self, SortDirection, SortState, UNSORTED_INDICATOR};

/// Attaches search, sort, selection and filter behavior to one rendered
/// attribute table. The engine does not own the highlight layer; selection
/// changes are mirrored through the [`HighlightSink`] collaborator.
pub struct TableEngine {
    table: AttributeTable,
    config: TableConfig,
    search: Option<SearchState>,
    sort: Option<SortState>,
    active_filter: Option<FilterAction>,
}

impl TableEngine {
    pub fn new(table: AttributeTable, config: TableConfig) -> Self {
        Self {
            table,
            config,
            search: None,
            sort: None,
            active_filter: None,
        }
    }

    pub fn table(&self) -> &AttributeTable {
        &self.table
    }

    pub fn search_state(&self) -> Option<&SearchState> {
        self.search.as_ref()
    }

    pub fn sort_state(&self) -> Option<SortState> {
        self.sort
    }

    /// The filter button currently rendered as active, if any
    pub fn active_filter(&self) -> Option<FilterAction> {
        self.active_filter
    }

    /// Column search. An empty term clears the search: cached cell content
    /// is restored exactly and all data rows are unhidden.
    pub fn search(&mut self, column: usize, term: &str) {
        let term = term.trim();
        if term.is_empty() {
            self.clear_search();
            return;
        }

        search::apply_search(&mut self.table, column, term, &self.config);
        self.search = Some(SearchState {
            column,
            term: term.to_string(),
        });
    }

    /// Clears the active search and restores the full row set
    pub fn clear_search(&mut self) {
        search::clear_search(&mut self.table);
        self.search = None;
    }

    /// Header click: sorts by the column, toggling direction on repeated
    /// clicks and starting ascending on a new column.
    pub fn sort_by(&mut self, column: usize) {
        let direction = match self.sort {
            Some(state) if state.column == column => state.direction.toggled(),
            _ => SortDirection::Ascending,
        };

        sort::sort_rows(&mut self.table, column, direction);
        self.sort = Some(SortState { column, direction });
    }

    /// Indicator glyph for a column header
    pub fn sort_indicator(&self, column: usize) -> &'static str {
        match self.sort {
            Some(state) if state.column == column => state.direction.indicator(),
            _ => UNSORTED_INDICATOR,
        }
    }

    /// Row click: toggles the row's selected state and mirrors the change
    /// into the highlight layer. Message rows are ignored.
    pub fn toggle_row(&mut self, id: RowId, sink: &mut dyn HighlightSink) {
        let Some(row) = self.table.row_mut(id) else {
            return;
        };
        if !row.is_data() {
            return;
        }

        row.selected = !row.selected;
        if row.selected {
            match row.feature().cloned() {
                Some(feature) => sink.add_highlight(id, &feature),
                None => log::warn!("no feature data for {}, selection not mirrored", id),
            }
        } else {
            sink.remove_highlight(id);
        }
    }

    /// Applies one of the quadrant filter views
    pub fn apply_filter(&mut self, action: FilterAction, sink: &mut dyn HighlightSink) {
        filter::apply_filter(
            &mut self.table,
            action,
            self.search.as_ref(),
            &self.config,
            sink,
        );

        self.active_filter = match action {
            FilterAction::ShowSelected | FilterAction::ShowUnselected => Some(action),
            FilterAction::DefaultView | FilterAction::DeselectAll => None,
        };
    }
}
