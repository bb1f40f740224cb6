use crate::core::config::TableConfig;
use crate::layers::highlight::HighlightSink;
use crate::table::model::{
    AttributeTable, MSG_ALL_SEARCH_SELECTED, MSG_ALL_SELECTED, MSG_NONE_SELECTED,
    MSG_NONE_SELECTED_IN_SEARCH,
};
use crate::table::search::{self, SearchState};

/// The four mutually exclusive filter views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterAction {
    /// Show only selected rows; placeholder when none are selected
    ShowSelected,
    /// Show only unselected rows; placeholder when all are selected
    ShowUnselected,
    /// Show everything, re-applying the active search underneath
    DefaultView,
    /// Clear every selection and highlight, then behave as the default view
    DeselectAll,
}

/// Re-derives row visibility for a filter view from the two pieces of state
/// that matter: each row's `selected` flag and the rows the active search
/// hides. Nothing is incremental; every call fully replaces the prior view.
pub(crate) fn apply_filter(
    table: &mut AttributeTable,
    action: FilterAction,
    search_state: Option<&SearchState>,
    config: &TableConfig,
    sink: &mut dyn HighlightSink,
) {
    match action {
        FilterAction::ShowSelected => {
            rederive_search(table, search_state, config);
            show_by_flag(table, search_state.is_some(), true);
        }
        FilterAction::ShowUnselected => {
            rederive_search(table, search_state, config);
            show_by_flag(table, search_state.is_some(), false);
        }
        FilterAction::DefaultView => {
            default_view(table, search_state, config);
        }
        FilterAction::DeselectAll => {
            for row in table.data_rows_mut() {
                row.selected = false;
            }
            sink.clear_highlights();
            default_view(table, search_state, config);
        }
    }
}

/// Resets hidden flags to exactly what the active search dictates (all
/// visible when no search is active). Any search notice is dropped; the
/// filter view decides what message to show instead.
fn rederive_search(
    table: &mut AttributeTable,
    search_state: Option<&SearchState>,
    config: &TableConfig,
) {
    match search_state {
        Some(state) => {
            search::apply_search(table, state.column, &state.term, config);
            table.remove_notices();
        }
        None => {
            table.remove_notices();
            for row in table.data_rows_mut() {
                row.hidden = false;
            }
        }
    }
}

/// Hides rows whose `selected` flag differs from `want_selected`, on top of
/// the search-derived hidden set; shows a placeholder when the view would
/// otherwise be empty.
fn show_by_flag(table: &mut AttributeTable, search_active: bool, want_selected: bool) {
    if table.data_row_count() == 0 {
        return;
    }

    let considered_selected = table
        .visible_data_rows()
        .filter(|row| row.selected)
        .count();
    let considered_total = table.visible_data_rows().count();
    let matching = if want_selected {
        considered_selected
    } else {
        considered_total - considered_selected
    };

    if matching == 0 {
        // Showing the unselected view of a fully unselected table is just
        // the default view; only flag the empty case the user can act on
        if want_selected || considered_selected > 0 {
            for row in table.data_rows_mut() {
                row.hidden = true;
            }
            let message = match (want_selected, search_active) {
                (true, true) => MSG_NONE_SELECTED_IN_SEARCH,
                (true, false) => MSG_NONE_SELECTED,
                (false, true) => MSG_ALL_SEARCH_SELECTED,
                (false, false) => MSG_ALL_SELECTED,
            };
            table.push_notice(message);
        }
        return;
    }

    for row in table.data_rows_mut() {
        row.hidden = row.hidden || (row.selected != want_selected);
    }
}

/// Unhides everything, then layers the active search back on
fn default_view(
    table: &mut AttributeTable,
    search_state: Option<&SearchState>,
    config: &TableConfig,
) {
    table.remove_notices();
    for row in table.data_rows_mut() {
        row.hidden = false;
    }

    if let Some(state) = search_state {
        search::apply_search(table, state.column, &state.term, config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::highlight::HighlightMirror;
    use crate::table::model::RowId;

    fn sample_table() -> AttributeTable {
        let mut table = AttributeTable::new(
            "t",
            vec!["address".to_string(), "city".to_string()],
        );
        table.push_data_row(
            vec!["Strada Câmpului".to_string(), "Cluj-Napoca".to_string()],
            None,
        );
        table.push_data_row(
            vec!["Strada Eroilor".to_string(), "Florești".to_string()],
            None,
        );
        table.push_data_row(
            vec!["Strada Memorandumului".to_string(), "Cluj-Napoca".to_string()],
            None,
        );
        table
    }

    fn select(table: &mut AttributeTable, id: RowId) {
        table.row_mut(id).unwrap().selected = true;
    }

    #[test]
    fn test_show_selected_with_no_selection_shows_placeholder() {
        let mut table = sample_table();
        let mut mirror = HighlightMirror::new();
        let config = TableConfig::default();

        apply_filter(
            &mut table,
            FilterAction::ShowSelected,
            None,
            &config,
            &mut mirror,
        );

        assert_eq!(table.visible_data_rows().count(), 0);
        let notices: Vec<_> = table.notice_rows().collect();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].cell(0).unwrap().content(), MSG_NONE_SELECTED);
    }

    #[test]
    fn test_show_selected_hides_unselected() {
        let mut table = sample_table();
        let first = table.rows()[0].id;
        select(&mut table, first);

        let mut mirror = HighlightMirror::new();
        let config = TableConfig::default();
        apply_filter(
            &mut table,
            FilterAction::ShowSelected,
            None,
            &config,
            &mut mirror,
        );

        let visible: Vec<_> = table.visible_data_rows().map(|r| r.id).collect();
        assert_eq!(visible, vec![first]);
        assert_eq!(table.notice_rows().count(), 0);
    }

    #[test]
    fn test_show_unselected_with_all_selected_shows_placeholder() {
        let mut table = sample_table();
        let ids: Vec<RowId> = table.rows().iter().map(|r| r.id).collect();
        for id in ids {
            select(&mut table, id);
        }

        let mut mirror = HighlightMirror::new();
        let config = TableConfig::default();
        apply_filter(
            &mut table,
            FilterAction::ShowUnselected,
            None,
            &config,
            &mut mirror,
        );

        assert_eq!(table.visible_data_rows().count(), 0);
        let notices: Vec<_> = table.notice_rows().collect();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].cell(0).unwrap().content(), MSG_ALL_SELECTED);
    }

    #[test]
    fn test_filter_respects_active_search() {
        let mut table = sample_table();
        // Select the Florești row, then search for Cluj: the selection is
        // outside the search results
        let second = table.rows()[1].id;
        select(&mut table, second);

        let search_state = SearchState {
            column: 1,
            term: "cluj".to_string(),
        };
        let mut mirror = HighlightMirror::new();
        let config = TableConfig::default();
        apply_filter(
            &mut table,
            FilterAction::ShowSelected,
            Some(&search_state),
            &config,
            &mut mirror,
        );

        assert_eq!(table.visible_data_rows().count(), 0);
        let notices: Vec<_> = table.notice_rows().collect();
        assert_eq!(
            notices[0].cell(0).unwrap().content(),
            MSG_NONE_SELECTED_IN_SEARCH
        );
    }

    #[test]
    fn test_default_view_reapplies_search() {
        let mut table = sample_table();
        let search_state = SearchState {
            column: 1,
            term: "cluj".to_string(),
        };
        let mut mirror = HighlightMirror::new();
        let config = TableConfig::default();

        apply_filter(
            &mut table,
            FilterAction::DefaultView,
            Some(&search_state),
            &config,
            &mut mirror,
        );

        // Two Cluj-Napoca rows match, the Florești row stays hidden
        assert_eq!(table.visible_data_rows().count(), 2);
    }

    #[test]
    fn test_deselect_all_clears_flags_and_highlights() {
        let mut table = sample_table();
        let ids: Vec<RowId> = table.rows().iter().map(|r| r.id).collect();
        let mut mirror = HighlightMirror::new();
        let feature = crate::data::geojson::GeoJsonFeature {
            id: None,
            geometry: None,
            properties: None,
        };
        for id in &ids {
            select(&mut table, *id);
            mirror.add_highlight(*id, &feature);
        }
        assert_eq!(mirror.len(), 3);

        let config = TableConfig::default();
        apply_filter(
            &mut table,
            FilterAction::DeselectAll,
            None,
            &config,
            &mut mirror,
        );

        assert!(table.selected_row_ids().is_empty());
        assert!(mirror.is_empty());
        assert_eq!(table.visible_data_rows().count(), 3);
    }
}
