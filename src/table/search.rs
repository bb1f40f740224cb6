use crate::core::config::TableConfig;
use crate::table::model::{no_matches_message, AttributeTable};

/// Active column search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    pub column: usize,
    pub term: String,
}

/// Applies a case-insensitive substring search against one column.
///
/// Each call fully replaces the prior visual state: previous highlights are
/// restored first, matching rows are shown with their matches wrapped in the
/// configured markers, non-matching rows are hidden, and a single notice row
/// is appended when nothing matches.
pub(crate) fn apply_search(
    table: &mut AttributeTable,
    column: usize,
    term: &str,
    config: &TableConfig,
) {
    clear_highlights(table);
    table.remove_notices();

    let mut visible = 0usize;
    for row in table.data_rows_mut() {
        let matched = match row.cell_mut(column) {
            Some(cell) => {
                let ranges = find_case_insensitive(cell.raw(), term);
                if ranges.is_empty() {
                    false
                } else {
                    let marked = wrap_matches(cell.raw(), &ranges, config);
                    cell.apply_markup(marked);
                    true
                }
            }
            None => false,
        };

        row.hidden = !matched;
        if matched {
            visible += 1;
        }
    }

    if visible == 0 {
        table.push_notice(&no_matches_message(term));
    }
}

/// Restores all highlighted cells, removes search notices and unhides every
/// data row.
pub(crate) fn clear_search(table: &mut AttributeTable) {
    clear_highlights(table);
    table.remove_notices();
    for row in table.data_rows_mut() {
        row.hidden = false;
    }
}

/// Restores every cell's cached original content
pub(crate) fn clear_highlights(table: &mut AttributeTable) {
    for row in table.data_rows_mut() {
        for cell in row.cells_mut() {
            cell.restore();
        }
    }
}

/// Byte ranges of every non-overlapping case-insensitive occurrence of
/// `term` in `haystack`. An empty term matches nothing.
pub(crate) fn find_case_insensitive(haystack: &str, term: &str) -> Vec<(usize, usize)> {
    if term.is_empty() {
        return Vec::new();
    }

    let term_lower = term.to_lowercase();
    let term_chars = term_lower.chars().count();
    let boundaries: Vec<usize> = haystack
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(haystack.len()))
        .collect();

    let mut ranges = Vec::new();
    let mut pos = 0;
    while pos + term_chars <= boundaries.len() - 1 {
        let start = boundaries[pos];
        let end = boundaries[pos + term_chars];
        if haystack[start..end].to_lowercase() == term_lower {
            ranges.push((start, end));
            pos += term_chars;
        } else {
            pos += 1;
        }
    }
    ranges
}

/// Wraps the given byte ranges in the configured highlight markers,
/// preserving the original casing of the matched text.
fn wrap_matches(text: &str, ranges: &[(usize, usize)], config: &TableConfig) -> String {
    let mut marked = String::with_capacity(text.len() + ranges.len() * 16);
    let mut cursor = 0;
    for &(start, end) in ranges {
        marked.push_str(&text[cursor..start]);
        marked.push_str(&config.highlight_open);
        marked.push_str(&text[start..end]);
        marked.push_str(&config.highlight_close);
        cursor = end;
    }
    marked.push_str(&text[cursor..]);
    marked
}
