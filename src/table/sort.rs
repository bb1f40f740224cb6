use crate::table::model::{AttributeTable, Row};
use std::cmp::Ordering;

/// Header sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Indicator glyph for the sorted column's header
    pub fn indicator(self) -> &'static str {
        match self {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        }
    }
}

/// Indicator glyph for unsorted column headers
pub const UNSORTED_INDICATOR: &str = "↕";

/// The currently sorted column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: usize,
    pub direction: SortDirection,
}

/// Stable sort of the data rows by one column; message rows keep their
/// relative order and are re-appended after the data rows.
///
/// The column's type is probed once against its first non-empty cell:
/// columns whose probe parses as a number compare as floats, all others
/// compare as case-insensitive strings. Comparison always reads the raw
/// (un-highlighted) cell text. Empty cells sort last in ascending order.
pub(crate) fn sort_rows(table: &mut AttributeTable, column: usize, direction: SortDirection) {
    let rows = std::mem::take(table.rows_mut());
    let (mut data, rest): (Vec<Row>, Vec<Row>) = rows.into_iter().partition(|row| row.is_data());

    if data.is_empty() {
        log::debug!("no data rows to sort");
        *table.rows_mut() = rest;
        return;
    }

    let numeric = probe_numeric(&data, column);

    data.sort_by(|a, b| {
        let ordering = compare_cells(a, b, column, numeric);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });

    let mut rows = data;
    rows.extend(rest);
    *table.rows_mut() = rows;
}

/// Numeric-vs-string probe against the first non-empty cell of the column
fn probe_numeric(rows: &[Row], column: usize) -> bool {
    rows.iter()
        .filter_map(|row| row.cell(column))
        .map(|cell| cell.raw().trim())
        .find(|value| !value.is_empty())
        .map(|value| value.parse::<f64>().map(|n| n.is_finite()).unwrap_or(false))
        .unwrap_or(false)
}

fn compare_cells(a: &Row, b: &Row, column: usize, numeric: bool) -> Ordering {
    let value_a = a.cell(column).map(|c| c.raw().trim()).unwrap_or("");
    let value_b = b.cell(column).map(|c| c.raw().trim()).unwrap_or("");

    match (value_a.is_empty(), value_b.is_empty()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }

    if numeric {
        let num_a = value_a.parse::<f64>().unwrap_or(0.0);
        let num_b = value_b.parse::<f64>().unwrap_or(0.0);
        num_a.partial_cmp(&num_b).unwrap_or(Ordering::Equal)
    } else {
        value_a.to_lowercase().cmp(&value_b.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::model::MSG_NO_DATA;

    fn table_with(rows: &[(&str, &str)]) -> AttributeTable {
        let mut table = AttributeTable::new(
            "t",
            vec!["address".to_string(), "length".to_string()],
        );
        for (address, length) in rows {
            table.push_data_row(vec![address.to_string(), length.to_string()], None);
        }
        table
    }

    fn column_values(table: &AttributeTable, column: usize) -> Vec<String> {
        table
            .data_rows()
            .map(|r| r.cell(column).unwrap().raw().to_string())
            .collect()
    }

    #[test]
    fn test_numeric_sort() {
        let mut table = table_with(&[("a", "120.5"), ("b", "9"), ("c", "1030")]);
        sort_rows(&mut table, 1, SortDirection::Ascending);
        assert_eq!(column_values(&table, 1), vec!["9", "120.5", "1030"]);

        sort_rows(&mut table, 1, SortDirection::Descending);
        assert_eq!(column_values(&table, 1), vec!["1030", "120.5", "9"]);
    }

    #[test]
    fn test_string_sort_is_case_insensitive() {
        let mut table = table_with(&[("strada B", "1"), ("Strada a", "2"), ("STRADA C", "3")]);
        sort_rows(&mut table, 0, SortDirection::Ascending);
        assert_eq!(
            column_values(&table, 0),
            vec!["Strada a", "strada B", "STRADA C"]
        );
    }

    #[test]
    fn test_empty_cells_sort_last_ascending() {
        let mut table = table_with(&[("", "1"), ("b", "2"), ("a", "3")]);
        sort_rows(&mut table, 0, SortDirection::Ascending);
        assert_eq!(column_values(&table, 0), vec!["a", "b", ""]);
    }

    #[test]
    fn test_message_rows_reappended_after_data() {
        let mut table = table_with(&[("b", "2"), ("a", "1")]);
        table.push_placeholder(MSG_NO_DATA);

        sort_rows(&mut table, 0, SortDirection::Ascending);
        let last = table.rows().last().unwrap();
        assert!(!last.is_data());
        assert_eq!(column_values(&table, 0), vec!["a", "b"]);
    }

    #[test]
    fn test_sort_keeps_stable_ids() {
        let mut table = table_with(&[("b", "2"), ("a", "1")]);
        let id_of_a = table.rows()[1].id;
        sort_rows(&mut table, 0, SortDirection::Ascending);
        assert_eq!(table.rows()[0].id, id_of_a);
    }
}
