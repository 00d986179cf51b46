// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Search and group-by-first refinement of a table.

use super::flatten::CellValue;
use super::table::Table;
use rustc_hash::FxHashSet;

/// Group-by choice that disables grouping.
pub const NO_GROUPING: &str = "None";

/// Rows whose rendered values contain `term`, case-insensitively.
///
/// Values are joined with spaces and nulls render empty. An empty term
/// returns the table unchanged.
pub fn filter(table: &Table, term: &str) -> Table {
    if term.is_empty() {
        return table.clone();
    }
    let needle = term.to_lowercase();

    table.retain_rows(|row| {
        let haystack = row
            .iter()
            .map(|cell| cell.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        haystack.to_lowercase().contains(&needle)
    })
}

/// One row per distinct value of `column`, the first one seen.
///
/// `None`, empty or `"None"` disables grouping, and a column the table does
/// not have is a no-op. Rows with a null key are dropped.
pub fn group_by_first(table: &Table, column: Option<&str>) -> Table {
    let Some(column) = column.filter(|c| !c.is_empty() && *c != NO_GROUPING) else {
        return table.clone();
    };
    let Some(col) = table.column_index(column) else {
        return table.clone();
    };

    let mut seen: FxHashSet<String> = FxHashSet::default();
    table.retain_rows(|row| match &row[col] {
        CellValue::Null => false,
        key => seen.insert(group_key(key)),
    })
}

/// Keys compare by kind and value; `Text("1")` and `Integer(1)` differ.
fn group_key(cell: &CellValue) -> String {
    match cell {
        CellValue::Null => String::new(),
        CellValue::Bool(b) => format!("b:{}", b),
        CellValue::Integer(i) => format!("i:{}", i),
        CellValue::Real(r) => format!("r:{}", r),
        CellValue::Text(s) => format!("t:{}", s),
    }
}

/// Group-by choices offered for a table: `"None"` then every column.
pub fn group_by_options(table: &Table) -> Vec<String> {
    std::iter::once(NO_GROUPING.to_string())
        .chain(table.columns().iter().cloned())
        .collect()
}

/// Search term and group-by column applied to a table.
#[derive(Debug, Clone, Default)]
pub struct Refinement {
    pub search: Option<String>,
    pub group_by: Option<String>,
}

impl Refinement {
    /// Filter first, then group.
    pub fn apply(&self, table: &Table) -> Table {
        let filtered = filter(table, self.search.as_deref().unwrap_or_default());
        group_by_first(&filtered, self.group_by.as_deref())
    }
}
