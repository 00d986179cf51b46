// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Unified table over flattened records.

use super::flatten::{CellValue, FlatRecord};
use rustc_hash::FxHashMap;

/// Rows over the union of record columns.
///
/// Columns appear in order of first appearance across the records; cells a
/// record does not carry are `Null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Build a table from records, in record order.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a FlatRecord>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        let mut positions: FxHashMap<String, usize> = FxHashMap::default();
        let mut sparse: Vec<Vec<(usize, CellValue)>> = Vec::new();

        for record in records {
            let mut cells = Vec::with_capacity(record.len());
            for (key, value) in record.fields() {
                let pos = match positions.get(key) {
                    Some(&pos) => pos,
                    None => {
                        let pos = columns.len();
                        columns.push(key.to_string());
                        positions.insert(key.to_string(), pos);
                        pos
                    }
                };
                cells.push((pos, value.clone()));
            }
            sparse.push(cells);
        }

        let width = columns.len();
        let rows = sparse
            .into_iter()
            .map(|cells| {
                let mut row = vec![CellValue::Null; width];
                for (pos, value) in cells {
                    row[pos] = value;
                }
                row
            })
            .collect();

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<CellValue>> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell by row position and column name.
    pub fn cell(&self, row: usize, column: &str) -> Option<&CellValue> {
        let col = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[col])
    }

    /// Same columns, rows kept where `keep` returns true.
    pub fn retain_rows(&self, mut keep: impl FnMut(&[CellValue]) -> bool) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }
}
