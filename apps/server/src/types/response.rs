// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response types for the API.

use crate::services::{CellValue, FileReport, WriteMode};
use serde::Serialize;

/// Table view of the uploaded models.
#[derive(Debug, Clone, Serialize)]
pub struct TableResponse {
    /// Column names, in table order.
    pub columns: Vec<String>,
    /// Rows of scalars; `null` for missing values.
    pub rows: Vec<Vec<CellValue>>,
    /// Number of rows after search and grouping.
    pub row_count: usize,
    /// Group-by choices: `"None"` followed by every column.
    pub group_by_options: Vec<String>,
    /// Outcome per uploaded file.
    pub files: Vec<FileReport>,
    /// Processing statistics.
    pub stats: ProcessingStats,
}

/// Processing statistics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProcessingStats {
    /// Records extracted before search and grouping.
    pub total_records: usize,
    /// Time spent staging, parsing and flattening (ms).
    pub extraction_time_ms: u64,
    /// Total processing time (ms).
    pub total_time_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportStatus {
    /// Rows were written.
    Written,
    /// Nothing was attempted.
    Skipped,
}

/// Result of a SQL export.
#[derive(Debug, Clone, Serialize)]
pub struct SqlExportResponse {
    pub status: ExportStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    pub mode: WriteMode,
    pub rows_written: u64,
    /// Why the export was skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub files: Vec<FileReport>,
}

impl SqlExportResponse {
    pub fn skipped(mode: WriteMode, reason: impl Into<String>, files: Vec<FileReport>) -> Self {
        Self {
            status: ExportStatus::Skipped,
            table_name: None,
            mode,
            rows_written: 0,
            reason: Some(reason.into()),
            files,
        }
    }
}
