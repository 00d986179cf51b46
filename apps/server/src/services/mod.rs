// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Service modules for extraction, refinement and export.

pub mod flatten;
pub mod intake;
pub mod pipeline;
pub mod refine;
pub mod spreadsheet;
pub mod sql_export;
pub mod table;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use flatten::{flatten, CellValue, FlatRecord, FlattenPolicy};
pub use intake::Upload;
pub use pipeline::{extract_all, Extraction, FileReport, FileStatus, SessionContext};
pub use refine::{group_by_options, Refinement};
pub use spreadsheet::{to_xlsx, SpreadsheetError, XLSX_CONTENT_TYPE, XLSX_FILE_NAME};
pub use sql_export::{ConnectionDescriptor, SqlDriver, SqlExportError, SqlTarget, WriteMode};
pub use table::Table;
