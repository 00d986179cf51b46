// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-request extraction: stage, parse and flatten each upload in order.

use super::flatten::{flatten, FlatRecord, FlattenPolicy};
use super::intake::{stage, Upload};
use super::table::Table;
use ifc_sheet_core::IfcModel;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

/// Settings for one request's extraction.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub policy: FlattenPolicy,
    /// Where uploads are staged; system temp dir when unset.
    pub temp_dir: Option<PathBuf>,
    /// Uploads toggled out of the output, by file name.
    pub excluded_files: Vec<String>,
}

impl SessionContext {
    fn is_excluded(&self, file_name: &str) -> bool {
        self.excluded_files.iter().any(|f| f == file_name)
    }
}

/// Why one file produced no records.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("Failed to stage {file_name}: {source}")]
    Stage {
        file_name: String,
        source: std::io::Error,
    },

    #[error("Failed to read {file_name}: {source}")]
    Model {
        file_name: String,
        source: ifc_sheet_core::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Extracted,
    Failed,
    Excluded,
}

/// Outcome for one uploaded file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub file_name: String,
    pub status: FileStatus,
    pub records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Records from every extracted file plus a report per file.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub records: Vec<FlatRecord>,
    pub files: Vec<FileReport>,
    pub elapsed_ms: u64,
}

impl Extraction {
    pub fn table(&self) -> Table {
        Table::from_records(&self.records)
    }

    /// At least one file was attempted and none succeeded.
    pub fn all_failed(&self) -> bool {
        let attempted = self
            .files
            .iter()
            .filter(|f| f.status != FileStatus::Excluded)
            .count();
        attempted > 0
            && self
                .files
                .iter()
                .all(|f| f.status != FileStatus::Extracted)
    }

    /// Messages of the failed files.
    pub fn failures(&self) -> Vec<String> {
        self.files.iter().filter_map(|f| f.error.clone()).collect()
    }
}

/// Stage, parse and flatten one upload. The staged copy is removed on return.
pub fn extract_file(upload: &Upload, ctx: &SessionContext) -> Result<Vec<FlatRecord>, ExtractionError> {
    let staged = stage(upload, ctx.temp_dir.as_deref()).map_err(|source| ExtractionError::Stage {
        file_name: upload.file_name.clone(),
        source,
    })?;

    let model_error = |source| ExtractionError::Model {
        file_name: upload.file_name.clone(),
        source,
    };
    let model = IfcModel::open(staged.path()).map_err(model_error)?;
    if !model.unclassified_types().is_empty() {
        tracing::warn!(
            file_name = %upload.file_name,
            schema = %model.schema_version(),
            types = ?model.unclassified_types(),
            "Skipping instances of types missing from the schema tables"
        );
    }
    flatten(&model, &upload.file_name, &ctx.policy).map_err(model_error)
}

/// Extract every upload in order. A failing file is reported and skipped.
pub fn extract_all(uploads: &[Upload], ctx: &SessionContext) -> Extraction {
    let start = Instant::now();
    let mut extraction = Extraction::default();

    for upload in uploads {
        if ctx.is_excluded(&upload.file_name) {
            extraction.files.push(FileReport {
                file_name: upload.file_name.clone(),
                status: FileStatus::Excluded,
                records: 0,
                error: None,
            });
            continue;
        }

        let file_start = Instant::now();
        match extract_file(upload, ctx) {
            Ok(records) => {
                tracing::info!(
                    file_name = %upload.file_name,
                    size = upload.bytes.len(),
                    records = records.len(),
                    elapsed_ms = file_start.elapsed().as_millis() as u64,
                    "Extracted records"
                );
                extraction.files.push(FileReport {
                    file_name: upload.file_name.clone(),
                    status: FileStatus::Extracted,
                    records: records.len(),
                    error: None,
                });
                extraction.records.extend(records);
            }
            Err(e) => {
                tracing::warn!(file_name = %upload.file_name, error = %e, "Extraction failed");
                extraction.files.push(FileReport {
                    file_name: upload.file_name.clone(),
                    status: FileStatus::Failed,
                    records: 0,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    extraction.elapsed_ms = start.elapsed().as_millis() as u64;
    extraction
}
