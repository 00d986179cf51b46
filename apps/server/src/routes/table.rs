// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Table view endpoint.

use super::{extract, read_form};
use crate::error::ApiError;
use crate::services::group_by_options;
use crate::types::{ProcessingStats, TableResponse};
use crate::AppState;
use axum::{
    extract::{Multipart, State},
    Json,
};
use std::time::Instant;

/// POST /api/v1/table - Flatten uploads and return the refined table.
///
/// No uploads is not an error: the view is empty.
pub async fn build_table(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<TableResponse>, ApiError> {
    let start = Instant::now();
    let mut form = read_form(
        &mut multipart,
        state.config.max_file_bytes(),
        state.config.max_file_size_mb,
    )
    .await?;

    let extraction = extract(&state, &mut form).await?;
    let table = extraction.table();
    let options = group_by_options(&table);
    let refined = form.refinement().apply(&table);

    let stats = ProcessingStats {
        total_records: table.len(),
        extraction_time_ms: extraction.elapsed_ms,
        total_time_ms: start.elapsed().as_millis() as u64,
    };

    tracing::info!(
        files = extraction.files.len(),
        records = stats.total_records,
        rows = refined.len(),
        columns = refined.columns().len(),
        total_time_ms = stats.total_time_ms,
        "Built table view"
    );

    let columns = refined.columns().to_vec();
    let rows = refined.into_rows();
    Ok(Json(TableResponse {
        columns,
        row_count: rows.len(),
        rows,
        group_by_options: options,
        files: extraction.files,
        stats,
    }))
}
