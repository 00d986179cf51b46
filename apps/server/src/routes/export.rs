// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Spreadsheet and SQL export endpoints.

use super::{extract, read_form};
use crate::error::ApiError;
use crate::services::sql_export::export_table;
use crate::services::{to_xlsx, SqlDriver, SqlTarget, WriteMode, XLSX_CONTENT_TYPE, XLSX_FILE_NAME};
use crate::types::{ExportStatus, SqlExportResponse};
use crate::AppState;
use axum::{
    body::Body,
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use std::time::Instant;

/// POST /api/v1/export/xlsx - Download the refined table as a workbook.
pub async fn export_xlsx(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let start = Instant::now();
    let mut form = read_form(
        &mut multipart,
        state.config.max_file_bytes(),
        state.config.max_file_size_mb,
    )
    .await?;
    if form.files.is_empty() {
        return Err(ApiError::MissingFile);
    }

    let extraction = extract(&state, &mut form).await?;
    let refined = form.refinement().apply(&extraction.table());
    let rows = refined.len();

    let bytes = tokio::task::spawn_blocking(move || to_xlsx(&refined)).await??;

    tracing::info!(
        rows,
        size = bytes.len(),
        total_time_ms = start.elapsed().as_millis() as u64,
        "Exported workbook"
    );

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, XLSX_CONTENT_TYPE)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", XLSX_FILE_NAME),
        )
        .header(header::CONTENT_LENGTH, bytes.len())
        .body(Body::from(bytes))?;
    Ok(response)
}

/// POST /api/v1/export/sql - Write the refined table into a database table.
///
/// Missing credentials or table name skip the export without connecting.
pub async fn export_sql(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<SqlExportResponse>, ApiError> {
    let start = Instant::now();
    let mut form = read_form(
        &mut multipart,
        state.config.max_file_bytes(),
        state.config.max_file_size_mb,
    )
    .await?;
    if form.files.is_empty() {
        return Err(ApiError::MissingFile);
    }

    let driver = match form.sql.driver.as_deref() {
        Some(name) => name.parse::<SqlDriver>()?,
        None => state.config.sql_driver,
    };
    let mode = form.sql.mode.as_deref().unwrap_or_default().parse::<WriteMode>()?;

    let table_name = form
        .sql
        .table_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string);
    let Some(table_name) = table_name else {
        tracing::info!("SQL export skipped: no table name");
        return Ok(Json(SqlExportResponse::skipped(mode, "missing table name", Vec::new())));
    };
    if !form.sql.connection.is_complete(driver) {
        tracing::info!(?driver, "SQL export skipped: incomplete connection details");
        return Ok(Json(SqlExportResponse::skipped(
            mode,
            "missing connection details",
            Vec::new(),
        )));
    }

    let extraction = extract(&state, &mut form).await?;
    let refined = form.refinement().apply(&extraction.table());
    if refined.columns().is_empty() {
        tracing::info!(table_name = %table_name, "SQL export skipped: nothing to write");
        return Ok(Json(SqlExportResponse::skipped(
            mode,
            "no records to write",
            extraction.files,
        )));
    }

    let target = SqlTarget {
        driver,
        table_name,
        mode,
        batch_rows: state.config.sql_batch_rows,
    };
    let rows_written = export_table(&form.sql.connection, &target, &refined).await?;

    tracing::info!(
        table_name = %target.table_name,
        ?mode,
        rows_written,
        total_time_ms = start.elapsed().as_millis() as u64,
        "Exported table to SQL"
    );

    Ok(Json(SqlExportResponse {
        status: ExportStatus::Written,
        table_name: Some(target.table_name),
        mode,
        rows_written,
        reason: None,
        files: extraction.files,
    }))
}
