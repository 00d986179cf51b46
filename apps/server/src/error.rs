// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types and handling for the server.

use crate::services::{SpreadsheetError, SqlExportError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing file in request")]
    MissingFile,

    #[error("File too large: maximum size is {max_mb} MB")]
    FileTooLarge { max_mb: usize },

    #[error("Multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Join error")]
    Join(#[from] tokio::task::JoinError),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::MissingFile => (StatusCode::BAD_REQUEST, "MISSING_FILE"),
            ApiError::FileTooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, "FILE_TOO_LARGE"),
            ApiError::Multipart(_) => (StatusCode::BAD_REQUEST, "MULTIPART_ERROR"),
            ApiError::InvalidParameter(_) => (StatusCode::BAD_REQUEST, "INVALID_PARAMETER"),
            ApiError::Extraction(_) => (StatusCode::UNPROCESSABLE_ENTITY, "EXTRACTION_ERROR"),
            ApiError::Export(_) => (StatusCode::BAD_GATEWAY, "EXPORT_ERROR"),
            ApiError::Spreadsheet(_) => (StatusCode::INTERNAL_SERVER_ERROR, "SPREADSHEET_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Join(_) => (StatusCode::INTERNAL_SERVER_ERROR, "TASK_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code, "Request failed");
        }

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<SqlExportError> for ApiError {
    fn from(err: SqlExportError) -> Self {
        match err {
            SqlExportError::Database(_)
            | SqlExportError::SqlServer(_)
            | SqlExportError::Connect(_)
            | SqlExportError::ConnectTimeout(_) => ApiError::Export(err.to_string()),
            _ => ApiError::InvalidParameter(err.to_string()),
        }
    }
}

impl From<SpreadsheetError> for ApiError {
    fn from(err: SpreadsheetError) -> Self {
        ApiError::Spreadsheet(err.to_string())
    }
}

impl From<axum::http::Error> for ApiError {
    fn from(err: axum::http::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::MissingFile.status_and_code().0, StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::FileTooLarge { max_mb: 1 }.status_and_code(),
            (StatusCode::PAYLOAD_TOO_LARGE, "FILE_TOO_LARGE")
        );
        assert_eq!(
            ApiError::from(SqlExportError::InvalidMode("upsert".into())).status_and_code().1,
            "INVALID_PARAMETER"
        );
        assert_eq!(
            ApiError::from(SqlExportError::Database(sqlx::Error::PoolTimedOut)).status_and_code(),
            (StatusCode::BAD_GATEWAY, "EXPORT_ERROR")
        );
        assert_eq!(
            ApiError::from(SqlExportError::ConnectTimeout(std::time::Duration::from_secs(15)))
                .status_and_code(),
            (StatusCode::BAD_GATEWAY, "EXPORT_ERROR")
        );
    }
}
