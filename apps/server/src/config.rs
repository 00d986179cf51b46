// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Server configuration loaded from environment variables.

use crate::services::{FlattenPolicy, SqlDriver};
use std::path::PathBuf;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on.
    pub port: u16,
    /// Maximum size of one uploaded file in MB.
    pub max_file_size_mb: usize,
    /// Maximum size of a whole request body in MB.
    pub max_request_size_mb: usize,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Allowed CORS origins (comma-separated, or "*" for all in development).
    pub cors_origins: Vec<String>,
    /// Entity types dropped from every table.
    pub excluded_types: Vec<String>,
    /// Backend used when a SQL export names none.
    pub sql_driver: SqlDriver,
    /// Rows per INSERT statement.
    pub sql_batch_rows: usize,
    /// Directory uploads are staged in (system temp dir when unset).
    pub temp_dir: Option<PathBuf>,
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()
                .unwrap_or(8080),
            max_file_size_mb: std::env::var("MAX_FILE_SIZE_MB")
                .unwrap_or_else(|_| "500".into())
                .parse()
                .unwrap_or(500),
            max_request_size_mb: std::env::var("MAX_REQUEST_SIZE_MB")
                .unwrap_or_else(|_| "2048".into())
                .parse()
                .unwrap_or(2048),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "300".into())
                .parse()
                .unwrap_or(300),
            cors_origins: split_list(&std::env::var("CORS_ORIGINS").unwrap_or_else(|_| {
                // Default: allow common development origins
                "http://localhost:3000,http://localhost:5173,http://127.0.0.1:3000,http://127.0.0.1:5173".into()
            })),
            excluded_types: split_list(
                &std::env::var("EXCLUDED_TYPES")
                    .unwrap_or_else(|_| "IfcGroup,IfcOpeningElement".into()),
            ),
            sql_driver: std::env::var("SQL_DRIVER")
                .unwrap_or_else(|_| "postgres".into())
                .parse()
                .unwrap_or(SqlDriver::Postgres),
            sql_batch_rows: std::env::var("SQL_BATCH_ROWS")
                .unwrap_or_else(|_| "500".into())
                .parse()
                .unwrap_or(500),
            temp_dir: std::env::var("TEMP_DIR")
                .ok()
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    /// Flatten policy with the configured excluded types.
    pub fn flatten_policy(&self) -> FlattenPolicy {
        FlattenPolicy::with_excluded_types(self.excluded_types.clone())
    }

    pub fn max_file_bytes(&self) -> usize {
        self.max_file_size_mb * 1024 * 1024
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
