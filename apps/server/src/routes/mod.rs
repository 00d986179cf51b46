// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP route handlers.

pub mod export;
pub mod health;
pub mod table;

use crate::error::ApiError;
use crate::services::{extract_all, Extraction, SessionContext, Upload};
use crate::types::UploadForm;
use crate::AppState;
use axum::extract::Multipart;

/// Read every multipart field into an [`UploadForm`].
async fn read_form(multipart: &mut Multipart, max_file_bytes: usize, max_mb: usize) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        tracing::debug!(field_name = %field_name, "Processing multipart field");

        if field_name == "file" {
            let file_name = field
                .file_name()
                .map(str::to_string)
                .filter(|name| !name.is_empty())
                .ok_or_else(|| ApiError::InvalidParameter("file field without a file name".into()))?;
            let bytes = field.bytes().await?;
            if bytes.len() > max_file_bytes {
                return Err(ApiError::FileTooLarge { max_mb });
            }
            tracing::debug!(file_name = %file_name, size = bytes.len(), "Extracted file from multipart");
            form.files.push(Upload::new(file_name, bytes.to_vec()));
        } else {
            let value = field.text().await?;
            if !form.set_text(&field_name, value) {
                tracing::debug!(field_name = %field_name, "Ignoring unknown multipart field");
            }
        }
    }

    Ok(form)
}

/// Parse and flatten the uploads on the blocking pool.
///
/// Fails only when every attempted file failed.
async fn extract(state: &AppState, form: &mut UploadForm) -> Result<Extraction, ApiError> {
    let uploads = std::mem::take(&mut form.files);
    let ctx = SessionContext {
        policy: state.config.flatten_policy(),
        temp_dir: state.config.temp_dir.clone(),
        excluded_files: form.exclude.clone(),
    };

    let extraction = tokio::task::spawn_blocking(move || extract_all(&uploads, &ctx)).await?;

    if extraction.all_failed() {
        return Err(ApiError::Extraction(extraction.failures().join("; ")));
    }
    Ok(extraction)
}
