// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Upload staging on disk.

use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Uploaded model file.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Write an upload to a temporary `.ifc` file.
///
/// The file is deleted when the returned handle drops.
pub fn stage(upload: &Upload, temp_dir: Option<&Path>) -> io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("ifc-upload-").suffix(".ifc");

    let mut file = match temp_dir {
        Some(dir) => builder.tempfile_in(dir)?,
        None => builder.tempfile()?,
    };
    file.write_all(&upload.bytes)?;
    file.flush()?;

    tracing::debug!(
        file_name = %upload.file_name,
        size = upload.bytes.len(),
        path = %file.path().display(),
        "Staged upload"
    );

    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_writes_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let upload = Upload::new("a.ifc", b"ISO-10303-21;".to_vec());

        let staged = stage(&upload, Some(dir.path())).unwrap();
        let path = staged.path().to_path_buf();
        assert!(path.starts_with(dir.path()));
        assert_eq!(std::fs::read(&path).unwrap(), upload.bytes);

        drop(staged);
        assert!(!path.exists());
    }
}
