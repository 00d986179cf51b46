// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Request types for the API.

use crate::services::{ConnectionDescriptor, Refinement, Upload};

/// SQL export fields of a form. Any of them may be missing.
#[derive(Debug, Clone, Default)]
pub struct SqlFields {
    pub driver: Option<String>,
    pub table_name: Option<String>,
    pub mode: Option<String>,
    pub connection: ConnectionDescriptor,
}

/// Multipart form shared by the table and export endpoints.
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    /// `file` fields, in upload order.
    pub files: Vec<Upload>,
    /// `exclude` fields: file names toggled out of the output.
    pub exclude: Vec<String>,
    /// `search` field.
    pub search: Option<String>,
    /// `group_by` field.
    pub group_by: Option<String>,
    pub sql: SqlFields,
}

impl UploadForm {
    pub fn refinement(&self) -> Refinement {
        Refinement {
            search: self.search.clone(),
            group_by: self.group_by.clone(),
        }
    }

    /// Store a text field. Returns false for names the form does not know.
    pub fn set_text(&mut self, name: &str, value: String) -> bool {
        let value = Some(value).filter(|v| !v.is_empty());
        match name {
            "exclude" => self.exclude.extend(value),
            "search" => self.search = value,
            "group_by" => self.group_by = value,
            "driver" => self.sql.driver = value,
            "table_name" => self.sql.table_name = value,
            "mode" => self.sql.mode = value,
            "host" => self.sql.connection.host = value,
            "username" => self.sql.connection.username = value,
            "password" => self.sql.connection.password = value,
            "database" => self.sql.connection.database = value,
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_text() {
        let mut form = UploadForm::default();
        assert!(form.set_text("search", "oak".into()));
        assert!(form.set_text("exclude", "a.ifc".into()));
        assert!(form.set_text("exclude", "b.ifc".into()));
        assert!(form.set_text("group_by", String::new()));
        assert!(form.set_text("password", "pw".into()));
        assert!(!form.set_text("unknown", "x".into()));

        assert_eq!(form.search.as_deref(), Some("oak"));
        assert_eq!(form.exclude, vec!["a.ifc", "b.ifc"]);
        assert_eq!(form.group_by, None);
        assert_eq!(form.sql.connection.password.as_deref(), Some("pw"));
    }
}
