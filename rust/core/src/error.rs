// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for parsing and model queries
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading an IFC model
#[derive(Error, Debug)]
pub enum Error {
    #[error("Parse error at byte {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("Invalid UTF-8 content: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Entity #{0} not found")]
    EntityNotFound(u32),

    #[error("Entity type {type_name} has no attribute {attribute}")]
    UnknownAttribute { type_name: String, attribute: String },
}

impl Error {
    /// Build a parse error at a byte offset
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            position,
            message: message.into(),
        }
    }
}
