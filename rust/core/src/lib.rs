// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC-Sheet Core
//!
//! STEP/IFC reader built with [nom](https://docs.rs/nom).
//! Provides tokenization, entity scanning and a small query surface over
//! the parsed instance graph.
//!
//! ## Overview
//!
//! - **STEP Tokenization**: zero-copy parsing of instance records
//! - **Entity Scanning**: [memchr](https://docs.rs/memchr) based statement
//!   discovery that respects quoted strings and comments
//! - **Decoding**: every record is validated; only schema-typed instances
//!   (objects, relationships, properties) keep their attributes
//! - **Schema**: IFC2X3 / IFC4 / IFC4X3 inheritance and named attributes
//! - **Model**: [`ModelSource`], the seam consumers query models through
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ifc_sheet_core::{IfcModel, ModelSource};
//!
//! let model = IfcModel::open("building.ifc")?;
//! for id in model.entities_of_category("IfcObject") {
//!     let name = model.attribute(id, "Name")?.and_then(|v| v.as_string());
//!     println!("#{} {} {:?}", id, model.type_name(id)?, name);
//! }
//! ```
//!
//! Scanning without building a model:
//!
//! ```rust
//! use ifc_sheet_core::EntityScanner;
//!
//! let content = "#1=IFCPROJECT('guid',$,$,$,$,$,$,$,$);";
//! let mut scanner = EntityScanner::new(content);
//! let (id, type_name, _, _) = scanner.next_entity().unwrap();
//! assert_eq!((id, type_name), (1, "IFCPROJECT"));
//! ```

pub mod decoder;
pub mod entity;
pub mod error;
pub mod model;
pub mod parser;
pub mod schema;

pub use decoder::EntityDecoder;
pub use entity::{AttributeValue, DecodedEntity};
pub use error::{Error, Result};
pub use model::{EntityId, IfcModel, ModelSource};
pub use parser::{decode_step_string, parse_entity, parse_header, EntityScanner, StepHeader, Token};
pub use schema::{IfcSchema, SchemaVersion};
