// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity Decoder - instance records to attribute values
//!
//! Decodes one `#id=TYPE(...);` record at a time from the byte spans the
//! [`EntityScanner`](crate::parser::EntityScanner) reports.

use crate::entity::{AttributeValue, DecodedEntity};
use crate::error::{Error, Result};
use crate::parser::parse_entity;

/// Decoder over the text of one STEP file
pub struct EntityDecoder<'a> {
    content: &'a str,
}

impl<'a> EntityDecoder<'a> {
    pub fn new(content: &'a str) -> Self {
        Self { content }
    }

    /// Decode the record spanning `start..end`
    ///
    /// Parse errors carry the record's offset and its first 100 characters.
    pub fn decode_at(&self, start: usize, end: usize) -> Result<DecodedEntity> {
        let line = &self.content[start..end];
        let (id, type_name, tokens) = parse_entity(line).map_err(|e| {
            let message = match e {
                Error::Parse { message, .. } => message,
                other => other.to_string(),
            };
            Error::parse(
                start,
                format!("{}, input: {:?}", message, &line[..line.floor_char_boundary_compat(100)]),
            )
        })?;

        let attributes = tokens.iter().map(AttributeValue::from_token).collect();
        Ok(DecodedEntity::new(id, type_name, attributes))
    }
}

trait FloorCharBoundary {
    fn floor_char_boundary_compat(&self, index: usize) -> usize;
}

impl FloorCharBoundary for str {
    fn floor_char_boundary_compat(&self, index: usize) -> usize {
        let mut i = index.min(self.len());
        while !self.is_char_boundary(i) {
            i -= 1;
        }
        i
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::EntityScanner;

    const CONTENT: &str = "DATA;\n#1=IFCWALL('g1',$,'Wall',$,$,$,$,$);\n#2 = IFCPROPERTYSET('g2',$,'Pset',$,(#3,#4));\n#3=IFCPROPERTYSINGLEVALUE('A',$,IFCLABEL('x'),$);\n#4=IFCPROPERTYSINGLEVALUE('B',$,$,$);\nENDSEC;\n";

    fn decode_all(content: &str) -> Vec<DecodedEntity> {
        let decoder = EntityDecoder::new(content);
        let mut scanner = EntityScanner::new(content);
        let mut entities = Vec::new();
        while let Some((_, _, start, end)) = scanner.next_entity() {
            entities.push(decoder.decode_at(start, end).unwrap());
        }
        entities
    }

    #[test]
    fn test_decode_scanned_records() {
        let entities = decode_all(CONTENT);
        assert_eq!(entities.len(), 4);
        assert_eq!(entities[0].type_name, "IFCWALL");
        assert_eq!(entities[0].get_string(2), Some("Wall"));
        assert_eq!(entities[1].id, 2);
    }

    #[test]
    fn test_property_set_references() {
        let entities = decode_all(CONTENT);
        assert_eq!(entities[1].get(4).unwrap().entity_refs(), vec![3, 4]);
        assert_eq!(entities[3].get_string(0), Some("B"));
        assert!(entities[3].get(2).unwrap().is_null());
    }

    #[test]
    fn test_error_reports_offset_and_excerpt() {
        let content = format!("#1=IFCWALL('{}',,);", "é".repeat(80));
        let decoder = EntityDecoder::new(&content);
        match decoder.decode_at(0, content.len()) {
            Err(Error::Parse { position, message }) => {
                assert_eq!(position, 0);
                assert!(message.contains("#1=IFCWALL"));
            }
            other => panic!("expected parse error, got {:?}", other.map(|e| e.id)),
        }
    }
}
