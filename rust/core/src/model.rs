// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Model access
//!
//! [`ModelSource`] is the narrow query surface consumers read models
//! through: enumerate by category, test a category, follow an inverse
//! relationship, read a named attribute and resolve a reference.
//! [`IfcModel`] implements it over STEP text.

use crate::decoder::EntityDecoder;
use crate::entity::{AttributeValue, DecodedEntity};
use crate::error::{Error, Result};
use crate::parser::{parse_header, EntityScanner, StepHeader};
use crate::schema::{IfcSchema, SchemaVersion};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Instance id as written in the file (`#42` -> 42)
pub type EntityId = u32;

/// Read-only queries over a parsed model
pub trait ModelSource {
    /// Entities that are `category` or one of its subtypes, in file order
    fn entities_of_category(&self, category: &str) -> Vec<EntityId>;

    /// Whether the entity is `category` or one of its subtypes
    fn is_a(&self, entity: EntityId, category: &str) -> bool;

    /// Most specific declared type, canonical spelling when known
    fn type_name(&self, entity: EntityId) -> Result<&str>;

    /// Entities reaching this one through a named inverse relationship
    fn related(&self, entity: EntityId, relationship: &str) -> Result<Vec<EntityId>>;

    /// Named explicit attribute. `Ok(None)` when the instance omits it.
    fn attribute(&self, entity: EntityId, name: &str) -> Result<Option<&AttributeValue>>;

    /// Follow a forward reference, or each reference of a set
    fn resolve(&self, value: &AttributeValue) -> Result<Vec<EntityId>>;
}

/// Inverse relationships and the relationship entities that feed them
const INVERSES: &[(&str, &str, &str)] = &[
    // (inverse name, relationship category, forward attribute)
    ("IsDefinedBy", "IfcRelDefinesByProperties", "RelatedObjects"),
    ("IsTypedBy", "IfcRelDefinesByType", "RelatedObjects"),
];

enum Instance {
    /// Schema type; attributes are kept for queries
    Known {
        canonical: &'static str,
        entity: DecodedEntity,
    },
    /// Geometry, resources and unknown types: validated, then only the
    /// type name is kept
    Other { id: EntityId, type_name: Arc<str> },
}

impl Instance {
    fn id(&self) -> EntityId {
        match self {
            Self::Known { entity, .. } => entity.id,
            Self::Other { id, .. } => *id,
        }
    }

    fn canonical(&self) -> Option<&'static str> {
        match self {
            Self::Known { canonical, .. } => Some(*canonical),
            Self::Other { .. } => None,
        }
    }
}

/// Parsed IFC model held in memory
pub struct IfcModel {
    header: StepHeader,
    schema: &'static IfcSchema,
    /// Instances in file order
    instances: Vec<Instance>,
    positions: FxHashMap<EntityId, usize>,
    /// (inverse name, target) -> relationship entities, in file order
    inverses: FxHashMap<(&'static str, EntityId), Vec<EntityId>>,
    /// Rooted types (GlobalId first) missing from the schema, with counts
    unclassified: BTreeMap<String, usize>,
}

impl IfcModel {
    /// Read and parse a model file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(bytes)
    }

    /// Parse a model from raw file bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let content = String::from_utf8(bytes)?;
        Self::parse(&content)
    }

    /// Parse a model from STEP text
    ///
    /// Every instance is decoded once, so a malformed instance fails here
    /// rather than during queries. Only schema types keep their attributes.
    pub fn parse(content: &str) -> Result<Self> {
        let body = content.trim_start_matches('\u{feff}').trim_start();
        if !body.starts_with("ISO-10303-21") {
            return Err(Error::parse(0, "Missing ISO-10303-21 file marker"));
        }

        let header = parse_header(content)?;
        let version = header
            .schema_identifiers
            .first()
            .map(|id| SchemaVersion::from_identifier(id))
            .unwrap_or_default();
        let schema = IfcSchema::get(version);

        let decoder = EntityDecoder::new(content);
        let mut instances = Vec::new();
        let mut positions = FxHashMap::default();
        let mut type_names: FxHashMap<String, Arc<str>> = FxHashMap::default();
        let mut unclassified = BTreeMap::new();
        let mut scanner = EntityScanner::new(content);
        while let Some((id, _, start, end)) = scanner.next_entity() {
            let entity = decoder.decode_at(start, end)?;
            if positions.insert(id, instances.len()).is_some() {
                return Err(Error::parse(start, format!("Duplicate entity id #{}", id)));
            }
            let instance = match schema.canonical_name(&entity.type_name) {
                Some(canonical) => Instance::Known { canonical, entity },
                None => {
                    if has_global_id(&entity) {
                        *unclassified.entry(entity.type_name.clone()).or_insert(0) += 1;
                    }
                    let type_name = type_names
                        .entry(entity.type_name)
                        .or_insert_with_key(|name| Arc::from(name.as_str()))
                        .clone();
                    Instance::Other { id, type_name }
                }
            };
            instances.push(instance);
        }

        let mut model = Self {
            header,
            schema,
            instances,
            positions,
            inverses: FxHashMap::default(),
            unclassified,
        };
        model.build_inverses();
        Ok(model)
    }

    fn build_inverses(&mut self) {
        let mut inverses: FxHashMap<(&'static str, EntityId), Vec<EntityId>> = FxHashMap::default();

        for instance in &self.instances {
            let Instance::Known {
                canonical: type_name,
                entity,
            } = instance
            else {
                continue;
            };
            for (inverse, category, forward) in INVERSES {
                if !self.schema.is_subtype_of(type_name, category) {
                    continue;
                }
                let Some(index) = self.schema.attribute_index(type_name, forward) else {
                    continue;
                };
                let Some(value) = entity.get(index) else {
                    continue;
                };
                for target in value.entity_refs() {
                    inverses
                        .entry((*inverse, target))
                        .or_default()
                        .push(entity.id);
                }
            }
        }

        // IFC2X3 reaches type objects through IsDefinedBy too
        if self.schema.version() == SchemaVersion::Ifc2x3 {
            for ((inverse, target), rels) in inverses.clone() {
                if inverse == "IsTypedBy" {
                    inverses.entry(("IsDefinedBy", target)).or_default().extend(rels);
                }
            }
            for rels in inverses.values_mut() {
                rels.sort_by_key(|id| self.positions.get(id).copied().unwrap_or(usize::MAX));
            }
        }

        self.inverses = inverses;
    }

    fn instance(&self, entity: EntityId) -> Result<&Instance> {
        self.positions
            .get(&entity)
            .map(|&pos| &self.instances[pos])
            .ok_or(Error::EntityNotFound(entity))
    }

    /// Decoded attributes of a schema-typed instance
    ///
    /// `Ok(None)` for instances whose attributes are not kept.
    pub fn entity(&self, entity: EntityId) -> Result<Option<&DecodedEntity>> {
        Ok(match self.instance(entity)? {
            Instance::Known { entity, .. } => Some(entity),
            Instance::Other { .. } => None,
        })
    }

    /// Rooted types the schema does not know, with instance counts.
    /// Their instances are in no category.
    pub fn unclassified_types(&self) -> &BTreeMap<String, usize> {
        &self.unclassified
    }

    pub fn header(&self) -> &StepHeader {
        &self.header
    }

    pub fn schema_version(&self) -> SchemaVersion {
        self.schema.version()
    }

    /// Number of instances in the DATA section
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

/// IfcRoot instances open with a 22 character GlobalId
fn has_global_id(entity: &DecodedEntity) -> bool {
    entity.get_string(0).is_some_and(|value| {
        value.len() == 22
            && value
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'$')
    })
}

impl ModelSource for IfcModel {
    fn entities_of_category(&self, category: &str) -> Vec<EntityId> {
        self.instances
            .iter()
            .filter(|instance| {
                instance
                    .canonical()
                    .is_some_and(|name| self.schema.is_subtype_of(name, category))
            })
            .map(Instance::id)
            .collect()
    }

    fn is_a(&self, entity: EntityId, category: &str) -> bool {
        self.instance(entity)
            .ok()
            .and_then(Instance::canonical)
            .is_some_and(|name| self.schema.is_subtype_of(name, category))
    }

    fn type_name(&self, entity: EntityId) -> Result<&str> {
        Ok(match self.instance(entity)? {
            Instance::Known { canonical, .. } => *canonical,
            Instance::Other { type_name, .. } => &**type_name,
        })
    }

    fn related(&self, entity: EntityId, relationship: &str) -> Result<Vec<EntityId>> {
        self.instance(entity)?;
        let Some((inverse, _, _)) = INVERSES
            .iter()
            .find(|(name, _, _)| name.eq_ignore_ascii_case(relationship))
        else {
            return Err(Error::UnknownAttribute {
                type_name: self.type_name(entity)?.to_string(),
                attribute: relationship.to_string(),
            });
        };
        Ok(self
            .inverses
            .get(&(*inverse, entity))
            .cloned()
            .unwrap_or_default())
    }

    fn attribute(&self, entity: EntityId, name: &str) -> Result<Option<&AttributeValue>> {
        let unknown = |type_name: &str| Error::UnknownAttribute {
            type_name: type_name.to_string(),
            attribute: name.to_string(),
        };
        match self.instance(entity)? {
            Instance::Known { canonical, entity } => {
                let index = self
                    .schema
                    .attribute_index(canonical, name)
                    .ok_or_else(|| unknown(*canonical))?;
                Ok(entity.get(index))
            }
            Instance::Other { type_name, .. } => Err(unknown(&**type_name)),
        }
    }

    fn resolve(&self, value: &AttributeValue) -> Result<Vec<EntityId>> {
        let ids = match value {
            // Defined-type sets, e.g. IFCPROPERTYSETDEFINITIONSET((#1,#2))
            AttributeValue::TypedValue(_, args) => match args.first() {
                Some(inner) => return self.resolve(inner),
                None => Vec::new(),
            },
            other => other.entity_refs(),
        };
        for id in &ids {
            self.instance(*id)?;
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(schema: &str, data: &str) -> String {
        format!(
            "ISO-10303-21;\nHEADER;\nFILE_DESCRIPTION(('ViewDefinition [CoordinationView]'),'2;1');\nFILE_NAME('test.ifc','2024-01-01T00:00:00',(''),(''),'','','');\nFILE_SCHEMA(('{}'));\nENDSEC;\nDATA;\n{}\nENDSEC;\nEND-ISO-10303-21;\n",
            schema, data
        )
    }

    const DATA: &str = "#1=IFCWALL('0wall',$,'Wall A',$,$,$,$,$);
#2=IFCPROPERTYSINGLEVALUE('Material',$,IFCLABEL('Concrete'),$);
#3=IFCPROPERTYSET('0pset',$,'Pset_Wall',$,(#2));
#4=IFCRELDEFINESBYPROPERTIES('0rel',$,$,$,(#1),#3);
#5=IFCDOOR('0door',$,'Door',$,$,$,$,$,$,$);
#6=IFCWALLTYPE('0type',$,'Type',$,$,$,$,$,$,$);
#7=IFCRELDEFINESBYTYPE('0reltype',$,$,$,(#1),#6);";

    #[test]
    fn test_entities_in_file_order() {
        let model = IfcModel::parse(&step("IFC4", DATA)).unwrap();
        assert_eq!(model.len(), 7);
        assert_eq!(model.entities_of_category("IfcObject"), vec![1, 5]);
        assert_eq!(model.type_name(1).unwrap(), "IfcWall");
        assert_eq!(model.type_name(5).unwrap(), "IfcDoor");
        assert!(model.is_a(4, "IfcRelDefinesByProperties"));
        assert!(!model.is_a(6, "IfcObject"));
        assert!(!model.is_a(99, "IfcObject"));
    }

    #[test]
    fn test_named_attributes() {
        let model = IfcModel::parse(&step("IFC4", DATA)).unwrap();
        let global_id = model.attribute(1, "GlobalId").unwrap().unwrap();
        assert_eq!(global_id.as_string(), Some("0wall"));
        let nominal = model.attribute(2, "NominalValue").unwrap().unwrap();
        assert_eq!(nominal.as_typed().map(|(t, _)| t), Some("IFCLABEL"));
        assert!(matches!(
            model.attribute(1, "HasProperties"),
            Err(Error::UnknownAttribute { .. })
        ));
    }

    #[test]
    fn test_is_defined_by_per_release() {
        let ifc4 = IfcModel::parse(&step("IFC4", DATA)).unwrap();
        assert_eq!(ifc4.related(1, "IsDefinedBy").unwrap(), vec![4]);
        assert_eq!(ifc4.related(1, "IsTypedBy").unwrap(), vec![7]);
        assert!(ifc4.related(5, "IsDefinedBy").unwrap().is_empty());

        let ifc2x3 = IfcModel::parse(&step("IFC2X3", DATA)).unwrap();
        assert_eq!(ifc2x3.schema_version(), SchemaVersion::Ifc2x3);
        assert_eq!(ifc2x3.related(1, "IsDefinedBy").unwrap(), vec![4, 7]);
    }

    #[test]
    fn test_resolve() {
        let model = IfcModel::parse(&step("IFC4", DATA)).unwrap();
        let definition = model.attribute(4, "RelatingPropertyDefinition").unwrap().unwrap();
        assert_eq!(model.resolve(definition).unwrap(), vec![3]);

        let props = model.attribute(3, "HasProperties").unwrap().unwrap();
        assert_eq!(model.resolve(props).unwrap(), vec![2]);

        let set = AttributeValue::TypedValue(
            "IFCPROPERTYSETDEFINITIONSET".to_string(),
            vec![AttributeValue::List(vec![AttributeValue::EntityRef(3)])],
        );
        assert_eq!(model.resolve(&set).unwrap(), vec![3]);

        assert!(matches!(
            model.resolve(&AttributeValue::EntityRef(404)),
            Err(Error::EntityNotFound(404))
        ));
    }

    #[test]
    fn test_geometry_is_validated_but_not_kept() {
        let data = "#1=IFCWALL('0wall',$,'Wall A',$,$,$,$,$);\n#8=IFCCARTESIANPOINT((0.,0.,0.));";
        let model = IfcModel::parse(&step("IFC4", data)).unwrap();
        assert_eq!(model.len(), 2);
        assert!(model.entity(1).unwrap().is_some());
        assert!(model.entity(8).unwrap().is_none());
        assert_eq!(model.type_name(8).unwrap(), "IFCCARTESIANPOINT");
        assert!(matches!(
            model.attribute(8, "Coordinates"),
            Err(Error::UnknownAttribute { .. })
        ));
        assert!(model.unclassified_types().is_empty());

        let broken = step("IFC4", "#1=IFCWALL('0wall',$,'Wall A',$,$,$,$,$);\n#8=IFCCARTESIANPOINT((0.,0.,0.);");
        assert!(matches!(IfcModel::parse(&broken), Err(Error::Parse { .. })));
    }

    #[test]
    fn test_counts_unclassified_rooted_types() {
        let data = "#1=IFCWALL('0wall',$,'Wall A',$,$,$,$,$);
#2=IFCFUTUREWIDGET('2O2Fr$t4X7Zf8NOew3FLOH',$,'Widget',$,$,$,$,$);
#3=IFCFUTUREWIDGET('1kTvXnbbzCWw8lcMd1dR4o',$,'Widget',$,$,$,$,$);
#4=IFCFUTUREPOINT('not a guid',0.);";
        let model = IfcModel::parse(&step("IFC4", data)).unwrap();
        assert_eq!(model.entities_of_category("IfcObject"), vec![1]);
        let unclassified: Vec<(&str, usize)> = model
            .unclassified_types()
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
            .collect();
        assert_eq!(unclassified, vec![("IFCFUTUREWIDGET", 2)]);
    }

    #[test]
    fn test_rejects_non_step_content() {
        assert!(IfcModel::parse("not a model").is_err());
        assert!(IfcModel::from_bytes(vec![0xff, 0xfe, 0x00]).is_err());
    }

    #[test]
    fn test_rejects_malformed_instance() {
        let content = step("IFC4", "#1=IFCWALL('0wall',$,'Wall A',$,$,$,$,$);\n#2=IFCDOOR('x',,);");
        let err = IfcModel::parse(&content).err().unwrap();
        assert!(matches!(err, Error::Parse { .. }));
    }
}
