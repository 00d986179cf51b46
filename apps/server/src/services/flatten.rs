// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity flattening - one flat record per object entity.
//!
//! Each object contributes its identity (`GlobalId`, `Name`, `Type`,
//! `FileName`) and the single-valued properties reached through
//! `IsDefinedBy` -> property assignment -> property set -> properties.

use ifc_sheet_core::{AttributeValue, EntityId, ModelSource, Result};
use serde::Serialize;
use std::fmt;

/// Columns every record starts with, in this order.
pub const FIXED_COLUMNS: [&str; 4] = ["GlobalId", "Name", "Type", "FileName"];

/// Defined types whose integer payload stays an integer.
const INTEGER_TYPES: &[&str] = &[
    "IFCINTEGER",
    "IFCPOSITIVEINTEGER",
    "IFCCOUNTMEASURE",
    "IFCTIMESTAMP",
    "IFCDIMENSIONCOUNT",
    "IFCDAYINMONTHNUMBER",
    "IFCDAYINWEEKNUMBER",
    "IFCMONTHINYEARNUMBER",
    "IFCYEARNUMBER",
    "IFCHOURINDAY",
    "IFCMINUTEINHOUR",
    "IFCINTEGERCOUNTRATEMEASURE",
];

/// Scalar table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Text(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Unwrap a property's nominal value: `IFCLABEL('x')` -> `Text("x")`,
    /// `IFCBOOLEAN(.T.)` -> `Bool(true)`, `$` -> `Null`.
    pub fn from_nominal(value: &AttributeValue) -> Self {
        match value {
            AttributeValue::TypedValue(type_name, args) => {
                let Some(inner) = args.first() else {
                    return CellValue::Null;
                };
                Self::from_typed(type_name, inner)
            }
            other => Self::from_scalar(other),
        }
    }

    fn from_typed(type_name: &str, inner: &AttributeValue) -> Self {
        match (type_name, inner) {
            ("IFCBOOLEAN" | "IFCLOGICAL", AttributeValue::Enum(flag)) => match flag.as_str() {
                "T" => CellValue::Bool(true),
                "F" => CellValue::Bool(false),
                "U" => CellValue::Text("UNKNOWN".to_string()),
                other => CellValue::Text(other.to_string()),
            },
            (_, AttributeValue::Integer(i)) if !INTEGER_TYPES.contains(&type_name) => {
                CellValue::Real(*i as f64)
            }
            _ => Self::from_scalar(inner),
        }
    }

    fn from_scalar(value: &AttributeValue) -> Self {
        match value {
            AttributeValue::String(s) => CellValue::Text(s.clone()),
            AttributeValue::Enum(e) => CellValue::Text(e.clone()),
            AttributeValue::Integer(i) => CellValue::Integer(*i),
            AttributeValue::Float(f) => CellValue::Real(*f),
            AttributeValue::TypedValue(type_name, args) => match args.first() {
                Some(inner) => Self::from_typed(type_name, inner),
                None => CellValue::Null,
            },
            AttributeValue::List(items) => {
                let parts: Vec<String> = items
                    .iter()
                    .map(|item| Self::from_scalar(item).to_string())
                    .collect();
                CellValue::Text(parts.join(", "))
            }
            AttributeValue::EntityRef(_) | AttributeValue::Null | AttributeValue::Derived => {
                CellValue::Null
            }
        }
    }
}

/// Renders the way the cell reads in a table: nulls are empty.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Integer(i) => write!(f, "{}", i),
            CellValue::Real(r) => write!(f, "{}", r),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

/// Ordered column -> value mapping for one entity.
///
/// Setting an existing key replaces the value and keeps its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatRecord {
    fields: Vec<(String, CellValue)>,
}

impl FlatRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: CellValue) {
        let key = key.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Fields in insertion order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// What the flattener reads and what it drops.
#[derive(Debug, Clone)]
pub struct FlattenPolicy {
    /// Category enumerated for records.
    pub object_category: String,
    /// Record types dropped from the output.
    pub excluded_types: Vec<String>,
    /// Relationship kind that assigns property definitions.
    pub assignment_category: String,
    /// Property definitions that are read.
    pub property_set_category: String,
    /// Properties that are read; other kinds are skipped.
    pub property_category: String,
}

impl Default for FlattenPolicy {
    fn default() -> Self {
        Self {
            object_category: "IfcObject".into(),
            excluded_types: vec!["IfcGroup".into(), "IfcOpeningElement".into()],
            assignment_category: "IfcRelDefinesByProperties".into(),
            property_set_category: "IfcPropertySet".into(),
            property_category: "IfcPropertySingleValue".into(),
        }
    }
}

impl FlattenPolicy {
    /// Policy with a different excluded type list.
    pub fn with_excluded_types(excluded_types: Vec<String>) -> Self {
        Self {
            excluded_types,
            ..Self::default()
        }
    }

    /// Whether records of this type are dropped. Exact type match, not subtypes.
    pub fn excludes(&self, type_name: &str) -> bool {
        self.excluded_types
            .iter()
            .any(|excluded| excluded.eq_ignore_ascii_case(type_name))
    }

    pub fn is_property_assignment(&self, model: &impl ModelSource, rel: EntityId) -> bool {
        model.is_a(rel, &self.assignment_category)
    }

    pub fn is_property_set(&self, model: &impl ModelSource, definition: EntityId) -> bool {
        model.is_a(definition, &self.property_set_category)
    }

    pub fn is_single_value(&self, model: &impl ModelSource, property: EntityId) -> bool {
        model.is_a(property, &self.property_category)
    }
}

fn text_attribute(model: &impl ModelSource, entity: EntityId, name: &str) -> Result<CellValue> {
    Ok(match model.attribute(entity, name)? {
        Some(AttributeValue::String(s)) => CellValue::Text(s.clone()),
        _ => CellValue::Null,
    })
}

/// Flatten every object entity of a model into records, in model order.
pub fn flatten(
    model: &impl ModelSource,
    file_name: &str,
    policy: &FlattenPolicy,
) -> Result<Vec<FlatRecord>> {
    let objects = model.entities_of_category(&policy.object_category);
    let mut records = Vec::with_capacity(objects.len());

    for id in objects {
        let type_name = model.type_name(id)?.to_string();

        let mut record = FlatRecord::new();
        record.set("GlobalId", text_attribute(model, id, "GlobalId")?);
        record.set("Name", text_attribute(model, id, "Name")?);
        record.set("Type", CellValue::Text(type_name.clone()));
        record.set("FileName", CellValue::Text(file_name.to_string()));

        for rel in model.related(id, "IsDefinedBy")? {
            if !policy.is_property_assignment(model, rel) {
                continue;
            }
            let Some(definition) = model.attribute(rel, "RelatingPropertyDefinition")? else {
                continue;
            };
            for pset in model.resolve(definition)? {
                if !policy.is_property_set(model, pset) {
                    continue;
                }
                collect_properties(model, pset, policy, &mut record)?;
            }
        }

        records.push((type_name, record));
    }

    let total = records.len();
    let records: Vec<FlatRecord> = records
        .into_iter()
        .filter(|(type_name, _)| !policy.excludes(type_name))
        .map(|(_, record)| record)
        .collect();

    tracing::debug!(
        file_name = %file_name,
        objects = total,
        records = records.len(),
        excluded = total - records.len(),
        "Flattened model"
    );

    Ok(records)
}

fn collect_properties(
    model: &impl ModelSource,
    pset: EntityId,
    policy: &FlattenPolicy,
    record: &mut FlatRecord,
) -> Result<()> {
    let Some(properties) = model.attribute(pset, "HasProperties")? else {
        return Ok(());
    };

    for property in model.resolve(properties)? {
        if !policy.is_single_value(model, property) {
            continue;
        }
        let Some(name) = model.attribute(property, "Name")?.and_then(|v| v.as_string()) else {
            continue;
        };
        // Identity columns are never overwritten by a property of the same name
        if FIXED_COLUMNS.contains(&name) {
            continue;
        }
        let value = model
            .attribute(property, "NominalValue")?
            .map(CellValue::from_nominal)
            .unwrap_or_default();
        record.set(name, value);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_fixtures::{
        step_file, INFRASTRUCTURE_4X3, LEGACY_2X3, SCENARIO_A, WALL_WITH_OPENING,
    };
    use ifc_sheet_core::IfcModel;

    fn flatten_text(content: &str) -> Vec<FlatRecord> {
        let model = IfcModel::parse(content).unwrap();
        flatten(&model, "model.ifc", &FlattenPolicy::default()).unwrap()
    }

    #[test]
    fn test_nominal_value_unwrapping() {
        let typed = |name: &str, inner: AttributeValue| {
            AttributeValue::TypedValue(name.to_string(), vec![inner])
        };
        let e = |s: &str| AttributeValue::Enum(s.to_string());

        assert_eq!(CellValue::from_nominal(&typed("IFCBOOLEAN", e("T"))), CellValue::Bool(true));
        assert_eq!(CellValue::from_nominal(&typed("IFCBOOLEAN", e("F"))), CellValue::Bool(false));
        assert_eq!(
            CellValue::from_nominal(&typed("IFCLOGICAL", e("U"))),
            CellValue::Text("UNKNOWN".into())
        );
        assert_eq!(
            CellValue::from_nominal(&typed("IFCINTEGER", AttributeValue::Integer(4))),
            CellValue::Integer(4)
        );
        assert_eq!(
            CellValue::from_nominal(&typed("IFCLENGTHMEASURE", AttributeValue::Integer(4))),
            CellValue::Real(4.0)
        );
        assert_eq!(
            CellValue::from_nominal(&typed("IFCAREAMEASURE", AttributeValue::Float(2.5))),
            CellValue::Real(2.5)
        );
        assert_eq!(
            CellValue::from_nominal(&typed("IFCLABEL", AttributeValue::String("Oak".into()))),
            CellValue::Text("Oak".into())
        );
        assert_eq!(CellValue::from_nominal(&e("NOTDEFINED")), CellValue::Text("NOTDEFINED".into()));
        assert_eq!(CellValue::from_nominal(&AttributeValue::Null), CellValue::Null);
    }

    #[test]
    fn test_record_overwrites_in_place() {
        let mut record = FlatRecord::new();
        record.set("A", CellValue::Integer(1));
        record.set("B", CellValue::Integer(2));
        record.set("A", CellValue::Integer(3));

        let fields: Vec<_> = record.fields().collect();
        assert_eq!(fields, vec![("A", &CellValue::Integer(3)), ("B", &CellValue::Integer(2))]);
    }

    #[test]
    fn test_policy_predicates() {
        let policy = FlattenPolicy::default();
        assert!(policy.excludes("IfcGroup"));
        assert!(policy.excludes("IfcOpeningElement"));
        assert!(!policy.excludes("IfcWall"));
        // Subtypes of excluded types are kept
        assert!(!policy.excludes("IfcZone"));
        assert!(!policy.excludes("IfcOpeningStandardCase"));
    }

    #[test]
    fn test_scenario_a() {
        let records = flatten_text(SCENARIO_A);

        assert_eq!(records.len(), 2);
        let wall = &records[0];
        assert_eq!(wall.get("Type"), Some(&CellValue::Text("IfcWall".into())));
        assert_eq!(wall.get("GlobalId"), Some(&CellValue::Text("wall-guid".into())));
        assert_eq!(wall.get("FileName"), Some(&CellValue::Text("model.ifc".into())));
        assert_eq!(wall.get("Material"), Some(&CellValue::Text("Concrete".into())));

        let door = &records[1];
        assert_eq!(door.get("Type"), Some(&CellValue::Text("IfcDoor".into())));
        assert_eq!(door.get("Name"), Some(&CellValue::Null));
        assert_eq!(door.get("Material"), None);
        assert_eq!(door.len(), FIXED_COLUMNS.len());
    }

    #[test]
    fn test_fixed_columns_lead() {
        let records = flatten_text(SCENARIO_A);
        let keys: Vec<&str> = records[0].fields().map(|(k, _)| k).collect();
        assert_eq!(&keys[..4], &FIXED_COLUMNS);
    }

    #[test]
    fn test_last_property_set_wins() {
        let content = step_file(
            "IFC4",
            "#1=IFCWALL('w',$,'Wall',$,$,$,$,$,$);
#2=IFCPROPERTYSINGLEVALUE('FireRating',$,IFCLABEL('EI30'),$);
#3=IFCPROPERTYSINGLEVALUE('FireRating',$,IFCLABEL('EI60'),$);
#4=IFCPROPERTYSINGLEVALUE('Type',$,IFCLABEL('Shadow'),$);
#5=IFCPROPERTYSET('a',$,'Pset_A',$,(#2,#4));
#6=IFCPROPERTYSET('b',$,'Pset_B',$,(#3));
#7=IFCRELDEFINESBYPROPERTIES('r1',$,$,$,(#1),#5);
#8=IFCRELDEFINESBYPROPERTIES('r2',$,$,$,(#1),#6);",
        );
        let records = flatten_text(&content);

        assert_eq!(records[0].get("FireRating"), Some(&CellValue::Text("EI60".into())));
        assert_eq!(records[0].get("Type"), Some(&CellValue::Text("IfcWall".into())));
    }

    #[test]
    fn test_skips_non_simple_properties_and_quantities() {
        let content = step_file(
            "IFC4",
            "#1=IFCSLAB('s',$,'Slab',$,$,$,$,$,$);
#2=IFCPROPERTYENUMERATEDVALUE('Finish',$,(IFCLABEL('Matt')),$);
#3=IFCPROPERTYSINGLEVALUE('LoadBearing',$,IFCBOOLEAN(.T.),$);
#4=IFCPROPERTYSINGLEVALUE('Remark',$,$,$);
#5=IFCPROPERTYSET('p',$,'Pset_SlabCommon',$,(#2,#3,#4));
#6=IFCQUANTITYAREA('GrossArea',$,$,12.5,$);
#7=IFCELEMENTQUANTITY('q',$,'Qto',$,$,(#6));
#8=IFCRELDEFINESBYPROPERTIES('r1',$,$,$,(#1),#5);
#9=IFCRELDEFINESBYPROPERTIES('r2',$,$,$,(#1),#7);",
        );
        let records = flatten_text(&content);

        let slab = &records[0];
        assert_eq!(slab.get("Finish"), None);
        assert_eq!(slab.get("GrossArea"), None);
        assert_eq!(slab.get("LoadBearing"), Some(&CellValue::Bool(true)));
        assert_eq!(slab.get("Remark"), Some(&CellValue::Null));
    }

    #[test]
    fn test_record_count_matches_objects_minus_excluded() {
        let model = IfcModel::parse(SCENARIO_A).unwrap();
        let policy = FlattenPolicy::default();
        let objects = model.entities_of_category(&policy.object_category);
        let excluded = objects
            .iter()
            .filter(|&&id| policy.excludes(model.type_name(id).unwrap()))
            .count();

        let records = flatten(&model, "a.ifc", &policy).unwrap();
        assert_eq!(records.len(), objects.len() - excluded);
        assert!(records
            .iter()
            .all(|r| !matches!(r.get("Type"), Some(CellValue::Text(t)) if policy.excludes(t))));
    }

    fn types(records: &[FlatRecord]) -> Vec<&CellValue> {
        records.iter().filter_map(|r| r.get("Type")).collect()
    }

    #[test]
    fn test_drops_openings_and_groups() {
        let records = flatten_text(WALL_WITH_OPENING);

        assert_eq!(types(&records), vec![&CellValue::Text("IfcWall".into())]);
        assert_eq!(records[0].get("GlobalId"), Some(&CellValue::Text("wall-guid".into())));
        // The opening's property set does not leak onto the wall
        assert_eq!(records[0].get("Depth"), None);
    }

    #[test]
    fn test_infrastructure_objects_are_records() {
        let records = flatten_text(INFRASTRUCTURE_4X3);
        assert_eq!(
            types(&records),
            vec![
                &CellValue::Text("IfcAlignmentSegment".into()),
                &CellValue::Text("IfcLiquidTerminal".into()),
                &CellValue::Text("IfcWall".into()),
            ]
        );
    }

    #[test]
    fn test_legacy_objects_are_records() {
        let records = flatten_text(LEGACY_2X3);
        assert_eq!(
            types(&records),
            vec![
                &CellValue::Text("IfcChamferEdgeFeature".into()),
                &CellValue::Text("IfcMove".into()),
            ]
        );
    }

    #[test]
    fn test_flatten_is_deterministic() {
        assert_eq!(flatten_text(SCENARIO_A), flatten_text(SCENARIO_A));
    }

    #[test]
    fn test_custom_excluded_types() {
        let model = IfcModel::parse(SCENARIO_A).unwrap();
        let policy = FlattenPolicy::with_excluded_types(vec!["IfcDoor".into()]);
        let records = flatten(&model, "a.ifc", &policy).unwrap();

        let types: Vec<_> = records.iter().filter_map(|r| r.get("Type")).collect();
        assert_eq!(
            types,
            vec![&CellValue::Text("IfcGroup".into()), &CellValue::Text("IfcWall".into())]
        );
    }
}
