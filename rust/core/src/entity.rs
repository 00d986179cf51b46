// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoded entity instances and their attribute values.

use crate::parser::{decode_step_string, Token};

/// IFC entity attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// Entity reference
    EntityRef(u32),
    /// String value, escapes decoded
    String(String),
    /// Integer value
    Integer(i64),
    /// Float value
    Float(f64),
    /// Enum value without the surrounding dots
    Enum(String),
    /// List of values
    List(Vec<AttributeValue>),
    /// Value wrapped in its defined type: IFCLABEL('x') -> ("IFCLABEL", [String("x")])
    TypedValue(String, Vec<AttributeValue>),
    /// Null/undefined
    Null,
    /// Derived value (*)
    Derived,
}

impl AttributeValue {
    /// Convert from Token
    pub fn from_token(token: &Token) -> Self {
        match token {
            Token::EntityRef(id) => AttributeValue::EntityRef(*id),
            Token::String(s) => AttributeValue::String(decode_step_string(s)),
            Token::Integer(i) => AttributeValue::Integer(*i),
            Token::Float(f) => AttributeValue::Float(*f),
            Token::Enum(e) => AttributeValue::Enum(e.to_string()),
            Token::List(items) => AttributeValue::List(items.iter().map(Self::from_token).collect()),
            Token::TypedValue(type_name, args) => AttributeValue::TypedValue(
                type_name.to_string(),
                args.iter().map(Self::from_token).collect(),
            ),
            Token::Null => AttributeValue::Null,
            Token::Derived => AttributeValue::Derived,
        }
    }

    #[inline]
    pub fn as_entity_ref(&self) -> Option<u32> {
        match self {
            AttributeValue::EntityRef(id) => Some(*id),
            _ => None,
        }
    }

    #[inline]
    pub fn as_string(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_enum(&self) -> Option<&str> {
        match self {
            AttributeValue::Enum(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            AttributeValue::Float(f) => Some(*f),
            AttributeValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list(&self) -> Option<&[AttributeValue]> {
        match self {
            AttributeValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Defined type name and inner value of a typed value
    #[inline]
    pub fn as_typed(&self) -> Option<(&str, Option<&AttributeValue>)> {
        match self {
            AttributeValue::TypedValue(type_name, args) => Some((type_name, args.first())),
            _ => None,
        }
    }

    /// Entity references held by this value: the reference itself, or every
    /// reference in a list
    pub fn entity_refs(&self) -> Vec<u32> {
        match self {
            AttributeValue::EntityRef(id) => vec![*id],
            AttributeValue::List(items) => items.iter().filter_map(|v| v.as_entity_ref()).collect(),
            _ => Vec::new(),
        }
    }

    /// Check if null/derived
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null | AttributeValue::Derived)
    }
}

/// Decoded IFC entity with attributes
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedEntity {
    pub id: u32,
    /// Type name as written in the file (upper case)
    pub type_name: String,
    pub attributes: Vec<AttributeValue>,
}

impl DecodedEntity {
    pub fn new(id: u32, type_name: impl Into<String>, attributes: Vec<AttributeValue>) -> Self {
        Self {
            id,
            type_name: type_name.into(),
            attributes,
        }
    }

    /// Get attribute by index
    pub fn get(&self, index: usize) -> Option<&AttributeValue> {
        self.attributes.get(index)
    }

    pub fn get_ref(&self, index: usize) -> Option<u32> {
        self.get(index).and_then(|v| v.as_entity_ref())
    }

    pub fn get_string(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(|v| v.as_string())
    }

    pub fn get_float(&self, index: usize) -> Option<f64> {
        self.get(index).and_then(|v| v.as_float())
    }
}
