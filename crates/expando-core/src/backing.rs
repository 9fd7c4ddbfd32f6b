//! Backing store and member resolution.
//!
//! A member name resolves against the backing in two modes: declared-field
//! lookup on a typed record, or key lookup/upsert on a dictionary. Reads of
//! absent members are `None`, never an error; writes of undeclared members
//! on a strict record are refused with `Ok(false)` rather than failing.

use std::sync::Arc;

use expando_shape::{convert, ConvertError, FieldType, RecordShape, Shape, RESERVED_MEMBER_NAMES};
use serde_json::{Map, Value};

/// The concrete in-memory store behind an extensible object.
#[derive(Debug, Clone, PartialEq)]
pub enum Backing {
    /// A typed record instance: every declared field is present (`Null`
    /// until set), nothing else is addressable.
    Typed {
        shape: Arc<RecordShape>,
        fields: Map<String, Value>,
    },
    /// A string-keyed dictionary; every upsert converts through the
    /// declared value type (`Any` for open contracts).
    Dictionary {
        value_ty: FieldType,
        entries: Map<String, Value>,
    },
}

impl Backing {
    /// Default-valued backing for a contract shape. A `Ref` that was not
    /// resolved against a registry falls back to a dictionary instead of
    /// failing.
    pub fn from_shape(shape: &Shape) -> Self {
        match shape {
            Shape::Record(rec) => Self::Typed {
                shape: rec.clone(),
                fields: rec.default_body(),
            },
            Shape::Map(vt) => Self::Dictionary {
                value_ty: vt.clone(),
                entries: Map::new(),
            },
            Shape::Open => Self::open(),
            Shape::Ref(name) => {
                tracing::debug!(shape = %name, "unresolved shape reference, using dictionary backing");
                Self::open()
            }
        }
    }

    /// Backing for a decoded, shape-bound document body.
    pub fn from_body(shape: &Shape, body: Map<String, Value>) -> Self {
        match shape {
            Shape::Record(rec) => Self::Typed {
                shape: rec.clone(),
                fields: body,
            },
            Shape::Map(vt) => Self::Dictionary {
                value_ty: vt.clone(),
                entries: body,
            },
            Shape::Open | Shape::Ref(_) => Self::Dictionary {
                value_ty: FieldType::Any,
                entries: body,
            },
        }
    }

    fn open() -> Self {
        Self::Dictionary {
            value_ty: FieldType::Any,
            entries: Map::new(),
        }
    }

    pub fn is_dictionary(&self) -> bool {
        matches!(self, Self::Dictionary { .. })
    }

    /// Resolve a member read. Declared fields and present keys yield their
    /// value; everything else (including reserved names) is absent.
    pub fn get(&self, name: &str) -> Option<Value> {
        if RESERVED_MEMBER_NAMES.contains(&name) {
            return None;
        }
        match self {
            Self::Typed { fields, .. } => fields.get(name).cloned(),
            Self::Dictionary { entries, .. } => entries.get(name).cloned(),
        }
    }

    /// Resolve a member write. Returns whether the write was applied; a
    /// failed conversion into a declared field leaves the member unchanged.
    pub fn set(&mut self, name: &str, value: Value) -> Result<bool, ConvertError> {
        if RESERVED_MEMBER_NAMES.contains(&name) {
            return Ok(false);
        }
        match self {
            Self::Typed { shape, fields } => match shape.field(name) {
                Some(def) => {
                    let converted = convert(value, &def.ty)?;
                    fields.insert(name.to_string(), converted);
                    Ok(true)
                }
                None => Ok(false),
            },
            Self::Dictionary { value_ty, entries } => {
                let converted = convert(value, value_ty)?;
                entries.insert(name.to_string(), converted);
                Ok(true)
            }
        }
    }

    /// The live store rendered as a document for encoding.
    pub fn to_value(&self) -> Value {
        Value::Object(self.body().clone())
    }

    pub fn body(&self) -> &Map<String, Value> {
        match self {
            Self::Typed { fields, .. } => fields,
            Self::Dictionary { entries, .. } => entries,
        }
    }

    pub fn body_mut(&mut self) -> &mut Map<String, Value> {
        match self {
            Self::Typed { fields, .. } => fields,
            Self::Dictionary { entries, .. } => entries,
        }
    }
}
