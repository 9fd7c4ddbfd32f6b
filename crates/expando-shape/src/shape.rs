//! Shape data model: records, maps, open objects, and named references.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

/// Member names that collide with the object's own accessors (the textual
/// form and the raw instance). They are excluded from the user-addressable
/// member space and rejected as declared field names.
pub const RESERVED_MEMBER_NAMES: &[&str] = &["_text", "_raw"];

/// The declared type of a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    Any,
    Bool,
    Int,
    Uint,
    Float,
    Str,
    Record(Arc<RecordShape>),
    Map(Box<FieldType>),
    List(Box<FieldType>),
}

impl FieldType {
    /// Returns the kind string for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Float => "float",
            Self::Str => "str",
            Self::Record(_) => "record",
            Self::Map(_) => "map",
            Self::List(_) => "list",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Int | Self::Uint | Self::Float)
    }

    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Self::Bool | Self::Int | Self::Uint | Self::Float | Self::Str
        )
    }
}

/// A declared field of a record shape.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub ty: FieldType,
}

impl FieldDef {
    pub fn new(ty: FieldType) -> Self {
        Self { ty }
    }
}

/// A fixed set of named, typed fields. Field order is declaration order and
/// is preserved through encode.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordShape {
    pub name: String,
    pub fields: IndexMap<String, FieldDef>,
}

impl RecordShape {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// A default-valued body: every declared field present, set to `Null`.
    pub fn default_body(&self) -> serde_json::Map<String, Value> {
        let mut body = serde_json::Map::new();
        for key in self.fields.keys() {
            body.insert(key.clone(), Value::Null);
        }
        body
    }
}

/// The declared contract of an extensible object.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Free-form: any string key, any value.
    Open,
    /// String-keyed map with a declared value type.
    Map(FieldType),
    /// Fixed record of declared fields.
    Record(Arc<RecordShape>),
    /// A named shape, resolved against a [`crate::ShapeRegistry`] at
    /// construction time. Unresolved references fall back to a dictionary
    /// backing rather than failing.
    Ref(String),
}

impl Shape {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Map(_) => "map",
            Self::Record(_) => "record",
            Self::Ref(_) => "ref",
        }
    }

    /// The record shape, when this contract declares one.
    pub fn as_record(&self) -> Option<&Arc<RecordShape>> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }

    /// True for contracts whose members are addressed by arbitrary keys.
    pub fn is_dictionary_like(&self) -> bool {
        matches!(self, Self::Open | Self::Map(_))
    }

    /// The field type a whole document of this shape binds as.
    pub fn field_type(&self) -> FieldType {
        match self {
            Self::Open => FieldType::Map(Box::new(FieldType::Any)),
            Self::Map(vt) => FieldType::Map(Box::new(vt.clone())),
            Self::Record(r) => FieldType::Record(r.clone()),
            // An unresolved reference binds permissively.
            Self::Ref(_) => FieldType::Map(Box::new(FieldType::Any)),
        }
    }

    /// The element name used for the document root in element-based
    /// encodings.
    pub fn root_name(&self) -> &str {
        match self {
            Self::Record(r) => &r.name,
            _ => "Root",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ShapeBuilder;

    #[test]
    fn field_type_kinds() {
        let b = ShapeBuilder::new();
        assert_eq!(FieldType::Any.kind(), "any");
        assert_eq!(b.int().kind(), "int");
        assert_eq!(b.list(b.str()).kind(), "list");
        assert!(b.uint().is_numeric());
        assert!(b.str().is_scalar());
        assert!(!b.map(b.any()).is_scalar());
    }

    #[test]
    fn record_default_body_has_all_fields_null() {
        let b = ShapeBuilder::new();
        let rec = b.record("Card", [("Name", b.str()), ("Count", b.int())]);
        let body = rec.default_body();
        assert_eq!(body.len(), 2);
        assert!(body["Name"].is_null());
        assert!(body["Count"].is_null());
    }

    #[test]
    fn shape_root_name() {
        let b = ShapeBuilder::new();
        let rec = b.record("Card", [("Name", b.str())]);
        assert_eq!(Shape::Record(rec).root_name(), "Card");
        assert_eq!(Shape::Open.root_name(), "Root");
        assert_eq!(Shape::Map(FieldType::Any).root_name(), "Root");
    }

    #[test]
    fn dictionary_like_shapes() {
        assert!(Shape::Open.is_dictionary_like());
        assert!(Shape::Map(FieldType::Str).is_dictionary_like());
        assert!(!Shape::Ref("Card".into()).is_dictionary_like());
    }
}
