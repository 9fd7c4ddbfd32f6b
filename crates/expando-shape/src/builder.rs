//! ShapeBuilder — factory for constructing shapes.

use std::sync::Arc;

use crate::shape::{FieldDef, FieldType, RecordShape, Shape};

/// Factory with shorthand constructors for field types and shapes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeBuilder;

impl ShapeBuilder {
    pub fn new() -> Self {
        Self
    }

    // ------------------------------------------------------------------
    // Field types

    pub fn any(&self) -> FieldType {
        FieldType::Any
    }

    pub fn bool(&self) -> FieldType {
        FieldType::Bool
    }

    pub fn int(&self) -> FieldType {
        FieldType::Int
    }

    pub fn uint(&self) -> FieldType {
        FieldType::Uint
    }

    pub fn float(&self) -> FieldType {
        FieldType::Float
    }

    pub fn str(&self) -> FieldType {
        FieldType::Str
    }

    pub fn map(&self, value: FieldType) -> FieldType {
        FieldType::Map(Box::new(value))
    }

    pub fn list(&self, element: FieldType) -> FieldType {
        FieldType::List(Box::new(element))
    }

    pub fn nested(&self, record: Arc<RecordShape>) -> FieldType {
        FieldType::Record(record)
    }

    // ------------------------------------------------------------------
    // Shapes

    pub fn record<K, I>(&self, name: impl Into<String>, fields: I) -> Arc<RecordShape>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, FieldType)>,
    {
        let mut rec = RecordShape::new(name);
        for (key, ty) in fields {
            rec.fields.insert(key.into(), FieldDef::new(ty));
        }
        Arc::new(rec)
    }

    pub fn open(&self) -> Shape {
        Shape::Open
    }

    pub fn map_shape(&self, value: FieldType) -> Shape {
        Shape::Map(value)
    }

    pub fn record_shape<K, I>(&self, name: impl Into<String>, fields: I) -> Shape
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, FieldType)>,
    {
        Shape::Record(self.record(name, fields))
    }

    pub fn shape_ref(&self, name: impl Into<String>) -> Shape {
        Shape::Ref(name.into())
    }
}
