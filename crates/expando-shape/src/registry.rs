//! ShapeRegistry — a namespace of named record shapes.
//!
//! An explicitly constructed service passed to whatever needs to resolve
//! `Shape::Ref` contracts; there is no process-wide table.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::shape::{RecordShape, Shape};
use crate::validate::validate_record;

#[derive(Debug, Default)]
struct RegistryInner {
    records: HashMap<String, Arc<RecordShape>>,
}

/// Name → record shape table with shared ownership.
#[derive(Debug, Clone, Default)]
pub struct ShapeRegistry {
    inner: Arc<RwLock<RegistryInner>>,
}

impl ShapeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a record shape under its own name. Validates the shape
    /// first; an existing registration under the same name is returned
    /// unchanged.
    pub fn register(&self, rec: Arc<RecordShape>) -> Result<Arc<RecordShape>, String> {
        validate_record(&rec)?;
        let mut inner = self.inner.write().unwrap();
        Ok(inner
            .records
            .entry(rec.name.clone())
            .or_insert(rec)
            .clone())
    }

    /// Look up a record shape by name.
    pub fn resolve(&self, name: &str) -> Option<Arc<RecordShape>> {
        let inner = self.inner.read().unwrap();
        inner.records.get(name).cloned()
    }

    pub fn has(&self, name: &str) -> bool {
        let inner = self.inner.read().unwrap();
        inner.records.contains_key(name)
    }

    /// Rewrite a `Ref` shape to the registered `Record`. Unknown names are
    /// left as-is; constructing a backing from an unresolved reference
    /// falls back to a dictionary.
    pub fn resolve_shape(&self, shape: Shape) -> Shape {
        match shape {
            Shape::Ref(ref name) => match self.resolve(name) {
                Some(rec) => Shape::Record(rec),
                None => shape,
            },
            other => other,
        }
    }
}
