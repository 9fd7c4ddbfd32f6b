//! ExtendableValue — lazy host for typed facades.
//!
//! A domain type that wants compile-time-named accessors over dynamic
//! storage embeds an `ExtendableValue` and forwards each property to
//! `get`/`set` by name. The inner object is constructed on first touch, so
//! a facade that is never read never decodes (or even allocates) anything.

use std::sync::Arc;

use expando_codec::{Codecs, TextFormat};
use expando_shape::Shape;
use serde_json::Value;

use crate::object::{ExpandoError, ExpandoObject};

#[derive(Debug)]
pub struct ExtendableValue {
    format: TextFormat,
    shape: Shape,
    codecs: Arc<Codecs>,
    value: Option<ExpandoObject>,
}

impl ExtendableValue {
    pub fn new(format: TextFormat, shape: Shape, codecs: Arc<Codecs>) -> Self {
        Self {
            format,
            shape,
            codecs,
            value: None,
        }
    }

    /// Whether the inner object has been constructed, without constructing
    /// it.
    pub fn is_initialized(&self) -> bool {
        self.value.is_some()
    }

    /// The inner object, constructed empty on first touch.
    pub fn value(&mut self) -> &mut ExpandoObject {
        self.value.get_or_insert_with(|| {
            ExpandoObject::new(self.shape.clone(), self.codecs.get(self.format))
        })
    }

    /// The stored textual form: `None` before initialization, otherwise the
    /// freshly encoded live value.
    pub fn value_string(&mut self) -> Result<Option<String>, ExpandoError> {
        match &mut self.value {
            Some(obj) => obj.to_text().map(Some),
            None => Ok(None),
        }
    }

    /// Assign a textual form. Initializes the inner object from the text,
    /// or queues a re-decode on an already-initialized one.
    pub fn set_value_string(&mut self, text: impl Into<String>) {
        match &mut self.value {
            Some(obj) => obj.assign_text(text),
            None => {
                self.value = Some(ExpandoObject::from_text(
                    text,
                    self.shape.clone(),
                    self.codecs.get(self.format),
                ));
            }
        }
    }

    // ------------------------------------------------------------------
    // Forwarding accessors for facades

    pub fn get(&mut self, name: &str) -> Result<Option<Value>, ExpandoError> {
        self.value().get(name)
    }

    pub fn set(&mut self, name: &str, value: Value) -> Result<bool, ExpandoError> {
        self.value().set(name, value)
    }

    pub fn get_str(&mut self, name: &str) -> Result<Option<String>, ExpandoError> {
        Ok(self.get(name)?.and_then(|v| v.as_str().map(str::to_owned)))
    }

    pub fn get_i64(&mut self, name: &str) -> Result<Option<i64>, ExpandoError> {
        Ok(self.get(name)?.and_then(|v| v.as_i64()))
    }

    pub fn get_f64(&mut self, name: &str) -> Result<Option<f64>, ExpandoError> {
        Ok(self.get(name)?.and_then(|v| v.as_f64()))
    }

    pub fn get_bool(&mut self, name: &str) -> Result<Option<bool>, ExpandoError> {
        Ok(self.get(name)?.and_then(|v| v.as_bool()))
    }

    pub fn set_str(&mut self, name: &str, value: &str) -> Result<bool, ExpandoError> {
        self.set(name, Value::from(value))
    }
}
