//! ExpandoObject — the extensible typed object.

use std::fmt;
use std::sync::Arc;

use expando_codec::{CodecError, TextCodec, TextFormat};
use expando_shape::{convert::value_kind, ConvertError, Shape};
use serde_json::{Map, Value};

use crate::backing::Backing;
use crate::state::LazyState;

#[derive(Debug, thiserror::Error)]
pub enum ExpandoError {
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
    #[error("conversion error: {0}")]
    Convert(#[from] ConvertError),
}

/// An addressable value with a declared contract shape, a dictionary
/// fallback for everything the contract does not declare, and a lazily
/// decoded textual form.
///
/// The backing store always exists; an object constructed from text keeps
/// the text pending and decodes it on the first member access. Reads and
/// writes take `&mut self` because any of them may trigger that decode.
/// Not synchronized: confine an instance to one owner or synchronize
/// externally.
pub struct ExpandoObject {
    shape: Shape,
    codec: Arc<dyn TextCodec>,
    backing: Backing,
    state: LazyState,
}

impl ExpandoObject {
    /// Empty instance: default-valued backing, trivially materialized.
    pub fn new(shape: Shape, codec: Arc<dyn TextCodec>) -> Self {
        let backing = Backing::from_shape(&shape);
        Self {
            shape,
            codec,
            backing,
            state: LazyState::new(),
        }
    }

    /// Instance whose backing will be decoded from `text` on first access.
    pub fn from_text(text: impl Into<String>, shape: Shape, codec: Arc<dyn TextCodec>) -> Self {
        let backing = Backing::from_shape(&shape);
        Self {
            shape,
            codec,
            backing,
            state: LazyState::from_text(text),
        }
    }

    /// Instance over an already-decoded document body.
    pub fn from_value(value: Value, shape: Shape, codec: Arc<dyn TextCodec>) -> Result<Self, ExpandoError> {
        let body = expando_shape::bind(value, &shape)?;
        let backing = Backing::from_body(&shape, body);
        Ok(Self {
            shape,
            codec,
            backing,
            state: LazyState::new(),
        })
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn format(&self) -> TextFormat {
        self.codec.format()
    }

    pub fn is_materialized(&self) -> bool {
        self.state.is_materialized()
    }

    /// Decode the pending text into the backing, once per assigned text.
    ///
    /// On failure the object stays pending with the same text, so the error
    /// resurfaces on every access until new text is assigned.
    pub fn materialize(&mut self) -> Result<(), ExpandoError> {
        let Some(text) = self.state.pending() else {
            return Ok(());
        };
        tracing::debug!(
            codec = self.codec.id(),
            shape = self.shape.kind(),
            "materializing backing from pending text"
        );
        let doc = self.codec.decode(text, &self.shape)?;
        let Value::Object(body) = doc else {
            return Err(CodecError::Bind(ConvertError::NotAnObject {
                found: value_kind(&doc),
            })
            .into());
        };
        self.backing = Backing::from_body(&self.shape, body);
        self.state.complete();
        Ok(())
    }

    /// Read a member by name. Absent members are `Ok(None)`.
    pub fn get(&mut self, name: &str) -> Result<Option<Value>, ExpandoError> {
        self.materialize()?;
        Ok(self.backing.get(name))
    }

    /// Read a nested member by path; any step that is absent or not an
    /// object yields `Ok(None)`.
    pub fn get_path(&mut self, path: &[&str]) -> Result<Option<Value>, ExpandoError> {
        let Some((first, rest)) = path.split_first() else {
            return Ok(None);
        };
        let Some(mut current) = self.get(first)? else {
            return Ok(None);
        };
        for name in rest {
            match current {
                Value::Object(mut body) => match body.remove(*name) {
                    Some(next) => current = next,
                    None => return Ok(None),
                },
                _ => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    /// Write a member by name. `Ok(false)` means the contract refused the
    /// member (undeclared on a strict record); a conversion failure is an
    /// error and leaves the member unchanged.
    pub fn set(&mut self, name: &str, value: Value) -> Result<bool, ExpandoError> {
        self.materialize()?;
        Ok(self.backing.set(name, value)?)
    }

    /// The textual form of the live backing, recomputed on every call.
    pub fn to_text(&mut self) -> Result<String, ExpandoError> {
        self.materialize()?;
        Ok(self.codec.encode(&self.backing.to_value(), &self.shape)?)
    }

    /// Queue a new text form; the next access re-decodes. In-memory
    /// mutations are lost once the decode overwrites the backing. Blank
    /// text queues nothing and leaves the current backing authoritative.
    pub fn assign_text(&mut self, text: impl Into<String>) {
        self.state.assign(text);
    }

    /// The live backing rendered as a document.
    pub fn to_value(&mut self) -> Result<Value, ExpandoError> {
        self.materialize()?;
        Ok(self.backing.to_value())
    }

    /// Bulk access to the backing body, bypassing per-member resolution.
    pub fn raw(&mut self) -> Result<&Map<String, Value>, ExpandoError> {
        self.materialize()?;
        Ok(self.backing.body())
    }

    /// Mutable bulk access. Writes through here skip declared-type
    /// conversion.
    pub fn raw_mut(&mut self) -> Result<&mut Map<String, Value>, ExpandoError> {
        self.materialize()?;
        Ok(self.backing.body_mut())
    }
}

impl fmt::Debug for ExpandoObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpandoObject")
            .field("shape", &self.shape)
            .field("codec", &self.codec.id())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
