//! JSON codec.

use expando_shape::{bind, Shape};
use serde_json::Value;

use crate::types::{CodecError, TextCodec, TextFormat};

#[derive(Debug, thiserror::Error)]
pub enum JsonError {
    #[error("parse error: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("render error: {0}")]
    Render(#[source] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    pub fn new() -> Self {
        Self
    }
}

impl TextCodec for JsonCodec {
    fn id(&self) -> &'static str {
        "json"
    }

    fn format(&self) -> TextFormat {
        TextFormat::Json
    }

    fn encode(&self, value: &Value, _shape: &Shape) -> Result<String, CodecError> {
        tracing::trace!(codec = "json", "encoding document");
        serde_json::to_string(value).map_err(|e| JsonError::Render(e).into())
    }

    fn decode(&self, text: &str, shape: &Shape) -> Result<Value, CodecError> {
        tracing::trace!(codec = "json", shape = shape.kind(), "decoding document");
        let parsed: Value = serde_json::from_str(text).map_err(JsonError::Parse)?;
        Ok(Value::Object(bind(parsed, shape)?))
    }
}
