//! Common codec trait and errors.

use expando_shape::{ConvertError, Shape};
use serde_json::Value;

use crate::{json::JsonError, xml::XmlError};

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("JSON codec error: {0}")]
    Json(#[from] JsonError),
    #[error("XML codec error: {0}")]
    Xml(#[from] XmlError),
    #[error("shape mismatch: {0}")]
    Bind(#[from] ConvertError),
}

/// The textual encoding of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Json,
    Xml,
}

impl TextFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }
}

/// Trait for text codecs that encode/decode shape-guided documents.
///
/// Codecs are stateless and shared as `Arc<dyn TextCodec>`; `decode` binds
/// the parsed document to the given shape before returning it.
pub trait TextCodec: Send + Sync {
    fn id(&self) -> &'static str;
    fn format(&self) -> TextFormat;
    fn encode(&self, value: &Value, shape: &Shape) -> Result<String, CodecError>;
    fn decode(&self, text: &str, shape: &Shape) -> Result<Value, CodecError>;
}
