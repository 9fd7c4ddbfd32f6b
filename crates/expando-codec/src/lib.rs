//! Text codecs for expando documents.
//!
//! A [`TextCodec`] converts between an object body (a `serde_json::Value`
//! document) and its textual form, guided by the document's contract
//! [`Shape`](expando_shape::Shape). Decoding always returns a shape-bound
//! document; encoding always renders the live value.

pub mod codecs;
pub mod json;
pub mod types;
pub mod xml;

pub use codecs::Codecs;
pub use json::{JsonCodec, JsonError};
pub use types::{CodecError, TextCodec, TextFormat};
pub use xml::{XmlCodec, XmlError};
