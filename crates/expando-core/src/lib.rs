//! Extensible typed objects.
//!
//! An [`ExpandoObject`] presents a declared contract (a fixed set of named,
//! typed fields) while tolerating arbitrary additional members, and can be
//! lazily materialized from a textual encoding (JSON or XML) and re-rendered
//! to it. Decoding is deferred until the first member access; the textual
//! form is recomputed from the live backing on every read.
//!
//! [`ExtendableValue`] is the facade host: it lazily owns one
//! `ExpandoObject` and lets domain types expose compile-time-named accessors
//! that forward to get/set-by-name.

pub mod backing;
pub mod facade;
pub mod object;
pub mod state;

pub use backing::Backing;
pub use facade::ExtendableValue;
pub use object::{ExpandoError, ExpandoObject};
pub use state::LazyState;

pub use expando_codec::{CodecError, Codecs, TextCodec, TextFormat};
pub use expando_shape::{ConvertError, Shape, ShapeBuilder, ShapeRegistry};
