//! Contract shapes for extensible typed objects.
//!
//! A [`Shape`] declares what an object is expected to look like: a fixed
//! record of named, typed fields, a string-keyed map, a free-form open
//! object, or a named reference resolved against a [`ShapeRegistry`].
//! The [`convert`] module supplies the generic value converter used when
//! writing into declared fields and when binding decoded documents to a
//! shape.

pub mod builder;
pub mod convert;
pub mod registry;
pub mod shape;
pub mod validate;

pub use builder::ShapeBuilder;
pub use convert::{bind, convert, ConvertError};
pub use registry::ShapeRegistry;
pub use shape::{FieldDef, FieldType, RecordShape, Shape, RESERVED_MEMBER_NAMES};
pub use validate::validate_record;
