//! Structural integrity validation for shapes.
//!
//! Returns `Ok(())` or `Err(code)` with a short code describing the first
//! problem found.

use crate::shape::{FieldType, RecordShape, RESERVED_MEMBER_NAMES};

/// Validate a record shape for structural integrity.
pub fn validate_record(rec: &RecordShape) -> Result<(), String> {
    if rec.name.trim().is_empty() {
        return Err("NAME_EMPTY".into());
    }
    for (key, def) in &rec.fields {
        if key.is_empty() {
            return Err("KEY_EMPTY".into());
        }
        if RESERVED_MEMBER_NAMES.contains(&key.as_str()) {
            return Err("KEY_RESERVED".into());
        }
        validate_field_type(&def.ty)?;
    }
    Ok(())
}

fn validate_field_type(ty: &FieldType) -> Result<(), String> {
    match ty {
        FieldType::Record(rec) => validate_record(rec),
        FieldType::Map(vt) => validate_field_type(vt),
        FieldType::List(et) => validate_field_type(et),
        _ => Ok(()),
    }
}
