//! Generic value converter.
//!
//! Coerces runtime values into declared field types: numeric widening,
//! fract-free float narrowing, string parsing of numbers and booleans,
//! scalar stringification, and recursive record/map/list coercion. `Null`
//! passes through every target (all declared fields are nullable).

use serde_json::{Map, Number, Value};

use crate::shape::{FieldType, RecordShape, Shape};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConvertError {
    #[error("cannot convert {from} to {to}")]
    Incompatible {
        from: &'static str,
        to: &'static str,
    },
    #[error("cannot parse {text:?} as {to}")]
    Parse { text: String, to: &'static str },
    #[error("number out of range for {to}")]
    Range { to: &'static str },
    #[error("expected an object, got {found}")]
    NotAnObject { found: &'static str },
}

/// The JSON kind of a value, for diagnostics.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Convert `value` to the declared `target` type.
///
/// Returns the coerced value, or a [`ConvertError`] when the runtime value
/// cannot represent the target. The input is consumed; on error nothing has
/// been written anywhere, so callers can leave the destination untouched.
pub fn convert(value: Value, target: &FieldType) -> Result<Value, ConvertError> {
    if value.is_null() {
        return Ok(Value::Null);
    }
    match target {
        FieldType::Any => Ok(value),
        FieldType::Bool => to_bool(value),
        FieldType::Int => to_int(value),
        FieldType::Uint => to_uint(value),
        FieldType::Float => to_float(value),
        FieldType::Str => to_str(value),
        FieldType::Record(rec) => match value {
            Value::Object(body) => Ok(Value::Object(convert_record(rec, body)?)),
            other => Err(ConvertError::NotAnObject {
                found: value_kind(&other),
            }),
        },
        FieldType::Map(vt) => match value {
            Value::Object(body) => {
                let mut out = Map::new();
                for (key, val) in body {
                    out.insert(key, convert(val, vt)?);
                }
                Ok(Value::Object(out))
            }
            other => Err(ConvertError::NotAnObject {
                found: value_kind(&other),
            }),
        },
        FieldType::List(et) => match value {
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(convert(item, et)?);
                }
                Ok(Value::Array(out))
            }
            other => Err(ConvertError::Incompatible {
                from: value_kind(&other),
                to: "list",
            }),
        },
    }
}

/// Coerce an object body to a record shape: declared fields are converted
/// in declaration order, missing fields default to `Null`, undeclared keys
/// are dropped (strict records are closed).
pub fn convert_record(
    rec: &RecordShape,
    mut body: Map<String, Value>,
) -> Result<Map<String, Value>, ConvertError> {
    let mut out = Map::new();
    for (key, def) in &rec.fields {
        let val = match body.remove(key) {
            Some(v) => convert(v, &def.ty)?,
            None => Value::Null,
        };
        out.insert(key.clone(), val);
    }
    Ok(out)
}

/// Bind a decoded document to a whole shape, yielding the object body.
pub fn bind(value: Value, shape: &Shape) -> Result<Map<String, Value>, ConvertError> {
    match convert(value, &shape.field_type())? {
        Value::Object(body) => Ok(body),
        other => Err(ConvertError::NotAnObject {
            found: value_kind(&other),
        }),
    }
}

fn to_bool(value: Value) -> Result<Value, ConvertError> {
    match value {
        Value::Bool(_) => Ok(value),
        Value::String(s) => match s.trim() {
            "true" | "True" => Ok(Value::Bool(true)),
            "false" | "False" => Ok(Value::Bool(false)),
            _ => Err(ConvertError::Parse { text: s, to: "bool" }),
        },
        Value::Number(ref n) => match n.as_i64() {
            Some(0) => Ok(Value::Bool(false)),
            Some(1) => Ok(Value::Bool(true)),
            _ => Err(ConvertError::Incompatible {
                from: "number",
                to: "bool",
            }),
        },
        other => Err(ConvertError::Incompatible {
            from: value_kind(&other),
            to: "bool",
        }),
    }
}

fn to_int(value: Value) -> Result<Value, ConvertError> {
    match value {
        Value::Number(ref n) => {
            if let Some(i) = n.as_i64() {
                return Ok(Value::from(i));
            }
            if let Some(f) = n.as_f64() {
                return float_to_i64(f).map(Value::from);
            }
            Err(ConvertError::Range { to: "int" })
        }
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| ConvertError::Parse { text: s, to: "int" }),
        Value::Bool(b) => Ok(Value::from(b as i64)),
        other => Err(ConvertError::Incompatible {
            from: value_kind(&other),
            to: "int",
        }),
    }
}

fn to_uint(value: Value) -> Result<Value, ConvertError> {
    match value {
        Value::Number(ref n) => {
            if let Some(u) = n.as_u64() {
                return Ok(Value::from(u));
            }
            if let Some(f) = n.as_f64() {
                if f >= 0.0 {
                    return float_to_i64(f).map(|i| Value::from(i as u64));
                }
            }
            Err(ConvertError::Range { to: "uint" })
        }
        Value::String(s) => s.trim().parse::<u64>().map(Value::from).map_err(|_| {
            ConvertError::Parse {
                text: s,
                to: "uint",
            }
        }),
        Value::Bool(b) => Ok(Value::from(b as u64)),
        other => Err(ConvertError::Incompatible {
            from: value_kind(&other),
            to: "uint",
        }),
    }
}

fn to_float(value: Value) -> Result<Value, ConvertError> {
    match value {
        Value::Number(ref n) => {
            let f = n.as_f64().ok_or(ConvertError::Range { to: "float" })?;
            Number::from_f64(f)
                .map(Value::Number)
                .ok_or(ConvertError::Range { to: "float" })
        }
        Value::String(s) => match s.trim().parse::<f64>().ok().and_then(Number::from_f64) {
            Some(n) => Ok(Value::Number(n)),
            None => Err(ConvertError::Parse {
                text: s,
                to: "float",
            }),
        },
        other => Err(ConvertError::Incompatible {
            from: value_kind(&other),
            to: "float",
        }),
    }
}

fn to_str(value: Value) -> Result<Value, ConvertError> {
    match value {
        Value::String(_) => Ok(value),
        Value::Number(n) => Ok(Value::String(n.to_string())),
        Value::Bool(b) => Ok(Value::String(b.to_string())),
        other => Err(ConvertError::Incompatible {
            from: value_kind(&other),
            to: "str",
        }),
    }
}

fn float_to_i64(f: f64) -> Result<i64, ConvertError> {
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Ok(f as i64)
    } else {
        Err(ConvertError::Range { to: "int" })
    }
}
