//! Lenient conversions between value kinds.
//!
//! Every function here accepts any [`Value`] and never fails. Input that
//! cannot be converted yields the zero value of the target: `0`, `NaN`,
//! `false`, the empty string or [`zero_time`]. Shared nodes convert as the
//! first non-shared value they lead to; a chain that loops back on itself
//! converts as absent.
//!
//! ```
//! # use arbor::{Value, coerce};
//! assert_eq!(coerce::to_int(&Value::from("42")), 42);
//! assert_eq!(coerce::to_int(&Value::from("4x")), 0);
//! assert_eq!(coerce::to_int(&Value::from(3.9)), 3);
//! assert!(coerce::to_float(&Value::from("abc")).is_nan());
//! assert!(coerce::to_bool(&Value::from("TRUE")));
//! assert_eq!(coerce::to_string(&Value::from(456)), "456");
//! ```

use std::collections::HashSet;
use std::num::IntErrorKind;

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};

use crate::value::{Kind, Value};
use crate::{IntoObject, Object};

/// The time returned for input that is not a time: the Unix epoch.
pub fn zero_time() -> DateTime<Utc> {
    DateTime::<Utc>::default()
}

/// Follows a chain of shared nodes and calls `f` with the first value that
/// is not shared.
///
/// Returns `absent()` when the chain revisits a node or a node is mutably
/// borrowed.
pub(crate) fn with_resolved<R>(
    value: &Value,
    absent: impl FnOnce() -> R,
    f: impl FnOnce(&Value) -> R,
) -> R {
    resolve(value, &mut HashSet::new(), absent, f)
}

fn resolve<R>(
    value: &Value,
    seen: &mut HashSet<usize>,
    absent: impl FnOnce() -> R,
    f: impl FnOnce(&Value) -> R,
) -> R {
    let Value::Shared(shared) = value else {
        return f(value);
    };
    if !seen.insert(shared.addr()) {
        return absent();
    }
    match shared.try_borrow() {
        Ok(inner) => resolve(&inner, seen, absent, f),
        Err(_) => absent(),
    }
}

/// Parses a decimal integer.
///
/// Out-of-range input saturates and anything else that is not an integer
/// reads as `0`.
pub fn parse_int(text: &str) -> i64 {
    match text.parse::<i64>() {
        Ok(n) => n,
        Err(error) => match error.kind() {
            IntErrorKind::PosOverflow => i64::MAX,
            IntErrorKind::NegOverflow => i64::MIN,
            _ => 0,
        },
    }
}

/// Parses the boolean spellings `1 t T TRUE true True` and
/// `0 f F FALSE false False`. Anything else is `false`.
pub fn parse_bool(text: &str) -> bool {
    matches!(text, "1" | "t" | "T" | "TRUE" | "true" | "True")
}

pub fn to_int(value: &Value) -> i64 {
    match value {
        Value::Int(n) => *n,
        Value::Float(x) => *x as i64,
        Value::Bool(b) => i64::from(*b),
        Value::String(s) => parse_int(s),
        Value::Shared(_) => with_resolved(value, || 0, to_int),
        _ => 0,
    }
}

pub fn to_float(value: &Value) -> f64 {
    match value {
        Value::Int(n) => *n as f64,
        Value::Float(x) => *x,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::String(s) => s.parse().unwrap_or(f64::NAN),
        Value::Shared(_) => with_resolved(value, || f64::NAN, to_float),
        _ => f64::NAN,
    }
}

pub fn to_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Int(n) => *n != 0,
        Value::Float(x) => *x != 0.0,
        Value::String(s) => parse_bool(s),
        Value::Shared(_) => with_resolved(value, || false, to_bool),
        _ => false,
    }
}

/// Renders a value as text.
///
/// Null is empty, valid UTF-8 bytes are decoded, other bytes print as a
/// list of numbers, times use RFC 3339, identifiers their hex form and
/// structured values their JSON text.
pub fn to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Int(n) => n.to_string(),
        Value::Float(x) => x.to_string(),
        Value::String(s) => s.clone(),
        Value::Bytes(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => text.to_string(),
            Err(_) => {
                let numbers: Vec<String> = bytes.iter().map(u8::to_string).collect();
                format!("[{}]", numbers.join(" "))
            }
        },
        Value::Time(t) => t.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        Value::Shared(_) => with_resolved(value, String::new, to_string),
        Value::Foreign(foreign) => foreign
            .hex()
            .unwrap_or_else(|| foreign.type_name().to_string()),
        Value::Array(_) | Value::Object(_) | Value::Record(_) => {
            serde_json::to_string(value).unwrap_or_else(|_| format!("{value:?}"))
        }
    }
}

/// Converts to a time. Integers are Unix seconds and strings RFC 3339.
pub fn to_time(value: &Value) -> DateTime<Utc> {
    match value {
        Value::Time(t) => *t,
        Value::Int(secs) => Utc.timestamp_opt(*secs, 0).single().unwrap_or_else(zero_time),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(|_| zero_time()),
        Value::Shared(_) => with_resolved(value, zero_time, to_time),
        _ => zero_time(),
    }
}

/// Converts to a list of strings; a lone string becomes a one-element list.
pub fn to_string_array(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(vec![s.clone()]),
        Value::Array(items) => Some(items.iter().map(to_string).collect()),
        Value::Bytes(bytes) => Some(bytes.iter().map(u8::to_string).collect()),
        Value::Shared(_) => with_resolved(value, || None, to_string_array),
        _ => None,
    }
}

/// Converts to a list of floats; a scalar becomes a one-element list.
pub fn to_float_array(value: &Value) -> Option<Vec<f64>> {
    match value {
        Value::Null => None,
        Value::Array(items) => Some(items.iter().map(to_float).collect()),
        Value::Bytes(bytes) => Some(bytes.iter().map(|b| f64::from(*b)).collect()),
        Value::Shared(_) => with_resolved(value, || None, to_float_array),
        other => Some(vec![to_float(other)]),
    }
}

/// Converts booleans, strings and bytes to bytes.
pub fn to_bytes(value: &Value) -> Option<Vec<u8>> {
    match value {
        Value::Bool(b) => Some(vec![u8::from(*b)]),
        Value::String(s) => Some(s.clone().into_bytes()),
        Value::Bytes(bytes) => Some(bytes.clone()),
        Value::Shared(_) => with_resolved(value, || None, to_bytes),
        _ => None,
    }
}

/// Converts `value` to the requested kind.
///
/// Scalar kinds use the `to_*` functions above. Arrays wrap a lone value,
/// objects go through [`IntoObject`], and the remaining kinds return the
/// value unchanged.
pub fn coerce(kind: Kind, value: &Value) -> Value {
    match kind {
        Kind::Null => Value::Null,
        Kind::Bool => Value::Bool(to_bool(value)),
        Kind::Int => Value::Int(to_int(value)),
        Kind::Float => Value::Float(to_float(value)),
        Kind::String => Value::String(to_string(value)),
        Kind::Bytes => Value::Bytes(to_bytes(value).unwrap_or_default()),
        Kind::Time => Value::Time(to_time(value)),
        Kind::Array => match value {
            Value::Array(_) => value.clone(),
            Value::Null => Value::Array(Vec::new()),
            other => Value::Array(vec![other.clone()]),
        },
        Kind::Object => Value::Object(match value {
            Value::Object(object) => object.clone(),
            other => other.clone().into_object(),
        }),
        _ => value.clone(),
    }
}

/// Coerces to an object, see [`coerce`].
pub fn to_object(value: &Value) -> Object {
    match coerce(Kind::Object, value) {
        Value::Object(object) => object,
        _ => Object::new(),
    }
}
