//! Structural equality for dynamic trees.

use std::collections::HashSet;

use super::{Record, Value};
use crate::Object;

/// Pairs of shared nodes currently under comparison.
type Visited = HashSet<(usize, usize)>;

/// Compares two values structurally.
///
/// Object key order is ignored, `NaN` equals `NaN` and integers never equal
/// floats. Shared nodes compare by content; a pair of shared nodes that is
/// reached again while it is still being compared is assumed equal, so
/// cyclic trees terminate.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    values_equal(a, b, &mut Visited::new())
}

pub(crate) fn objects_equal(a: &Object, b: &Object) -> bool {
    object_fields_equal(a, b, &mut Visited::new())
}

pub(crate) fn records_equal(a: &Record, b: &Record) -> bool {
    record_fields_equal(a, b, &mut Visited::new())
}

fn values_equal(a: &Value, b: &Value, visited: &mut Visited) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => x == y || (x.is_nan() && y.is_nan()),
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Bytes(x), Value::Bytes(y)) => x == y,
        (Value::Time(x), Value::Time(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len()
                && x.iter()
                    .zip(y.iter())
                    .all(|(left, right)| values_equal(left, right, visited))
        }
        (Value::Object(x), Value::Object(y)) => object_fields_equal(x, y, visited),
        (Value::Shared(x), Value::Shared(y)) => {
            if x.ptr_eq(y) || !visited.insert((x.addr(), y.addr())) {
                return true;
            }
            match (x.try_borrow(), y.try_borrow()) {
                (Ok(left), Ok(right)) => values_equal(&left, &right, visited),
                _ => false,
            }
        }
        (Value::Record(x), Value::Record(y)) => record_fields_equal(x, y, visited),
        (Value::Foreign(x), Value::Foreign(y)) => {
            x.ptr_eq(y) || (x.kind() == y.kind() && x.hex().is_some() && x.hex() == y.hex())
        }
        _ => false,
    }
}

fn object_fields_equal(a: &Object, b: &Object, visited: &mut Visited) -> bool {
    a.len() == b.len()
        && a.iter().all(|(key, left)| {
            b.field(key)
                .is_some_and(|right| values_equal(left, right, visited))
        })
}

fn record_fields_equal(a: &Record, b: &Record, visited: &mut Visited) -> bool {
    a.type_name() == b.type_name()
        && a.fields().len() == b.fields().len()
        && a.fields().iter().zip(b.fields()).all(|(left, right)| {
            left.name == right.name
                && left.visibility == right.visibility
                && left.tag == right.tag
                && values_equal(&left.value, &right.value, visited)
        })
}
