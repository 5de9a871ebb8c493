// Explicit validation/deserialization of KSON values.
//
// Every semantic type implements `FromKson`, reading a `serde_json::Value`
// and filling defaults for absent optional fields. Paths are kept as a
// borrowed chain and rendered only when an error is reported.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};

use crate::error::SchemaError;

/// Largest integer a JSON number can carry without losing precision.
pub const MAX_SAFE_INTEGER: u64 = 9_007_199_254_740_991;

#[derive(Debug, Clone, Copy)]
enum Segment<'a> {
    Root,
    Key(&'a str),
    Index(usize),
}

/// Location of a value inside a KSON document.
#[derive(Debug, Clone, Copy)]
pub struct FieldPath<'a> {
    parent: Option<&'a FieldPath<'a>>,
    segment: Segment<'a>,
}

impl FieldPath<'static> {
    pub const fn root() -> Self {
        Self {
            parent: None,
            segment: Segment::Root,
        }
    }
}

impl<'a> FieldPath<'a> {
    pub fn key<'b>(&'b self, key: &'b str) -> FieldPath<'b> {
        FieldPath {
            parent: Some(self),
            segment: Segment::Key(key),
        }
    }

    pub fn index(&self, index: usize) -> FieldPath<'_> {
        FieldPath {
            parent: Some(self),
            segment: Segment::Index(index),
        }
    }

    pub fn mismatch(&self, expected: impl Into<String>) -> SchemaError {
        SchemaError::Mismatch {
            path: self.to_string(),
            expected: expected.into(),
        }
    }

    pub fn missing(&self) -> SchemaError {
        SchemaError::MissingField {
            path: self.to_string(),
        }
    }
}

impl fmt::Display for FieldPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut segments = Vec::new();
        let mut current = Some(self);
        while let Some(path) = current {
            segments.push(path.segment);
            current = path.parent;
        }

        let mut wrote = false;
        for segment in segments.iter().rev() {
            match segment {
                Segment::Root => {}
                Segment::Key(key) => {
                    if wrote {
                        f.write_str(".")?;
                    }
                    f.write_str(key)?;
                    wrote = true;
                }
                Segment::Index(index) => {
                    write!(f, "[{index}]")?;
                    wrote = true;
                }
            }
        }
        if !wrote {
            f.write_str("$")?;
        }
        Ok(())
    }
}

/// Types that can be validated out of a JSON value.
pub trait FromKson: Sized {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError>;
}

/// Field access on a JSON object with required/optional/default semantics.
///
/// Keys not read through the reader are ignored.
pub struct ObjectReader<'v, 'p> {
    map: &'v Map<String, Value>,
    path: FieldPath<'p>,
}

impl<'v, 'p> ObjectReader<'v, 'p> {
    pub fn new(value: &'v Value, path: FieldPath<'p>) -> Result<Self, SchemaError> {
        match value {
            Value::Object(map) => Ok(Self { map, path }),
            _ => Err(path.mismatch("an object")),
        }
    }

    pub fn required<T: FromKson>(&self, key: &str) -> Result<T, SchemaError> {
        let path = self.path.key(key);
        match self.map.get(key) {
            Some(value) => T::from_kson(value, path),
            None => Err(path.missing()),
        }
    }

    /// `null` is not accepted in place of an absent field.
    pub fn optional<T: FromKson>(&self, key: &str) -> Result<Option<T>, SchemaError> {
        self.map
            .get(key)
            .map(|value| T::from_kson(value, self.path.key(key)))
            .transpose()
    }

    pub fn or_else<T: FromKson>(
        &self,
        key: &str,
        default: impl FnOnce() -> T,
    ) -> Result<T, SchemaError> {
        Ok(self.optional(key)?.unwrap_or_else(default))
    }

    pub fn or_default<T: FromKson + Default>(&self, key: &str) -> Result<T, SchemaError> {
        self.or_else(key, T::default)
    }
}

/// Check that `value` is an array with `min..=max` elements.
pub fn tuple<'v>(
    value: &'v Value,
    path: FieldPath<'_>,
    min: usize,
    max: usize,
) -> Result<&'v [Value], SchemaError> {
    let expected = || {
        if min == max {
            format!("an array of {min} elements")
        } else {
            format!("an array of {min} to {max} elements")
        }
    };
    match value {
        Value::Array(items) if (min..=max).contains(&items.len()) => Ok(items),
        _ => Err(path.mismatch(expected())),
    }
}

/// Read element `index` of an already length-checked tuple.
pub fn element<T: FromKson>(
    items: &[Value],
    index: usize,
    path: FieldPath<'_>,
) -> Result<T, SchemaError> {
    let item_path = path.index(index);
    match items.get(index) {
        Some(value) => T::from_kson(value, item_path),
        None => Err(item_path.missing()),
    }
}

/// Read an optional trailing tuple element.
pub fn optional_element<T: FromKson>(
    items: &[Value],
    index: usize,
    path: FieldPath<'_>,
) -> Result<Option<T>, SchemaError> {
    items
        .get(index)
        .map(|value| T::from_kson(value, path.index(index)))
        .transpose()
}

pub fn as_uint(value: &Value) -> Option<u64> {
    let Value::Number(number) = value else {
        return None;
    };
    if let Some(n) = number.as_u64() {
        return (n <= MAX_SAFE_INTEGER).then_some(n);
    }
    // Integral floats such as `3.0` are integers in JSON terms
    let f = number.as_f64()?;
    (f.fract() == 0.0 && (0.0..=MAX_SAFE_INTEGER as f64).contains(&f)).then_some(f as u64)
}

pub fn as_int(value: &Value) -> Option<i64> {
    let Value::Number(number) = value else {
        return None;
    };
    let limit = MAX_SAFE_INTEGER as i64;
    if let Some(n) = number.as_i64() {
        return (-limit..=limit).contains(&n).then_some(n);
    }
    if number.is_u64() {
        return None;
    }
    let f = number.as_f64()?;
    (f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER as f64).then_some(f as i64)
}

impl FromKson for u64 {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        as_uint(value).ok_or_else(|| path.mismatch("a non-negative integer"))
    }
}

impl FromKson for u32 {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        as_uint(value)
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| path.mismatch("a non-negative 32-bit integer"))
    }
}

impl FromKson for i64 {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        as_int(value).ok_or_else(|| path.mismatch("an integer"))
    }
}

impl FromKson for f64 {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        value
            .as_f64()
            .filter(|v| v.is_finite())
            .ok_or_else(|| path.mismatch("a finite number"))
    }
}

impl FromKson for bool {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        value.as_bool().ok_or_else(|| path.mismatch("a boolean"))
    }
}

impl FromKson for String {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| path.mismatch("a string"))
    }
}

impl<T: FromKson> FromKson for Vec<T> {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let Value::Array(items) = value else {
            return Err(path.mismatch("an array"));
        };
        items
            .iter()
            .enumerate()
            .map(|(i, item)| T::from_kson(item, path.index(i)))
            .collect()
    }
}

impl<T: FromKson, const N: usize> FromKson for [T; N] {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let items = tuple(value, path, N, N)?;
        let parsed = items
            .iter()
            .enumerate()
            .map(|(i, item)| T::from_kson(item, path.index(i)))
            .collect::<Result<Vec<T>, _>>()?;
        parsed
            .try_into()
            .map_err(|_| path.mismatch(format!("an array of {N} elements")))
    }
}

impl<T: FromKson> FromKson for BTreeMap<String, T> {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let Value::Object(map) = value else {
            return Err(path.mismatch("an object"));
        };
        map.iter()
            .map(|(key, item)| Ok::<_, SchemaError>((key.clone(), T::from_kson(item, path.key(key))?)))
            .collect()
    }
}

impl<A: FromKson, B: FromKson> FromKson for (A, B) {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        let items = tuple(value, path, 2, 2)?;
        Ok((element(items, 0, path)?, element(items, 1, path)?))
    }
}

impl FromKson for Map<String, Value> {
    fn from_kson(value: &Value, path: FieldPath<'_>) -> Result<Self, SchemaError> {
        match value {
            Value::Object(map) => Ok(map.clone()),
            _ => Err(path.mismatch("an object")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_path_rendering() {
        let root = FieldPath::root();
        assert_eq!(root.to_string(), "$");

        let beat = root.key("beat");
        let bpm = beat.key("bpm");
        let first = bpm.index(0);
        let value = first.index(1);
        assert_eq!(value.to_string(), "beat.bpm[0][1]");
    }

    #[test]
    fn test_uint_accepts_integral_floats() {
        assert_eq!(as_uint(&json!(3)), Some(3));
        assert_eq!(as_uint(&json!(3.0)), Some(3));
        assert_eq!(as_uint(&json!(3.5)), None);
        assert_eq!(as_uint(&json!(-1)), None);
        assert_eq!(as_uint(&json!(MAX_SAFE_INTEGER + 1)), None);
        assert_eq!(as_uint(&json!("3")), None);
    }

    #[test]
    fn test_int_range() {
        assert_eq!(as_int(&json!(-42)), Some(-42));
        assert_eq!(as_int(&json!(-2.0)), Some(-2));
        assert_eq!(as_int(&json!(u64::MAX)), None);
    }

    #[test]
    fn test_optional_rejects_null() {
        let value = json!({ "name": null });
        let reader = ObjectReader::new(&value, FieldPath::root()).unwrap();
        let err = reader.optional::<String>("name").unwrap_err();
        assert_eq!(err.to_string(), "name: expected a string");
    }

    #[test]
    fn test_required_missing() {
        let value = json!({});
        let reader = ObjectReader::new(&value, FieldPath::root()).unwrap();
        let err = reader.required::<u64>("total").unwrap_err();
        assert_eq!(err.path(), Some("total"));
        assert!(matches!(err, SchemaError::MissingField { .. }));
    }

    #[test]
    fn test_fixed_array() {
        let lanes: [Vec<u64>; 2] =
            FromKson::from_kson(&json!([[1, 2], []]), FieldPath::root()).unwrap();
        assert_eq!(lanes, [vec![1, 2], vec![]]);

        let err = <[Vec<u64>; 2]>::from_kson(&json!([[1]]), FieldPath::root()).unwrap_err();
        assert_eq!(err.to_string(), "$: expected an array of 2 elements");
    }

    #[test]
    fn test_nested_error_path() {
        let value = json!({ "a": [{ "b": "x" }] });
        let err = BTreeMap::<String, Vec<BTreeMap<String, u64>>>::from_kson(
            &value,
            FieldPath::root(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "a[0].b: expected a non-negative integer");
    }
}
