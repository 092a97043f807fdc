use super::{Array, Value};
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Largest length an array-like object may claim (2^53 - 1).
const MAX_LENGTH: f64 = 9_007_199_254_740_991.0;

/// Largest array-like length whose indexed view is materialised.
pub const MAX_ARRAY_LIKE_SLOTS: usize = 1 << 24;

/// A string-keyed map of values.
///
/// An object whose `length` property is present and not nullish is treated as
/// array-like: its indices `0..length` are read from the keys `"0"`, `"1"`, ...
/// and missing keys become holes.
#[derive(Clone, Default, PartialEq)]
pub struct Object {
    entries: Arc<BTreeMap<String, Value>>,
}

impl Object {
    /// Creates an empty object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an object from key/value pairs.
    pub fn from_entries<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect()
    }

    /// Property lookup.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the object has no properties.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates properties in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }

    /// Coerced `length`, when the object is array-like.
    pub fn length(&self) -> Option<usize> {
        match self.entries.get("length") {
            None | Some(Value::Undefined) | Some(Value::Null) => None,
            Some(length) => Some(to_length(length.to_number())),
        }
    }

    /// Materialises the indexed view of an array-like object.
    ///
    /// Only keys in canonical index form fill slots. Lengths above
    /// [`MAX_ARRAY_LIKE_SLOTS`] fail with [`Error::LengthTooLarge`].
    pub fn as_array_like(&self) -> Result<Option<Array>> {
        let Some(length) = self.length() else {
            return Ok(None);
        };
        if length > MAX_ARRAY_LIKE_SLOTS {
            return Err(Error::LengthTooLarge {
                length,
                limit: MAX_ARRAY_LIKE_SLOTS,
            });
        }

        let mut slots = vec![None; length];
        for (key, value) in self.entries.iter() {
            if let Some(slot) = index_key(key).and_then(|index| slots.get_mut(index)) {
                *slot = Some(value.clone());
            }
        }
        Ok(Some(Array::from_slots(slots)))
    }
}

/// Parses `"0"`, `"1"`, ... but not `"01"` or `"+1"`.
fn index_key(key: &str) -> Option<usize> {
    let index: usize = key.parse().ok()?;
    (index.to_string() == key).then_some(index)
}

fn to_length(n: f64) -> usize {
    if n.is_nan() || n <= 0.0 {
        0
    } else {
        n.trunc().min(MAX_LENGTH) as usize
    }
}

impl FromIterator<(String, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: Arc::new(iter.into_iter().collect()),
        }
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_makes_objects_array_like() {
        let object = Object::from_entries([
            ("0", Value::from("a")),
            ("2", Value::from("c")),
            ("length", Value::from(3)),
        ]);
        let array = object.as_array_like().ok().flatten().map(|a| a.slots().to_vec());
        assert_eq!(
            array,
            Some(vec![Some(Value::from("a")), None, Some(Value::from("c"))])
        );
    }

    #[test]
    fn length_is_coerced() {
        let negative = Object::from_entries([("length", Value::from(-4))]);
        assert_eq!(negative.length(), Some(0));

        let fractional = Object::from_entries([("length", Value::from("2.9"))]);
        assert_eq!(fractional.length(), Some(2));

        let nullish = Object::from_entries([("length", Value::Null)]);
        assert_eq!(nullish.length(), None);
        assert!(matches!(Object::new().as_array_like(), Ok(None)));
    }

    #[test]
    fn only_canonical_index_keys_fill_slots() {
        let object = Object::from_entries([
            ("01", Value::from("padded")),
            ("+1", Value::from("signed")),
            ("1", Value::from("b")),
            ("length", Value::from(2)),
        ]);
        let array = object.as_array_like().ok().flatten().map(|a| a.slots().to_vec());
        assert_eq!(array, Some(vec![None, Some(Value::from("b"))]));
    }

    #[test]
    fn oversized_length_is_an_error() {
        let object = Object::from_entries([("0", Value::from(1)), ("length", Value::from(1e12))]);
        assert_eq!(object.length(), Some(1_000_000_000_000));
        assert!(matches!(
            object.as_array_like(),
            Err(Error::LengthTooLarge { length: 1_000_000_000_000, .. })
        ));

        let at_limit = Object::from_entries([("length", Value::from(MAX_ARRAY_LIKE_SLOTS as f64))]);
        assert!(at_limit.as_array_like().is_ok_and(|array| array.is_some()));
    }
}
