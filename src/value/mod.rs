//! Dynamic values flowing through a chain
//!
//! A [`Value`] is what a wrapper holds "so far": plain data, a sparse
//! [`Array`], an array-like [`Object`], a callable [`Function`] or a pending
//! computation ([`Deferred`]). Conversions to strings, numbers and booleans
//! follow the coercions the native collection methods apply.

mod array;
mod function;
mod object;

pub use array::Array;
pub use function::{Call, Callback, Function};
pub use object::{Object, MAX_ARRAY_LIKE_SLOTS};

use crate::error::Result;
use crate::r#async::Deferred;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// A dynamically typed value, possibly still pending.
#[derive(Clone, Default)]
pub enum Value {
    /// The absence of a value
    #[default]
    Undefined,
    /// An explicit empty value
    Null,
    /// A boolean
    Bool(bool),
    /// A double precision number
    Number(f64),
    /// An immutable string, cheap to clone
    String(Arc<str>),
    /// A sequence that may contain holes
    Array(Array),
    /// A string-keyed map, array-like when it carries a `length`
    Object(Object),
    /// A callable value
    Function(Function),
    /// A pending computation
    Promise(Deferred),
}

impl Value {
    /// Wraps a future as a pending value.
    ///
    /// The computation is lazy: nothing runs until something awaits it.
    pub fn promise<F>(future: F) -> Self
    where
        F: Future<Output = Result<Value>> + Send + 'static,
    {
        Value::Promise(Deferred::new(future))
    }

    /// Awaits nested pending computations until a plain value remains.
    ///
    /// Resolving a plain value hands it back unchanged.
    pub async fn resolve(self) -> Result<Value> {
        let mut current = self;
        while let Value::Promise(deferred) = current {
            current = deferred.await?;
        }
        Ok(current)
    }

    /// Returns true when this value is a pending computation.
    pub fn is_pending(&self) -> bool {
        matches!(self, Value::Promise(_))
    }

    /// Returns true for `undefined` and `null`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Returns the string slice of a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number of a number value.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the array of an array value.
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Returns the function of a function value.
    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(function) => Some(function),
            _ => None,
        }
    }

    /// Views this value as an indexed sequence.
    ///
    /// Arrays are returned as-is, strings become one element per `char` and
    /// objects qualify when they carry a non-nullish `length`. Everything else
    /// is not array-like. Fails only for objects whose length is too large to
    /// materialise.
    pub fn as_array_like(&self) -> Result<Option<Array>> {
        match self {
            Value::Array(array) => Ok(Some(array.clone())),
            Value::String(s) => Ok(Some(s.chars().map(|c| Value::from(c.to_string())).collect())),
            Value::Object(object) => object.as_array_like(),
            _ => Ok(None),
        }
    }

    /// Boolean coercion.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) | Value::Function(_) | Value::Promise(_) => true,
        }
    }

    /// Numeric coercion.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::String(s) => parse_number(s),
            Value::Array(array) => parse_number(&array.join(",")),
            Value::Object(_) | Value::Function(_) | Value::Promise(_) => f64::NAN,
        }
    }

    /// Strict equality: `NaN` never matches and composite values compare by identity.
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Promise(a), Value::Promise(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Strict equality, except that `NaN` matches `NaN`.
    pub fn same_value_zero(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) if a.is_nan() && b.is_nan() => true,
            _ => self.strict_equals(other),
        }
    }

    /// Short name of the variant, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
            Value::Promise(_) => "promise",
        }
    }
}

fn parse_number(s: &str) -> f64 {
    let trimmed = s.trim();
    match trimmed {
        "" => 0.0,
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ => match radix_literal(trimmed) {
            Some(n) => n,
            None if trimmed.chars().any(|c| matches!(c, 'i' | 'I' | 'n' | 'N')) => f64::NAN,
            None => trimmed.parse().unwrap_or(f64::NAN),
        },
    }
}

/// Unsigned `0x`, `0o` and `0b` literals. Malformed digits give NaN.
fn radix_literal(s: &str) -> Option<f64> {
    let radix = match s.get(..2)? {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    let digits = &s[2..];
    let value = digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix).map(|digit| acc * f64::from(radix) + f64::from(digit))
    });
    Some(match value {
        Some(n) if !digits.is_empty() => n,
        _ => f64::NAN,
    })
}

/// `Number.prototype.toString` with radix 10.
pub(crate) fn fmt_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_nan() {
        f.write_str("NaN")
    } else if n.is_infinite() {
        f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if n == 0.0 {
        f.write_str("0")
    } else {
        let mut buf = ryu_js::Buffer::new();
        f.write_str(buf.format_finite(n))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => fmt_number(*n, f),
            Value::String(s) => f.write_str(s),
            Value::Array(array) => f.write_str(&array.join(",")),
            Value::Object(_) => f.write_str("[object Object]"),
            Value::Function(_) => f.write_str("[Function]"),
            Value::Promise(_) => f.write_str("[object Promise]"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{:?}", &**s),
            Value::Array(array) => fmt::Debug::fmt(array, f),
            Value::Object(object) => fmt::Debug::fmt(object, f),
            Value::Promise(deferred) => fmt::Debug::fmt(deferred, f),
            other => fmt::Display::fmt(other, f),
        }
    }
}

/// Structural equality, used to compare resolved results.
///
/// Numbers compare with `==` (so `NaN != NaN`); functions and promises
/// compare by identity. See [`Value::strict_equals`] for `===` semantics.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Promise(a), Value::Promise(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<()> for Value {
    #[inline]
    fn from(_: ()) -> Self {
        Value::Undefined
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    #[inline]
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    #[inline]
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    #[inline]
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    #[inline]
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(s: &str) -> Self {
        Value::String(Arc::from(s))
    }
}

impl From<String> for Value {
    #[inline]
    fn from(s: String) -> Self {
        Value::String(Arc::from(s))
    }
}

impl From<Arc<str>> for Value {
    #[inline]
    fn from(s: Arc<str>) -> Self {
        Value::String(s)
    }
}

impl From<Array> for Value {
    #[inline]
    fn from(array: Array) -> Self {
        Value::Array(array)
    }
}

impl From<Object> for Value {
    #[inline]
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

impl From<Function> for Value {
    #[inline]
    fn from(function: Function) -> Self {
        Value::Function(function)
    }
}

impl From<Deferred> for Value {
    #[inline]
    fn from(deferred: Deferred) -> Self {
        Value::Promise(deferred)
    }
}

impl<T> From<Vec<T>> for Value
where
    T: Into<Value>,
{
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::Array(iter.into_iter().collect())
    }
}

#[cfg(feature = "json")]
mod json {
    use super::Value;
    use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

    /// Holes, `undefined`, functions and pending values serialize as `null`.
    impl Serialize for Value {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Value::Bool(b) => serializer.serialize_bool(*b),
                Value::Number(n) if n.is_finite() => serializer.serialize_f64(*n),
                Value::String(s) => serializer.serialize_str(s),
                Value::Array(array) => {
                    let mut seq = serializer.serialize_seq(Some(array.len()))?;
                    for slot in array.iter() {
                        seq.serialize_element(slot.as_ref().unwrap_or(&Value::Null))?;
                    }
                    seq.end()
                }
                Value::Object(object) => {
                    let mut map = serializer.serialize_map(Some(object.len()))?;
                    for (key, value) in object.iter() {
                        map.serialize_entry(key, value)?;
                    }
                    map.end()
                }
                _ => serializer.serialize_unit(),
            }
        }
    }

    impl From<serde_json::Value> for Value {
        fn from(json: serde_json::Value) -> Self {
            match json {
                serde_json::Value::Null => Value::Null,
                serde_json::Value::Bool(b) => Value::Bool(b),
                serde_json::Value::Number(n) => n.as_f64().map_or(Value::Undefined, Value::Number),
                serde_json::Value::String(s) => Value::from(s),
                serde_json::Value::Array(items) => items.into_iter().map(Value::from).collect(),
                serde_json::Value::Object(entries) => Value::Object(
                    entries
                        .into_iter()
                        .map(|(key, value)| (key, Value::from(value)))
                        .collect(),
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_stringify_like_native() {
        assert_eq!(Value::from(3).to_string(), "3");
        assert_eq!(Value::from(-0.0).to_string(), "0");
        assert_eq!(Value::from(1.5).to_string(), "1.5");
        assert_eq!(Value::from(f64::NAN).to_string(), "NaN");
        assert_eq!(Value::from(f64::NEG_INFINITY).to_string(), "-Infinity");
    }

    #[test]
    fn extreme_magnitudes_use_exponent_form() {
        assert_eq!(Value::from(1e21).to_string(), "1e+21");
        assert_eq!(Value::from(-1.5e300).to_string(), "-1.5e+300");
        assert_eq!(Value::from(1e-7).to_string(), "1e-7");
        assert_eq!(Value::from(1.25e-10).to_string(), "1.25e-10");
        assert_eq!(Value::from(123_456_789_012_345_680_000.0).to_string(), "123456789012345680000");
        assert_eq!(Value::from(0.000001).to_string(), "0.000001");
        assert_eq!(Value::from(0.1 + 0.2).to_string(), "0.30000000000000004");
    }

    #[test]
    fn composite_values_stringify() {
        let nested = Value::from(vec![Value::from(1), Value::from(vec!["a", "b"]), Value::Null]);
        assert_eq!(nested.to_string(), "1,a,b,");
        assert_eq!(Value::Object(Object::new()).to_string(), "[object Object]");
    }

    #[test]
    fn truthiness() {
        assert!(!Value::Undefined.is_truthy());
        assert!(!Value::from(0).is_truthy());
        assert!(!Value::from(f64::NAN).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(Value::from("0").is_truthy());
        assert!(Value::from(Vec::<Value>::new()).is_truthy());
    }

    #[test]
    fn number_coercion() {
        assert_eq!(Value::from(" 42 ").to_number(), 42.0);
        assert_eq!(Value::from("").to_number(), 0.0);
        assert!(Value::from("inf").to_number().is_nan());
        assert_eq!(Value::from(vec![7]).to_number(), 7.0);
        assert_eq!(Value::Bool(true).to_number(), 1.0);
    }

    #[test]
    fn radix_prefixed_strings_coerce() {
        assert_eq!(Value::from("0x10").to_number(), 16.0);
        assert_eq!(Value::from("0XfF").to_number(), 255.0);
        assert_eq!(Value::from(" 0o7 ").to_number(), 7.0);
        assert_eq!(Value::from("0b101").to_number(), 5.0);
        assert!(Value::from("0x").to_number().is_nan());
        assert!(Value::from("0b2").to_number().is_nan());
        assert!(Value::from("-0x10").to_number().is_nan());
        assert_eq!(Value::from("1e3").to_number(), 1000.0);
    }

    #[test]
    fn equality_flavours() {
        let nan = Value::from(f64::NAN);
        assert!(!nan.strict_equals(&nan));
        assert!(nan.same_value_zero(&nan));

        let array = Value::from(vec![1, 2]);
        assert!(array.strict_equals(&array.clone()));
        assert!(!array.strict_equals(&Value::from(vec![1, 2])));
        assert_eq!(array, Value::from(vec![1, 2]));
    }

    #[test]
    fn strings_are_array_like() {
        let chars = Value::from("abc").as_array_like().ok().flatten().map(|a| a.len());
        assert_eq!(chars, Some(3));
        assert!(matches!(Value::from(2).as_array_like(), Ok(None)));
        assert!(matches!(Value::Null.as_array_like(), Ok(None)));
    }

    #[test]
    fn resolve_flattens_nested_promises() {
        let inner = Value::promise(async { Ok(Value::from(5)) });
        let outer = Value::promise(async move { Ok(inner) });
        let resolved = futures::executor::block_on(outer.resolve());
        assert_eq!(resolved.ok(), Some(Value::from(5)));
    }
}
