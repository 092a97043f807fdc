//! Error types for async_af operations.
//!
//! Every failure in a chain surfaces as one of these variants on the wrapper's
//! rejection. The messages mirror the `TypeError`s thrown by the native
//! collection operations the methods reproduce.

use crate::methods::{Method, Shape};
use crate::value::Value;
use thiserror::Error;

/// Result type alias for async_af operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for all async_af operations
///
/// `Clone` is required: a single rejection is observed by every wrapper that
/// shares the same pending computation.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// A callback argument was missing or not invokable
    #[error("{0} is not a function")]
    NotAFunction(String),

    /// The wrapped value does not have the shape the method operates on
    #[error("{method} cannot be called on {value}, only on {expected}")]
    InvalidReceiver {
        /// Method that rejected the value
        method: Method,
        /// String form of the offending value
        value: String,
        /// Shape the method accepts
        expected: Shape,
    },

    /// `splitAF` was called on something other than a string
    #[error("splitAF may be called on a string but was called on {0}")]
    NotAString(String),

    /// `reduceAF` without an initial value on a sequence with no present elements
    #[error("reduceAF cannot be called on an empty array without an initial value")]
    EmptyReduce,

    /// A split pattern failed to compile
    #[error("invalid split pattern: {0}")]
    InvalidPattern(String),

    /// An extension method was invoked that the wrapper's registry does not hold
    #[error("{name} is not a registered method")]
    UnknownMethod {
        /// Name that failed to resolve
        name: String,
    },

    /// An array-like object claims more slots than can be materialised
    #[error("array-like length {length} exceeds the limit of {limit} slots")]
    LengthTooLarge {
        /// Coerced `length` of the object
        length: usize,
        /// Largest length that is materialised
        limit: usize,
    },

    /// A label format name outside file, path, parent, arrow or custom
    #[error(
        "logAF labelFormat option must be set to 'file' (default), 'path', 'parent', 'arrow', or 'custom' but was '{0}'"
    )]
    InvalidLabelFormat(String),

    /// A pending computation or callback rejected with an arbitrary reason
    #[error("{0}")]
    Rejected(Value),
}

impl Error {
    /// Creates a rejection carrying `reason`.
    pub fn reject(reason: impl Into<Value>) -> Self {
        Error::Rejected(reason.into())
    }

    /// Returns true for the errors a native collection method would raise as a `TypeError`.
    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            Error::NotAFunction(_)
                | Error::InvalidReceiver { .. }
                | Error::NotAString(_)
                | Error::EmptyReduce
        )
    }

    /// Returns the rejection reason when this error carries one.
    pub fn reason(&self) -> Option<&Value> {
        match self {
            Error::Rejected(reason) => Some(reason),
            _ => None,
        }
    }

    pub(crate) fn invalid_receiver(method: Method, value: &Value, expected: Shape) -> Self {
        Error::InvalidReceiver {
            method,
            value: value.to_string(),
            expected,
        }
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::InvalidPattern(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receiver_message_names_method_value_and_shape() {
        let err = Error::invalid_receiver(Method::Map, &Value::Null, Shape::ArrayLike);
        assert_eq!(
            err.to_string(),
            "mapAF cannot be called on null, only on an Array or array-like Object"
        );
        assert!(err.is_type_error());
    }

    #[test]
    fn rejection_displays_its_reason() {
        let err = Error::reject(42);
        assert_eq!(err.to_string(), "42");
        assert_eq!(err.reason(), Some(&Value::from(42)));
        assert!(!err.is_type_error());
    }

    #[test]
    fn bad_pattern_converts() {
        let err = regex::Regex::new("(").map_err(Error::from).err();
        assert!(matches!(err, Some(Error::InvalidPattern(_))));
    }
}
