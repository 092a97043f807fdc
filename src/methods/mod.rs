//! Promise-aware collection methods
//!
//! Each method receives the settled value a wrapper holds, validates its
//! shape, settles the elements under a [`Policy`] and reproduces the native
//! collection operation of the same name. The functions here are what the
//! wrapper's `*_af` methods chain; they are usable on their own as well.

mod iterate;
mod search;
mod strings;

pub use iterate::{every, filter, find, find_index, for_each, map, reduce, some};
pub use search::{includes, index_of, last_index_of};
pub use strings::{concat, join, split, Separator};

use crate::error::{Error, Result};
use crate::r#async::{resolve_all_settling, resolve_in_series, Policy};
use crate::value::{Array, Callback, Function, Value};
use std::fmt;

/// The promise-aware methods, named as they appear in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `mapAF`
    Map,
    /// `filterAF`
    Filter,
    /// `forEachAF`
    ForEach,
    /// `reduceAF`
    Reduce,
    /// `everyAF`
    Every,
    /// `someAF`
    Some,
    /// `findAF`
    Find,
    /// `findIndexAF`
    FindIndex,
    /// `indexOfAF`
    IndexOf,
    /// `lastIndexOfAF`
    LastIndexOf,
    /// `includesAF`
    Includes,
    /// `joinAF`
    Join,
    /// `concatAF`
    Concat,
    /// `splitAF`
    Split,
}

impl Method {
    /// Every method, in declaration order.
    pub const ALL: [Method; 14] = [
        Method::Map,
        Method::Filter,
        Method::ForEach,
        Method::Reduce,
        Method::Every,
        Method::Some,
        Method::Find,
        Method::FindIndex,
        Method::IndexOf,
        Method::LastIndexOf,
        Method::Includes,
        Method::Join,
        Method::Concat,
        Method::Split,
    ];

    /// Public name of the method.
    pub fn name(self) -> &'static str {
        match self {
            Method::Map => "mapAF",
            Method::Filter => "filterAF",
            Method::ForEach => "forEachAF",
            Method::Reduce => "reduceAF",
            Method::Every => "everyAF",
            Method::Some => "someAF",
            Method::Find => "findAF",
            Method::FindIndex => "findIndexAF",
            Method::IndexOf => "indexOfAF",
            Method::LastIndexOf => "lastIndexOfAF",
            Method::Includes => "includesAF",
            Method::Join => "joinAF",
            Method::Concat => "concatAF",
            Method::Split => "splitAF",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Receiver shapes a method accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Arrays, strings and objects with a `length`
    ArrayLike,
    /// Arrays and strings
    ArrayOrString,
    /// Arrays, strings and array-like objects, searched by element or substring
    Searchable,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Shape::ArrayLike => "an Array or array-like Object",
            Shape::ArrayOrString => "an Array or String",
            Shape::Searchable => "an Array, String, or array-like Object",
        })
    }
}

/// Shape check for array-like receivers.
fn array_like(method: Method, receiver: &Value) -> Result<Array> {
    receiver
        .as_array_like()?
        .ok_or_else(|| Error::invalid_receiver(method, receiver, Shape::ArrayLike))
}

/// Shape check followed by the callability check, in that order.
fn array_like_with_callback<'a>(
    method: Method,
    receiver: &Value,
    callback: &'a Callback,
) -> Result<(Array, &'a Function)> {
    let array = array_like(method, receiver)?;
    let function = callback.function()?;
    Ok((array, function))
}

async fn settle(sequence: Array, policy: Policy) -> Result<Array> {
    match policy {
        Policy::Concurrent => resolve_all_settling(sequence).await,
        Policy::Sequential => resolve_in_series(sequence).await,
    }
}
