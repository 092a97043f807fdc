//! Macros for building [`Array`](crate::Array) and [`Object`](crate::Object) literals.
//!
//! Elements go through [`Value::from`](crate::Value), so plain Rust numbers,
//! strings, booleans and nested values can be mixed freely.

/// Builds an [`Array`](crate::Array); `_` marks a hole.
///
/// # Example
///
/// ```rust
/// use async_af::{array, Value};
///
/// let sparse = array![1, _, "three"];
/// assert_eq!(sparse.len(), 3);
/// assert!(sparse.is_hole(1));
/// assert_eq!(sparse.get(2), Some(&Value::from("three")));
/// ```
#[macro_export]
macro_rules! array {
    (@slots [$($slots:expr,)*]) => {
        $crate::Array::from_slots(::std::vec![$($slots),*])
    };
    (@slots [$($slots:expr,)*] _ $(, $($rest:tt)*)?) => {
        $crate::array!(@slots [$($slots,)* ::core::option::Option::None,] $($($rest)*)?)
    };
    (@slots [$($slots:expr,)*] $value:expr $(, $($rest:tt)*)?) => {
        $crate::array!(@slots [$($slots,)* ::core::option::Option::Some($crate::Value::from($value)),] $($($rest)*)?)
    };
    ($($body:tt)*) => {
        $crate::array!(@slots [] $($body)*)
    };
}

/// Builds an [`Object`](crate::Object) from `key => value` pairs.
///
/// # Example
///
/// ```rust
/// use async_af::{object, Value};
///
/// let like = object! { "0" => "a", "1" => "b", "length" => 2 };
/// assert_eq!(like.length(), Some(2));
/// assert_eq!(like.get("0"), Some(&Value::from("a")));
/// ```
#[macro_export]
macro_rules! object {
    {} => {
        $crate::Object::new()
    };
    {$($key:expr => $value:expr),+ $(,)?} => {
        $crate::Object::from_entries([$(($key, $crate::Value::from($value)),)+])
    };
}
