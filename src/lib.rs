//! # async_af
//!
//! Promise-aware collection operations for Rust.
//!
//! Wrap a value (often a sequence mixing plain values and pending
//! computations) and chain `map_af`, `filter_af`, `reduce_af` and friends
//! without settling intermediate results by hand. Each method settles what it
//! needs, reproduces the native collection operation of the same name, and
//! hands back a new wrapper.
//!
//! ## Features
//!
//! - `tokio-async` - [`Deferred::spawn`] for eagerly started computations
//! - `macros` - [`array!`] and [`object!`] literals
//! - `json` - `serde` serialization of [`Value`] and conversion from `serde_json::Value`
//!
//! ## Example
//!
//! ```rust
//! use async_af::{wrap, Function, Value};
//!
//! # futures::executor::block_on(async {
//! let pending = Value::promise(async { Ok(Value::from(2)) });
//! let double = Function::new(|call| Ok(Value::from(call.arg(0).to_number() * 2.0)));
//!
//! let doubled = wrap(vec![Value::from(1), pending, Value::from(3)])
//!     .map_af(double)
//!     .join_af(Some("-"))
//!     .await?;
//! assert_eq!(doubled, Value::from("2-4-6"));
//! # Ok::<_, async_af::Error>(())
//! # }).unwrap();
//! ```
//!
//! ### Sequential execution
//!
//! ```rust
//! use async_af::{wrap, Function, Value};
//!
//! # futures::executor::block_on(async {
//! let is_even = Function::new(|call| Ok(Value::from(call.arg(0).to_number() % 2.0 == 0.0)));
//!
//! // `series()` (or `io()`) applies to the next method only
//! let first_even = wrap(vec![1, 3, 4, 6]).series().find_af(is_even).await?;
//! assert_eq!(first_even, Value::from(4));
//! # Ok::<_, async_af::Error>(())
//! # }).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod r#async;
pub mod error;
pub mod extensions;
pub mod log_af;
pub mod methods;
pub mod value;
pub mod wrapper;

#[cfg(feature = "macros")]
pub mod macros;

pub use error::{Error, Result};
pub use extensions::{ExtensionCall, Extensions};
pub use log_af::{LabelContext, LabelFormat, LogOptions, LogOptionsUpdate, Logger};
pub use methods::{Method, Separator, Shape};
pub use r#async::{
    resolve_all_settling, resolve_in_series, resolve_with_policy, Deferred, Policy,
};
pub use value::{Array, Call, Callback, Function, Object, Value, MAX_ARRAY_LIKE_SLOTS};
pub use wrapper::{wrap, AsyncAf};
