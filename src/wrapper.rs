//! The chainable wrapper
//!
//! [`AsyncAf`] holds "the value so far" as a [`Deferred`]. Each `*_af`
//! method returns a new wrapper whose value is the method's result; nothing
//! runs until the final wrapper is awaited. A rejection anywhere propagates
//! to the end of the chain unless a [`catch`](AsyncAf::catch) recovers it.

use crate::error::{Error, Result};
use crate::extensions::{ExtensionCall, Extensions};
use crate::methods::{self, Method, Separator};
use crate::r#async::{Deferred, Policy};
use crate::value::{Callback, Value};
use futures::future::{BoxFuture, FutureExt};
use std::fmt;
use std::future::{Future, IntoFuture};
use std::sync::Arc;

/// Wraps `value` for chaining. A pending value is adopted rather than nested.
pub fn wrap(value: impl Into<Value>) -> AsyncAf {
    AsyncAf::new(value)
}

/// A pending value with promise-aware collection methods.
#[derive(Clone)]
pub struct AsyncAf {
    data: Deferred,
    in_series: bool,
    extensions: Option<Arc<Extensions>>,
}

impl AsyncAf {
    /// Wraps `value`.
    pub fn new(value: impl Into<Value>) -> Self {
        let data = match value.into() {
            Value::Promise(deferred) => deferred,
            plain => Deferred::resolved(plain),
        };
        Self {
            data,
            in_series: false,
            extensions: None,
        }
    }

    /// Attaches extension methods; every wrapper derived from this one inherits them.
    pub fn with_extensions(mut self, extensions: Arc<Extensions>) -> Self {
        self.extensions = Some(extensions);
        self
    }

    /// Extension methods available to this wrapper.
    pub fn extensions(&self) -> Option<&Arc<Extensions>> {
        self.extensions.as_ref()
    }

    /// Flips the sequential flag for the next method call.
    ///
    /// The flag is consumed by whichever method is chained next, so it never
    /// affects more than one call. Calling `series` twice cancels out.
    pub fn series(mut self) -> Self {
        self.in_series = !self.in_series;
        self
    }

    /// Alias for [`series`](Self::series), read as "in order".
    pub fn io(self) -> Self {
        self.series()
    }

    /// Whether the next method call runs sequentially.
    pub fn in_series(&self) -> bool {
        self.in_series
    }

    /// Policy the next method call will use.
    pub fn policy(&self) -> Policy {
        if self.in_series {
            Policy::Sequential
        } else {
            Policy::Concurrent
        }
    }

    /// The underlying pending value.
    pub fn into_deferred(self) -> Deferred {
        self.data
    }

    fn derive(&self, data: Deferred) -> Self {
        Self {
            data,
            in_series: false,
            extensions: self.extensions.clone(),
        }
    }

    fn chain<F, Fut>(self, method: Method, op: F) -> Self
    where
        F: FnOnce(Value, Policy) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        let policy = self.policy();
        let source = self.data.clone();
        log::trace!(target: "async_af", "{method} chained ({policy:?})");
        self.derive(Deferred::new(async move {
            let value = Value::Promise(source).resolve().await?;
            op(value, policy).await
        }))
    }

    /// Maps every present element through `callback(element, index, array)`.
    pub fn map_af(self, callback: impl Into<Callback>) -> Self {
        let callback = callback.into();
        self.chain(Method::Map, move |value, policy| methods::map(value, policy, callback))
    }

    /// Keeps the elements whose callback outcome is truthy.
    pub fn filter_af(self, callback: impl Into<Callback>) -> Self {
        let callback = callback.into();
        self.chain(Method::Filter, move |value, policy| methods::filter(value, policy, callback))
    }

    /// Runs `callback` for its effects; settles to `undefined`.
    pub fn for_each_af(self, callback: impl Into<Callback>) -> Self {
        let callback = callback.into();
        self.chain(Method::ForEach, move |value, policy| methods::for_each(value, policy, callback))
    }

    /// Folds the elements left to right, optionally from `initial`.
    pub fn reduce_af(self, callback: impl Into<Callback>, initial: Option<Value>) -> Self {
        let callback = callback.into();
        self.chain(Method::Reduce, move |value, policy| {
            methods::reduce(value, policy, callback, initial)
        })
    }

    /// Whether every present element passes.
    pub fn every_af(self, callback: impl Into<Callback>) -> Self {
        let callback = callback.into();
        self.chain(Method::Every, move |value, policy| methods::every(value, policy, callback))
    }

    /// Whether any present element passes.
    pub fn some_af(self, callback: impl Into<Callback>) -> Self {
        let callback = callback.into();
        self.chain(Method::Some, move |value, policy| methods::some(value, policy, callback))
    }

    /// First element that passes, else `undefined`.
    pub fn find_af(self, callback: impl Into<Callback>) -> Self {
        let callback = callback.into();
        self.chain(Method::Find, move |value, policy| methods::find(value, policy, callback))
    }

    /// Index of the first element that passes, else `-1`.
    pub fn find_index_af(self, callback: impl Into<Callback>) -> Self {
        let callback = callback.into();
        self.chain(Method::FindIndex, move |value, policy| {
            methods::find_index(value, policy, callback)
        })
    }

    /// First index strictly equal to `search`, starting at `from`.
    pub fn index_of_af(self, search: impl Into<Value>, from: Option<i64>) -> Self {
        let search = search.into();
        self.chain(Method::IndexOf, move |value, policy| {
            methods::index_of(value, policy, search, from)
        })
    }

    /// Last index strictly equal to `search`, at or before `from`.
    pub fn last_index_of_af(self, search: impl Into<Value>, from: Option<i64>) -> Self {
        let search = search.into();
        self.chain(Method::LastIndexOf, move |value, policy| {
            methods::last_index_of(value, policy, search, from)
        })
    }

    /// Whether `search` occurs, starting at `from`.
    pub fn includes_af(self, search: impl Into<Value>, from: Option<i64>) -> Self {
        let search = search.into();
        self.chain(Method::Includes, move |value, policy| {
            methods::includes(value, policy, search, from)
        })
    }

    /// Joins the elements' string forms with `separator` (`","` when `None`).
    pub fn join_af(self, separator: Option<&str>) -> Self {
        let separator = separator.map(str::to_string);
        self.chain(Method::Join, move |value, policy| methods::join(value, policy, separator))
    }

    /// Appends `args` to an array or string.
    pub fn concat_af<I>(self, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let args: Vec<Value> = args.into_iter().map(Into::into).collect();
        self.chain(Method::Concat, move |value, policy| methods::concat(value, policy, args))
    }

    /// Splits a string on `separator`, keeping at most `limit` pieces.
    pub fn split_af(self, separator: Option<Separator>, limit: Option<i64>) -> Self {
        self.chain(Method::Split, move |value, _| methods::split(value, separator, limit))
    }

    /// Invokes the extension method registered as `name`.
    ///
    /// Rejects with [`Error::UnknownMethod`] when no such method is registered.
    pub fn call<I>(self, name: &str, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let method = self.extensions.as_ref().and_then(|ext| ext.get(name));
        let data = match method {
            Some(method) => {
                log::trace!(target: "async_af", "{name} chained ({:?})", self.policy());
                Deferred::new(method(ExtensionCall {
                    this: self.data.clone(),
                    args: args.into_iter().map(Into::into).collect(),
                    policy: self.policy(),
                }))
            }
            None => Deferred::rejected(Error::UnknownMethod {
                name: name.to_string(),
            }),
        };
        self.derive(data)
    }

    /// Continues with `on_fulfilled` once the value settles.
    pub fn then<F, Fut>(self, on_fulfilled: F) -> Self
    where
        F: FnOnce(Value) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        let source = self.data.clone();
        self.derive(Deferred::new(async move {
            let value = Value::Promise(source).resolve().await?;
            on_fulfilled(value).await
        }))
    }

    /// Recovers from a rejection with `on_rejected`; fulfilled values pass through.
    pub fn catch<F, Fut>(self, on_rejected: F) -> Self
    where
        F: FnOnce(Error) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        let source = self.data.clone();
        self.derive(Deferred::new(async move {
            match Value::Promise(source).resolve().await {
                Ok(value) => Ok(value),
                Err(error) => on_rejected(error).await,
            }
        }))
    }

    /// Runs `on_settled` after the value settles either way, keeping the outcome.
    pub fn finally<F>(self, on_settled: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let source = self.data.clone();
        self.derive(Deferred::new(async move {
            let outcome = Value::Promise(source).resolve().await;
            on_settled();
            outcome
        }))
    }
}

/// Short names for the collection methods.
///
/// Each one delegates to its `*_af` counterpart, so rejections still name the
/// `*AF` method.
impl AsyncAf {
    /// Alias of [`map_af`](Self::map_af).
    pub fn map(self, callback: impl Into<Callback>) -> Self {
        self.map_af(callback)
    }

    /// Alias of [`filter_af`](Self::filter_af).
    pub fn filter(self, callback: impl Into<Callback>) -> Self {
        self.filter_af(callback)
    }

    /// Alias of [`for_each_af`](Self::for_each_af).
    pub fn for_each(self, callback: impl Into<Callback>) -> Self {
        self.for_each_af(callback)
    }

    /// Alias of [`reduce_af`](Self::reduce_af).
    pub fn reduce(self, callback: impl Into<Callback>, initial: Option<Value>) -> Self {
        self.reduce_af(callback, initial)
    }

    /// Alias of [`every_af`](Self::every_af).
    pub fn every(self, callback: impl Into<Callback>) -> Self {
        self.every_af(callback)
    }

    /// Alias of [`some_af`](Self::some_af).
    pub fn some(self, callback: impl Into<Callback>) -> Self {
        self.some_af(callback)
    }

    /// Alias of [`find_af`](Self::find_af).
    pub fn find(self, callback: impl Into<Callback>) -> Self {
        self.find_af(callback)
    }

    /// Alias of [`find_index_af`](Self::find_index_af).
    pub fn find_index(self, callback: impl Into<Callback>) -> Self {
        self.find_index_af(callback)
    }

    /// Alias of [`index_of_af`](Self::index_of_af).
    pub fn index_of(self, search: impl Into<Value>, from: Option<i64>) -> Self {
        self.index_of_af(search, from)
    }

    /// Alias of [`last_index_of_af`](Self::last_index_of_af).
    pub fn last_index_of(self, search: impl Into<Value>, from: Option<i64>) -> Self {
        self.last_index_of_af(search, from)
    }

    /// Alias of [`includes_af`](Self::includes_af).
    pub fn includes(self, search: impl Into<Value>, from: Option<i64>) -> Self {
        self.includes_af(search, from)
    }

    /// Alias of [`join_af`](Self::join_af).
    pub fn join(self, separator: Option<&str>) -> Self {
        self.join_af(separator)
    }

    /// Alias of [`concat_af`](Self::concat_af).
    pub fn concat<I>(self, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.concat_af(args)
    }

    /// Alias of [`split_af`](Self::split_af).
    pub fn split(self, separator: Option<Separator>, limit: Option<i64>) -> Self {
        self.split_af(separator, limit)
    }
}

/// Awaiting a wrapper yields its settled value, flattening nested pending values.
impl IntoFuture for AsyncAf {
    type Output = Result<Value>;
    type IntoFuture = BoxFuture<'static, Result<Value>>;

    fn into_future(self) -> Self::IntoFuture {
        Value::Promise(self.data).resolve().boxed()
    }
}

impl From<AsyncAf> for Value {
    fn from(wrapper: AsyncAf) -> Self {
        Value::Promise(wrapper.data)
    }
}

impl fmt::Debug for AsyncAf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncAf")
            .field("data", &self.data)
            .field("in_series", &self.in_series)
            .field("extensions", &self.extensions)
            .finish()
    }
}
