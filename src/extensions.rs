//! Extension methods
//!
//! A wrapper carries an optional [`Extensions`] registry. Methods registered
//! there are invoked by name through [`AsyncAf::call`](crate::AsyncAf::call)
//! and receive the wrapper's pending value, the call arguments and the
//! policy in effect.

use crate::error::Result;
use crate::r#async::{Deferred, Policy};
use crate::value::Value;
use futures::future::BoxFuture;
use hashbrown::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// What an extension method receives.
#[derive(Debug, Clone)]
pub struct ExtensionCall {
    /// The wrapper's pending value
    pub this: Deferred,
    /// Call arguments
    pub args: Vec<Value>,
    /// Policy selected on the wrapper at call time
    pub policy: Policy,
}

impl ExtensionCall {
    /// Settles the wrapper's value.
    pub async fn value(&self) -> Result<Value> {
        Value::Promise(self.this.clone()).resolve().await
    }
}

/// Signature of a registered extension method.
pub type ExtensionFn = dyn Fn(ExtensionCall) -> BoxFuture<'static, Result<Value>> + Send + Sync;

/// Named extension methods available to a wrapper.
#[derive(Clone, Default)]
pub struct Extensions {
    methods: HashMap<String, Arc<ExtensionFn>>,
}

impl Extensions {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `method` under `name`, replacing any previous entry.
    pub fn with<F, Fut>(mut self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(ExtensionCall) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        let boxed: Arc<ExtensionFn> =
            Arc::new(move |call: ExtensionCall| -> BoxFuture<'static, Result<Value>> { Box::pin(method(call)) });
        self.methods.insert(name.into(), boxed);
        self
    }

    /// Looks up a method.
    pub fn get(&self, name: &str) -> Option<Arc<ExtensionFn>> {
        self.methods.get(name).cloned()
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Registered names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.methods.keys().map(String::as_str)
    }

    /// Number of registered methods.
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl fmt::Debug for Extensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.methods.keys()).finish()
    }
}
