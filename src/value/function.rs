use super::Value;
use crate::error::{Error, Result};
use crate::r#async::Deferred;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

static UNDEFINED: Value = Value::Undefined;

/// Arguments of a single invocation.
#[derive(Clone, Debug, Default)]
pub struct Call {
    /// Receiver bound for the invocation
    pub this: Value,
    /// Positional arguments
    pub args: Vec<Value>,
}

impl Call {
    /// Positional argument `index`; missing arguments read as `undefined`.
    pub fn arg(&self, index: usize) -> &Value {
        self.args.get(index).unwrap_or(&UNDEFINED)
    }

    /// Bound receiver.
    pub fn this(&self) -> &Value {
        &self.this
    }
}

type NativeFn = dyn Fn(Call) -> Result<Value> + Send + Sync;

/// A callable value.
///
/// A function returns synchronously: either a value (which may itself be a
/// pending [`Value::Promise`]) or an immediate error.
#[derive(Clone)]
pub struct Function {
    inner: Arc<NativeFn>,
}

impl Function {
    /// Wraps a synchronous closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Call) -> Result<Value> + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Wraps an async closure; each invocation returns a lazy pending value.
    pub fn from_async<F, Fut>(f: F) -> Self
    where
        F: Fn(Call) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        Self::new(move |call| Ok(Value::Promise(Deferred::new(f(call)))))
    }

    /// Invokes the function.
    pub fn call(&self, this: Value, args: Vec<Value>) -> Result<Value> {
        (self.inner)(Call { this, args })
    }

    /// Binds a receiver, producing a callback ready to hand to a method.
    pub fn with_this(self, this: impl Into<Value>) -> Callback {
        Callback::new(self).with_this(this)
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &Function) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[Function]")
    }
}

/// A callback argument as handed to a method: any value plus an optional receiver.
///
/// The target is only checked for callability when the method runs, so a
/// non-function surfaces as a rejection of the chain rather than at the call site.
#[derive(Clone, Debug, Default)]
pub struct Callback {
    target: Value,
    this: Value,
}

impl Callback {
    /// Creates a callback with an `undefined` receiver.
    pub fn new(target: impl Into<Value>) -> Self {
        Self {
            target: target.into(),
            this: Value::Undefined,
        }
    }

    /// Sets the receiver passed to every invocation.
    pub fn with_this(mut self, this: impl Into<Value>) -> Self {
        self.this = this.into();
        self
    }

    /// The wrapped value.
    pub fn target(&self) -> &Value {
        &self.target
    }

    /// The bound receiver.
    pub fn this(&self) -> &Value {
        &self.this
    }

    /// The target as a function, or [`Error::NotAFunction`].
    pub fn function(&self) -> Result<&Function> {
        match &self.target {
            Value::Function(function) => Ok(function),
            other => Err(Error::NotAFunction(other.to_string())),
        }
    }
}

impl From<Function> for Callback {
    fn from(function: Function) -> Self {
        Self::new(function)
    }
}

impl From<Value> for Callback {
    fn from(target: Value) -> Self {
        Self::new(target)
    }
}
