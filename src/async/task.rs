//! Pending computations
//!
//! A [`Deferred`] is a shareable handle to a computation that settles once
//! with a [`Value`] or an [`Error`]. Every clone observes the same outcome,
//! which lets an element sit in several arrays (or be awaited by several
//! chains) without running twice.

use crate::error::{Error, Result};
use crate::value::Value;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// A shareable, single-settlement pending computation.
///
/// Built with [`Deferred::new`] the computation is lazy and starts the first
/// time any clone is polled. [`Deferred::spawn`] starts it immediately on the
/// tokio runtime instead.
#[derive(Clone)]
pub struct Deferred {
    inner: Shared<BoxFuture<'static, Result<Value>>>,
}

impl Deferred {
    /// Create a lazy pending computation from a future
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = Result<Value>> + Send + 'static,
    {
        Self {
            inner: future.boxed().shared(),
        }
    }

    /// Create an already fulfilled computation
    pub fn resolved(value: impl Into<Value>) -> Self {
        Self::new(futures::future::ready(Ok(value.into())))
    }

    /// Create an already rejected computation
    pub fn rejected(error: Error) -> Self {
        Self::new(futures::future::ready(Err(error)))
    }

    /// Start `future` on the current tokio runtime right away
    ///
    /// Must be called from within a runtime. If the spawned task is dropped
    /// before it settles, the computation rejects.
    #[cfg(feature = "tokio-async")]
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = Result<Value>> + Send + 'static,
    {
        let (tx, rx) = tokio::sync::oneshot::channel();
        tokio::spawn(async move {
            let outcome = future.await;
            let _ = tx.send(outcome);
        });
        Self::new(async move {
            match rx.await {
                Ok(outcome) => outcome,
                Err(_) => Err(Error::reject("pending computation was dropped before it settled")),
            }
        })
    }

    /// Outcome if the computation has already settled
    pub fn peek(&self) -> Option<&Result<Value>> {
        self.inner.peek()
    }

    /// Whether the computation has settled
    pub fn is_settled(&self) -> bool {
        self.peek().is_some()
    }

    /// Identity comparison: true when both handles observe the same computation
    pub fn ptr_eq(&self, other: &Deferred) -> bool {
        self.inner.ptr_eq(&other.inner)
    }
}

impl Future for Deferred {
    type Output = Result<Value>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.inner).poll(cx)
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.peek() {
            None => f.write_str("Promise { <pending> }"),
            Some(Ok(value)) => write!(f, "Promise {{ {value:?} }}"),
            Some(Err(error)) => write!(f, "Promise {{ <rejected> {error} }}"),
        }
    }
}
