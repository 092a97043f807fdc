//! Asynchronous building blocks
//!
//! - [`Deferred`]: a shareable pending computation
//! - [`Policy`]: concurrent or sequential settlement
//! - resolvers that settle sparse sequences under either policy

pub mod resolve;
pub mod task;

pub use resolve::{resolve_all_settling, resolve_in_series, resolve_with_policy, Policy};
pub(crate) use resolve::{visit, Holes};
pub use task::Deferred;
