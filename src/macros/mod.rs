//! Macro utilities for building values

/// Literal syntax for sparse arrays and objects.
pub mod collections;
