//! Core utilities shared by the Firekit crates.
//!
//! Holds the error type every layer returns and the platform-specific path
//! helpers used to locate configuration.

pub mod core;

pub use core::error::{FirekitError, FirekitResult};
