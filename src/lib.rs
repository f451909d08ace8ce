//! Firekit: dependency injection and test doubles for Firebase drivers
//!
//! Application code resolves its collaborators (configuration, auth driver,
//! database driver) from the active [`di::ServiceContainer`]. Production
//! selects the container wired to the Firebase REST drivers; tests select the
//! one wired to in-memory drivers, guarded against production-looking
//! environments.

pub use firekit_core::{FirekitError, FirekitResult};

/// Core module re-exported from `firekit-core`.
pub mod core {
    pub use firekit_core::core::*;
}

/// Configuration management.
pub mod config;

/// Dependency injection infrastructure.
pub mod di;

/// Firebase and in-memory drivers.
pub mod drivers;

/// Production-environment guard.
pub mod guard;

/// Tracing subscriber setup.
pub mod logging;
