//! Dependency injection infrastructure for Firekit
//!
//! Application code asks the active [`ServiceContainer`] for collaborators by
//! [`ServiceId`]; tests switch the active container to in-memory drivers.
//!
//! # Example (Production)
//! ```no_run
//! use firekit::di::{container, use_real_container};
//!
//! # async fn example() -> firekit::core::FirekitResult<()> {
//! use_real_container();
//! let auth = container().expect("container selected").auth()?;
//! let claims = auth.verify_id_token("eyJ...").await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example (Testing)
//! ```
//! use firekit::di::{ServiceContainer, mocks::MockConfigProvider};
//! use std::sync::Arc;
//!
//! let config = MockConfigProvider::new().with("FIREBASE_PROJECT_ID", "demo");
//! let mut container = ServiceContainer::new();
//! container.bind_config(move |_| Ok(Arc::new(config.clone())));
//! ```

pub mod bindings;
pub mod container;
pub mod mocks;
pub mod selection;
pub mod traits;

// Re-export key types
pub use bindings::{
    real_container, reset_test_drivers, test_auth_driver, test_container, test_database_driver,
};
pub use container::{Factory, Service, ServiceContainer, ServiceId};
pub use selection::{
    container, use_container, use_real_container, use_test_container, ContainerSelector,
};
pub use traits::{AuthDriver, ConfigProvider, CreateUser, DatabaseDriver, UserRecord, VerifiedToken};
