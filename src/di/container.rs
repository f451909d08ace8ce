//! Service container for dependency injection

use super::traits::{AuthDriver, ConfigProvider, DatabaseDriver};
use crate::core::{FirekitError, FirekitResult};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Identifier of a bindable capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceId {
    /// Configuration values
    Config,
    /// Authentication driver
    Auth,
    /// Database driver
    Database,
}

impl ServiceId {
    /// Short name used in logs and errors
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceId::Config => "config",
            ServiceId::Auth => "auth",
            ServiceId::Database => "database",
        }
    }

    /// Kind of service this identifier is expected to resolve to
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceId::Config => "config provider",
            ServiceId::Auth => "auth driver",
            ServiceId::Database => "database driver",
        }
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved service instance
#[derive(Clone)]
pub enum Service {
    /// Resolved for [`ServiceId::Config`]
    Config(Arc<dyn ConfigProvider>),
    /// Resolved for [`ServiceId::Auth`]
    Auth(Arc<dyn AuthDriver>),
    /// Resolved for [`ServiceId::Database`]
    Database(Arc<dyn DatabaseDriver>),
}

impl Service {
    /// Identifier whose accessor accepts this service
    pub fn id(&self) -> ServiceId {
        match self {
            Service::Config(_) => ServiceId::Config,
            Service::Auth(_) => ServiceId::Auth,
            Service::Database(_) => ServiceId::Database,
        }
    }

    fn kind(&self) -> &'static str {
        self.id().kind()
    }
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Service({})", self.kind())
    }
}

/// Factory producing a service, given the container for transitive resolution
pub type Factory = Arc<dyn Fn(&ServiceContainer) -> FirekitResult<Service> + Send + Sync>;

/// Service container for dependency injection
///
/// Maps each [`ServiceId`] to a factory. Binding the same identifier twice
/// replaces the earlier factory. The container never caches what a factory
/// returns; factories that want a singleton memoize on their own.
///
/// # Example
///
/// ```
/// use firekit::di::{ServiceContainer, mocks::MockConfigProvider};
/// use std::sync::Arc;
///
/// let mut container = ServiceContainer::new();
/// let config = MockConfigProvider::new().with("FIREBASE_PROJECT_ID", "demo");
/// container.bind_config(move |_| Ok(Arc::new(config.clone())));
///
/// let config = container.config().unwrap();
/// assert_eq!(config.get("FIREBASE_PROJECT_ID").as_deref(), Some("demo"));
/// ```
#[derive(Clone, Default)]
pub struct ServiceContainer {
    factories: HashMap<ServiceId, Factory>,
}

impl ServiceContainer {
    /// Create an empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the factory for `id`, replacing any earlier binding
    pub fn bind<F>(&mut self, id: ServiceId, factory: F)
    where
        F: Fn(&ServiceContainer) -> FirekitResult<Service> + Send + Sync + 'static,
    {
        if self.factories.insert(id, Arc::new(factory)).is_some() {
            debug!(identifier = %id, "rebinding service");
        } else {
            debug!(identifier = %id, "binding service");
        }
    }

    /// Bind a configuration provider factory
    pub fn bind_config<F>(&mut self, factory: F)
    where
        F: Fn(&ServiceContainer) -> FirekitResult<Arc<dyn ConfigProvider>> + Send + Sync + 'static,
    {
        self.bind(ServiceId::Config, move |c| factory(c).map(Service::Config));
    }

    /// Bind an auth driver factory
    pub fn bind_auth<F>(&mut self, factory: F)
    where
        F: Fn(&ServiceContainer) -> FirekitResult<Arc<dyn AuthDriver>> + Send + Sync + 'static,
    {
        self.bind(ServiceId::Auth, move |c| factory(c).map(Service::Auth));
    }

    /// Bind a database driver factory
    pub fn bind_database<F>(&mut self, factory: F)
    where
        F: Fn(&ServiceContainer) -> FirekitResult<Arc<dyn DatabaseDriver>> + Send + Sync + 'static,
    {
        self.bind(ServiceId::Database, move |c| factory(c).map(Service::Database));
    }

    /// Check whether a factory is bound for `id`
    pub fn is_bound(&self, id: ServiceId) -> bool {
        self.factories.contains_key(&id)
    }

    /// Resolve `id` by invoking its factory
    ///
    /// # Errors
    ///
    /// [`FirekitError::Unbound`] if nothing is bound for `id`, or whatever the
    /// factory itself returns.
    pub fn make(&self, id: ServiceId) -> FirekitResult<Service> {
        let factory = self
            .factories
            .get(&id)
            .ok_or_else(|| FirekitError::Unbound(id.to_string()))?;
        debug!(identifier = %id, "resolving service");
        factory(self)
    }

    /// Resolve the configuration provider
    pub fn config(&self) -> FirekitResult<Arc<dyn ConfigProvider>> {
        match self.make(ServiceId::Config)? {
            Service::Config(config) => Ok(config),
            other => Err(mismatch(ServiceId::Config, &other)),
        }
    }

    /// Resolve the auth driver
    pub fn auth(&self) -> FirekitResult<Arc<dyn AuthDriver>> {
        match self.make(ServiceId::Auth)? {
            Service::Auth(auth) => Ok(auth),
            other => Err(mismatch(ServiceId::Auth, &other)),
        }
    }

    /// Resolve the database driver
    pub fn database(&self) -> FirekitResult<Arc<dyn DatabaseDriver>> {
        match self.make(ServiceId::Database)? {
            Service::Database(database) => Ok(database),
            other => Err(mismatch(ServiceId::Database, &other)),
        }
    }
}

fn mismatch(id: ServiceId, got: &Service) -> FirekitError {
    debug!(identifier = %id, got = got.kind(), "binding produced the wrong service kind");
    FirekitError::BindingMismatch {
        id: id.to_string(),
        expected: id.kind(),
    }
}

impl fmt::Debug for ServiceContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut bound: Vec<_> = self.factories.keys().map(ServiceId::as_str).collect();
        bound.sort_unstable();
        f.debug_struct("ServiceContainer")
            .field("bound", &bound)
            .finish()
    }
}
