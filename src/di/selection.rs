//! Active container selection
//!
//! A [`ContainerSelector`] holds the real and test containers (each built on
//! first use) and the one currently active. The free functions drive a
//! process-wide selector for code that cannot thread a context through.

use super::bindings::{real_container, test_container};
use super::container::ServiceContainer;
use once_cell::sync::OnceCell;
use std::sync::{Arc, RwLock};
use tracing::debug;

static SELECTOR: ContainerSelector = ContainerSelector::new();

/// Holder of the active container
#[derive(Debug, Default)]
pub struct ContainerSelector {
    real: OnceCell<Arc<ServiceContainer>>,
    test: OnceCell<Arc<ServiceContainer>>,
    active: RwLock<Option<Arc<ServiceContainer>>>,
}

impl ContainerSelector {
    /// Selector with nothing active; usable in a `static`
    pub const fn new() -> Self {
        Self {
            real: OnceCell::new(),
            test: OnceCell::new(),
            active: RwLock::new(None),
        }
    }

    /// Activate the real container, building it on first use
    pub fn use_real(&self) -> Arc<ServiceContainer> {
        let container = self
            .real
            .get_or_init(|| Arc::new(real_container()))
            .clone();
        debug!("using real container");
        self.activate(container.clone());
        container
    }

    /// Activate the test container, building it on first use
    pub fn use_test(&self) -> Arc<ServiceContainer> {
        let container = self
            .test
            .get_or_init(|| Arc::new(test_container()))
            .clone();
        debug!("using test container");
        self.activate(container.clone());
        container
    }

    /// Activate an arbitrary container
    pub fn use_container(&self, container: Arc<ServiceContainer>) {
        debug!("using custom container");
        self.activate(container);
    }

    /// The active container, if one was selected
    pub fn current(&self) -> Option<Arc<ServiceContainer>> {
        self.active
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn activate(&self, container: Arc<ServiceContainer>) {
        *self
            .active
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(container);
    }
}

/// Make the real container active process-wide
pub fn use_real_container() -> Arc<ServiceContainer> {
    SELECTOR.use_real()
}

/// Make the test container active process-wide
pub fn use_test_container() -> Arc<ServiceContainer> {
    SELECTOR.use_test()
}

/// Make `container` active process-wide
pub fn use_container(container: Arc<ServiceContainer>) {
    SELECTOR.use_container(container);
}

/// The process-wide active container, or `None` before any selection
pub fn container() -> Option<Arc<ServiceContainer>> {
    SELECTOR.current()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::di::mocks::MockConfigProvider;
    use crate::di::ServiceId;

    #[test]
    fn test_unset_before_selection() {
        let selector = ContainerSelector::new();
        assert!(selector.current().is_none());
    }

    #[test]
    fn test_switching_modes() {
        let selector = ContainerSelector::new();

        let real = selector.use_real();
        assert!(Arc::ptr_eq(&selector.current().unwrap(), &real));

        let test = selector.use_test();
        assert!(Arc::ptr_eq(&selector.current().unwrap(), &test));
        assert!(!Arc::ptr_eq(&real, &test));

        selector.use_real();
        assert!(Arc::ptr_eq(&selector.current().unwrap(), &real));
    }

    #[test]
    fn test_repeated_selection_reuses_container() {
        let selector = ContainerSelector::new();

        let first = selector.use_test();
        let second = selector.use_test();
        assert!(Arc::ptr_eq(&first, &second));

        let first = selector.use_real();
        let second = selector.use_real();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_use_custom_container() {
        let selector = ContainerSelector::new();
        selector.use_test();

        let mut custom = ServiceContainer::new();
        let config = MockConfigProvider::new().with("mode", "custom");
        custom.bind_config(move |_| Ok(Arc::new(config.clone())));
        selector.use_container(Arc::new(custom));

        let active = selector.current().unwrap();
        assert!(!active.is_bound(ServiceId::Auth));
        assert_eq!(active.config().unwrap().get("mode").as_deref(), Some("custom"));
    }

    #[test]
    fn test_real_and_test_bind_every_service() {
        let selector = ContainerSelector::new();
        for container in [selector.use_real(), selector.use_test()] {
            for id in [ServiceId::Config, ServiceId::Auth, ServiceId::Database] {
                assert!(container.is_bound(id), "{id} should be bound");
            }
        }
    }
}
