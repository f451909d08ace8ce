//! Real and test container wiring
//!
//! Each driver lives in its own process-wide slot, built on first resolution
//! and shared afterwards. Real and in-memory drivers use separate slots, so
//! switching modes never rebuilds a driver that is already warm.

use super::container::ServiceContainer;
use super::traits::{AuthDriver, ConfigProvider, DatabaseDriver};
use crate::config::Config;
use crate::core::FirekitResult;
use crate::drivers::{
    FirebaseAuthDriver, MemoryAuthDriver, MemoryDatabaseDriver, RealtimeDatabaseDriver,
};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::debug;

static REAL_CONFIG: OnceCell<Arc<Config>> = OnceCell::new();
static REAL_AUTH: OnceCell<Arc<FirebaseAuthDriver>> = OnceCell::new();
static REAL_DATABASE: OnceCell<Arc<RealtimeDatabaseDriver>> = OnceCell::new();
static TEST_AUTH: OnceCell<Arc<MemoryAuthDriver>> = OnceCell::new();
static TEST_DATABASE: OnceCell<Arc<MemoryDatabaseDriver>> = OnceCell::new();

/// Build a container wired to the Firebase REST drivers
///
/// Configuration is [`Config::load`], read once per process.
pub fn real_container() -> ServiceContainer {
    let mut container = ServiceContainer::new();

    container.bind_config(|_| {
        let config = REAL_CONFIG.get_or_try_init(|| Config::load().map(Arc::new))?;
        Ok(config.clone() as Arc<dyn ConfigProvider>)
    });

    container.bind_auth(|c| {
        let driver = REAL_AUTH.get_or_try_init(|| {
            debug!("constructing Firebase auth driver");
            FirebaseAuthDriver::from_config(c.config()?.as_ref()).map(Arc::new)
        })?;
        Ok(driver.clone() as Arc<dyn AuthDriver>)
    });

    container.bind_database(|c| {
        let driver = REAL_DATABASE.get_or_try_init(|| {
            debug!("constructing Realtime Database driver");
            RealtimeDatabaseDriver::from_config(c.config()?.as_ref()).map(Arc::new)
        })?;
        Ok(driver.clone() as Arc<dyn DatabaseDriver>)
    });

    container
}

/// Build a container wired to the in-memory drivers
///
/// Configuration is read from the environment on every resolution. Resolving
/// either driver runs the production guard first.
pub fn test_container() -> ServiceContainer {
    let mut container = ServiceContainer::new();

    container.bind_config(|_| Ok(Arc::new(Config::from_env()) as Arc<dyn ConfigProvider>));
    container.bind_auth(|_| Ok(test_auth_driver()? as Arc<dyn AuthDriver>));
    container.bind_database(|_| Ok(test_database_driver()? as Arc<dyn DatabaseDriver>));

    container
}

/// The process-wide in-memory auth driver
///
/// # Errors
///
/// Fails while the environment looks like production.
pub fn test_auth_driver() -> FirekitResult<Arc<MemoryAuthDriver>> {
    TEST_AUTH
        .get_or_try_init(|| {
            debug!("constructing in-memory auth driver");
            MemoryAuthDriver::new().map(Arc::new)
        })
        .cloned()
}

/// The process-wide in-memory database driver
pub fn test_database_driver() -> FirekitResult<Arc<MemoryDatabaseDriver>> {
    TEST_DATABASE
        .get_or_try_init(|| {
            debug!("constructing in-memory database driver");
            MemoryDatabaseDriver::new().map(Arc::new)
        })
        .cloned()
}

/// Clear the in-memory drivers that have been built, without building any
pub fn reset_test_drivers() {
    if let Some(auth) = TEST_AUTH.get() {
        auth.reset_users();
    }
    if let Some(database) = TEST_DATABASE.get() {
        database.reset_documents();
    }
}
