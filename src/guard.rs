//! Production-environment guard
//!
//! The in-memory drivers accept any well-shaped token and keep users in a
//! plain map. Before one of them is built, every environment variable value is
//! scanned for `"prod"` (case-insensitive); a hit refuses to continue. A
//! successful scan is remembered for the rest of the process, and
//! [`disable_env_looks_like_prod_check`] marks the process safe without
//! scanning at all.

use crate::core::{FirekitError, FirekitResult};
use once_cell::sync::OnceCell;
use std::ffi::OsStr;
use tracing::{debug, warn};

const PROD_MARKER: &str = "prod";

static GUARD: EnvGuard = EnvGuard::new();

/// Cached environment check
///
/// Starts unchecked. Moves to checked-safe after a clean scan or an explicit
/// [`disable`](Self::disable); a failed scan leaves it unchecked.
#[derive(Debug, Default)]
pub struct EnvGuard {
    checked: OnceCell<()>,
}

impl EnvGuard {
    /// Unchecked guard; usable in a `static`
    pub const fn new() -> Self {
        Self {
            checked: OnceCell::new(),
        }
    }

    /// Scan the process environment unless already checked
    pub fn ensure_safe(&self) -> FirekitResult<()> {
        self.ensure_safe_with(std::env::vars_os)
    }

    /// Like [`ensure_safe`](Self::ensure_safe), scanning `vars()` instead of
    /// the process environment. `vars` is only called when a scan is needed.
    pub fn ensure_safe_with<F, I, K, V>(&self, vars: F) -> FirekitResult<()>
    where
        F: FnOnce() -> I,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<OsStr>,
        V: AsRef<OsStr>,
    {
        self.checked
            .get_or_try_init(|| match find_prod_like_var(vars()) {
                Some((name, value)) => Err(FirekitError::UnsafeEnvironment { name, value }),
                None => {
                    debug!("environment does not look like production");
                    Ok(())
                }
            })
            .map(|_| ())
    }

    /// Mark the environment safe without scanning
    pub fn disable(&self) {
        warn!("production environment check disabled; in-memory drivers will run unguarded");
        let _ = self.checked.set(());
    }

    /// Whether a scan has passed or the check was disabled
    pub fn is_checked(&self) -> bool {
        self.checked.get().is_some()
    }
}

/// Find the first variable whose value contains `"prod"`, ignoring case
pub fn find_prod_like_var<I, K, V>(vars: I) -> Option<(String, String)>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<OsStr>,
    V: AsRef<OsStr>,
{
    vars.into_iter().find_map(|(name, value)| {
        let value = value.as_ref().to_string_lossy();
        value
            .to_lowercase()
            .contains(PROD_MARKER)
            .then(|| (name.as_ref().to_string_lossy().into_owned(), value.into_owned()))
    })
}

/// Fail if the process environment looks like production
///
/// # Errors
///
/// [`FirekitError::UnsafeEnvironment`] naming the first offending variable.
pub fn ensure_env_not_prod() -> FirekitResult<()> {
    GUARD.ensure_safe()
}

/// Skip the production check for the rest of the process
pub fn disable_env_looks_like_prod_check() {
    GUARD.disable();
}
