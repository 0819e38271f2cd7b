//! Environment variable access behind a trait, so credential lookups can be
//! exercised without touching the process environment.

use std::env::VarError;

/// Read a variable by name.
///
/// Implementations must be cheap to call repeatedly: credentials are looked
/// up on every send rather than cached.
pub trait ReadEnv {
    fn var(&self, key: &str) -> Result<String, VarError>;
}

/// Zero-sized type, delegates to `std::env`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl ReadEnv for SystemEnv {
    #[inline]
    fn var(&self, key: &str) -> Result<String, VarError> {
        std::env::var(key)
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use mem::MemEnv;

#[cfg(any(test, feature = "test-support"))]
mod mem {
    use std::collections::HashMap;
    use std::env::VarError;
    use std::sync::{Arc, Mutex, PoisonError};

    use super::ReadEnv;

    /// In-memory environment for tests. Clones share the same variables, so a
    /// test can rotate a credential after handing the env to a component.
    #[derive(Debug, Clone, Default)]
    pub struct MemEnv {
        vars: Arc<Mutex<HashMap<String, String>>>,
    }

    impl MemEnv {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(self, key: impl Into<String>, value: impl Into<String>) -> Self {
            self.set(key, value);
            self
        }

        pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
            self.vars
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(key.into(), value.into());
        }

        pub fn remove(&self, key: &str) {
            self.vars
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(key);
        }
    }

    impl ReadEnv for MemEnv {
        fn var(&self, key: &str) -> Result<String, VarError> {
            self.vars
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get(key)
                .cloned()
                .ok_or(VarError::NotPresent)
        }
    }
}
