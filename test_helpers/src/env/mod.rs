//! Scoped mutation of process environment variables.
//!
//! Every mutation takes a global re-entrant lock and returns a guard that
//! puts the previous value back (or removes the variable) when dropped.
//! Guards for the same key stack and restore in LIFO order. Hold [`lock`]
//! when a test needs several mutations to appear atomically.
//!
//! ```
//! use test_helpers::env;
//!
//! let _g = env::set_var("APIMODEL_DOC_TOKEN", "abc");
//! assert_eq!(std::env::var("APIMODEL_DOC_TOKEN").ok().as_deref(), Some("abc"));
//! ```

use std::{
    env,
    ffi::{OsStr, OsString},
    fmt,
    sync::LazyLock,
};

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

static ENV_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// Restores one variable on drop.
#[must_use = "dropping restores the prior value"]
pub struct EnvVarGuard {
    key: String,
    original: Option<OsString>,
}

impl fmt::Debug for EnvVarGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvVarGuard")
            .field("key", &self.key)
            .field("had_original", &self.original.is_some())
            .finish_non_exhaustive()
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        let _guard = ENV_MUTEX.lock();
        match self.original.take() {
            // SAFETY: `ENV_MUTEX` is held.
            Some(value) => unsafe { env::set_var(&self.key, value) },
            // SAFETY: `ENV_MUTEX` is held.
            None => unsafe { env::remove_var(&self.key) },
        }
    }
}

/// Holds the environment lock; mutations made through it cannot interleave
/// with any other guard's.
#[must_use = "dropping releases the environment lock"]
pub struct EnvLock {
    _guard: ReentrantMutexGuard<'static, ()>,
}

impl fmt::Debug for EnvLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvLock").finish_non_exhaustive()
    }
}

impl EnvLock {
    /// Set `key` while the lock is held.
    pub fn set_var<K, V>(&self, key: K, value: V) -> EnvVarGuard
    where
        K: Into<String>,
        V: AsRef<OsStr>,
    {
        set_var(key, value)
    }

    /// Remove `key` while the lock is held.
    pub fn remove_var<K: Into<String>>(&self, key: K) -> EnvVarGuard {
        remove_var(key)
    }
}

fn mutate<F>(key: String, mutator: F) -> EnvVarGuard
where
    F: FnOnce(&str),
{
    let _guard = ENV_MUTEX.lock();
    let original = env::var_os(&key);
    mutator(&key);
    EnvVarGuard { key, original }
}

/// Set a variable for the lifetime of the returned guard.
pub fn set_var<K, V>(key: K, value: V) -> EnvVarGuard
where
    K: Into<String>,
    V: AsRef<OsStr>,
{
    // SAFETY: `mutate` holds `ENV_MUTEX` while calling the closure.
    mutate(key.into(), |k| unsafe { env::set_var(k, value.as_ref()) })
}

/// Remove a variable for the lifetime of the returned guard.
pub fn remove_var<K: Into<String>>(key: K) -> EnvVarGuard {
    // SAFETY: `mutate` holds `ENV_MUTEX` while calling the closure.
    mutate(key.into(), |k| unsafe { env::remove_var(k) })
}

/// Take the global environment lock.
pub fn lock() -> EnvLock {
    EnvLock {
        _guard: ENV_MUTEX.lock(),
    }
}

/// Run `f` with the global environment lock held.
pub fn with_lock<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock();
    f()
}
