//! Lazily computed, invalidatable cache cells.
//!
//! Several values in this crate are pure functions of data that is only
//! mutated through `&mut self` but read through `&self`, possibly from
//! several threads at once: the time array of an evenly sampled signal,
//! the unwrapped phase and group delay of a spectrum, the derived
//! representations of a [`Signal`](crate::signal::Signal).
//!
//! [`LazyCache`] models such a value as a three-state cell:
//!
//! ```text
//!   Stale --get()--> Computing --> Fresh
//!     ^                              |
//!     +---------- invalidate() ------+
//! ```
//!
//! `get` uses double-checked locking. Once the cell is `Fresh`, readers
//! only perform an atomic load and never touch the lock. The first reader
//! that observes `Stale` takes the lock, checks again, and computes; any
//! reader arriving meanwhile blocks on the lock and then sees `Fresh`.
//! Invalidation needs exclusive access, so it can never race a reader.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock};

/// Validity of a [`LazyCache`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum CacheState {
    /// No value, or a value that no longer matches its inputs.
    Stale = 0,
    /// A reader holds the lock and is computing the value.
    Computing = 1,
    /// The value is present and valid.
    Fresh = 2,
}

impl CacheState {
    fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Stale,
            1 => Self::Computing,
            2 => Self::Fresh,
            _ => unreachable!("invalid cache state {raw}"),
        }
    }
}

/// Helper trait to recover from poisoned mutexes.
///
/// A panic while computing a cached value leaves the cell without a value,
/// and the guarded unit carries no invariant, so the lock can be reused.
pub(crate) trait RecoverMutex<T> {
    fn lock_recover(&self) -> MutexGuard<'_, T>;
}

impl<T> RecoverMutex<T> for Mutex<T> {
    fn lock_recover(&self) -> MutexGuard<'_, T> {
        self.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("Mutex was poisoned, recovering data");
            poisoned.into_inner()
        })
    }
}

/// A value computed on first read and discarded on invalidation.
pub struct LazyCache<T> {
    state: AtomicU8,
    value: OnceLock<T>,
    lock: Mutex<()>,
}

impl<T> LazyCache<T> {
    /// An empty (stale) cache.
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(CacheState::Stale as u8),
            value: OnceLock::new(),
            lock: Mutex::new(()),
        }
    }

    /// A cache that already holds a valid value.
    pub fn fresh(value: T) -> Self {
        let cache = Self::new();
        // A brand-new OnceLock is always empty.
        let _ = cache.value.set(value);
        cache.state.store(CacheState::Fresh as u8, Ordering::Release);
        cache
    }

    /// Current validity.
    pub fn state(&self) -> CacheState {
        CacheState::from_raw(self.state.load(Ordering::Acquire))
    }

    /// Whether a valid value is present.
    #[inline]
    pub fn is_fresh(&self) -> bool {
        self.state() == CacheState::Fresh
    }

    /// The cached value if it is fresh.
    pub fn get(&self) -> Option<&T> {
        if self.is_fresh() {
            self.value.get()
        } else {
            None
        }
    }

    /// The cached value, computing it first if stale.
    pub fn get_or_compute<F>(&self, compute: F) -> &T
    where
        F: FnOnce() -> T,
    {
        if let Some(value) = self.get() {
            return value;
        }

        let _guard = self.lock.lock_recover();
        if let Some(value) = self.get() {
            return value;
        }

        self.state.store(CacheState::Computing as u8, Ordering::Release);
        let value = compute();
        let stored = self.value.get_or_init(|| value);
        self.state.store(CacheState::Fresh as u8, Ordering::Release);
        stored
    }

    /// Mutable access to a fresh value.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        if self.is_fresh() {
            self.value.get_mut()
        } else {
            None
        }
    }

    /// Replace the value and mark the cache fresh.
    pub fn set(&mut self, value: T) {
        self.value = OnceLock::new();
        let _ = self.value.set(value);
        *self.state.get_mut() = CacheState::Fresh as u8;
    }

    /// Drop the value and mark the cache stale.
    pub fn invalidate(&mut self) {
        self.value.take();
        *self.state.get_mut() = CacheState::Stale as u8;
    }

    /// Take the value out, leaving the cache stale.
    pub fn take(&mut self) -> Option<T> {
        let fresh = self.is_fresh();
        *self.state.get_mut() = CacheState::Stale as u8;
        let value = self.value.take();
        if fresh {
            value
        } else {
            None
        }
    }
}

impl<T> Default for LazyCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for LazyCache<T> {
    fn clone(&self) -> Self {
        match self.get() {
            Some(value) => Self::fresh(value.clone()),
            None => Self::new(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for LazyCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyCache")
            .field("state", &self.state())
            .field("value", &self.get())
            .finish()
    }
}
