//! Preference persistence
//!
//! The store is write-through: every accepted change is written immediately,
//! one patch per change, last write wins.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{Error, Result};
use crate::models::{PreferencePatch, Preferences};

/// Durable key-value storage for user preferences
#[allow(async_fn_in_trait)]
pub trait PreferenceStore {
    /// Load persisted values; keys never written are `None`.
    async fn load(&self) -> Result<PreferencePatch>;

    /// Persist the fields present in `patch`, leaving the others untouched.
    async fn set(&self, patch: PreferencePatch) -> Result<()>;

    /// Load persisted values with built-in defaults applied.
    async fn get(&self) -> Result<Preferences> {
        let stored = self.load().await?;
        Ok(Preferences::resolve(&stored, &PreferencePatch::default()))
    }
}

/// Volatile store that keeps every write for inspection.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<PreferencePatch>,
    writes: Mutex<Vec<PreferencePatch>>,
    fail_writes: bool,
}

impl MemoryPreferenceStore {
    pub fn new(initial: PreferencePatch) -> Self {
        Self {
            values: Mutex::new(initial),
            ..Self::default()
        }
    }

    /// A store whose writes always fail.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Patches in the order they were written.
    pub fn writes(&self) -> Vec<PreferencePatch> {
        lock(&self.writes).clone()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    async fn load(&self) -> Result<PreferencePatch> {
        Ok(lock(&self.values).clone())
    }

    async fn set(&self, patch: PreferencePatch) -> Result<()> {
        if self.fail_writes {
            return Err(Error::Database("preference store is read-only".to_string()));
        }
        lock(&self.writes).push(patch.clone());
        lock(&self.values).merge(patch);
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
