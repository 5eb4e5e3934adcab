//! Keyed durable storage seam and an in-memory implementation.
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// Trait for abstracting the durable key-value medium.
/// Platform-specific implementations should provide this
pub trait KeyValueStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the raw value stored under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Write `value` under `key`, replacing any previous value
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be written (quota, unavailable medium).
    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;

    /// Remove the entry stored under `key`; removing a missing key succeeds
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be modified.
    fn remove(&self, key: &str) -> Result<(), Self::Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum MemoryStoreError {
    #[error("storage unavailable")]
    Unavailable,
}

/// Shared in-memory store.
///
/// Clones point at the same entries, so a clone handed to a second
/// `ProgressStore` behaves like a fresh process reading the same profile.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
    unavailable: Rc<Cell<bool>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a medium that rejects writes and removals.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }

    /// Place a raw value under `key`, bypassing availability checks.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    type Error = MemoryStoreError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        if self.unavailable.get() {
            return Err(MemoryStoreError::Unavailable);
        }
        self.insert_raw(key, value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        if self.unavailable.get() {
            return Err(MemoryStoreError::Unavailable);
        }
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
