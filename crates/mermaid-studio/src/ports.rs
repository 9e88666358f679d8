//! Host capabilities used by an editing session.
//!
//! The session never reaches for global state. Durable key-value storage,
//! the location fragment that carries the share token, and the clock that
//! drives autosave are injected through the traits in this module. Hosts
//! supply concrete adapters; in-memory implementations are provided for
//! tests and embedding.

use std::{
    cell::Cell,
    collections::HashMap,
    io,
    rc::Rc,
    time::{Duration, Instant},
};

use thiserror::Error;

/// Errors raised by a [`Storage`] adapter.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("storage format error: {0}")]
    Format(String),
}

/// Durable string key-value storage.
pub trait Storage {
    /// Reads the value stored under `key`, or `None` if the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backing store cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// The address of the current document, reduced to its fragment.
pub trait Location {
    /// Returns the current fragment without the leading `#`, if any.
    fn fragment(&self) -> Option<String>;

    /// Replaces the fragment in place, without creating a history entry.
    fn replace_fragment(&mut self, fragment: &str);
}

/// Monotonic time source.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// In-memory [`Storage`] that also counts writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
    writes: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, without counting as a write.
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Number of successful [`Storage::set`] calls.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

/// In-memory [`Location`] that records how often the fragment was replaced.
#[derive(Debug, Clone, Default)]
pub struct MemoryLocation {
    fragment: Option<String>,
    replacements: usize,
}

impl MemoryLocation {
    pub fn new() -> Self {
        Self::default()
    }

    /// A location whose fragment is already set, as on a shared link.
    pub fn with_fragment(fragment: impl Into<String>) -> Self {
        Self {
            fragment: Some(fragment.into()),
            replacements: 0,
        }
    }

    /// Number of [`Location::replace_fragment`] calls.
    pub fn replacements(&self) -> usize {
        self.replacements
    }
}

impl Location for MemoryLocation {
    fn fragment(&self) -> Option<String> {
        self.fragment.clone()
    }

    fn replace_fragment(&mut self, fragment: &str) {
        self.fragment = Some(fragment.to_string());
        self.replacements += 1;
    }
}

/// [`Clock`] backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced [`Clock`].
///
/// Clones share the same time, so a test can keep one handle and give the
/// other to a session.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    elapsed: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    /// Moves time forward by `by`.
    pub fn advance(&self, by: Duration) {
        self.elapsed.set(self.elapsed.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_counts_writes() {
        let mut storage = MemoryStorage::new().with_value("a", "1");
        assert_eq!(storage.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(storage.writes(), 0);

        storage.set("a", "2").unwrap();
        storage.set("b", "3").unwrap();
        assert_eq!(storage.get("a").unwrap().as_deref(), Some("2"));
        assert_eq!(storage.get("missing").unwrap(), None);
        assert_eq!(storage.writes(), 2);
    }

    #[test]
    fn test_memory_location_replace() {
        let mut location = MemoryLocation::new();
        assert_eq!(location.fragment(), None);

        location.replace_fragment("abc");
        assert_eq!(location.fragment().as_deref(), Some("abc"));
        assert_eq!(location.replacements(), 1);
    }

    #[test]
    fn test_manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        let start = clock.now();

        handle.advance(Duration::from_millis(250));
        assert_eq!(clock.now() - start, Duration::from_millis(250));
    }
}
