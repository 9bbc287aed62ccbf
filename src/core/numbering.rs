use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;

use super::error::FacturaError;

/// Counter keys are `INVOICE_COUNT_<year>`.
pub const COUNTER_KEY_PREFIX: &str = "INVOICE_COUNT_";

const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(30);

/// Durable key-value persistence for the per-year invoice counters.
///
/// The numbering service owns the allocation protocol, not the storage
/// medium; backends range from script properties to a plain file. Any
/// backend failure surfaces as [`FacturaError::StorageUnavailable`].
pub trait CounterStore {
    fn get_property(&self, key: &str) -> Result<Option<String>, FacturaError>;
    fn set_property(&mut self, key: &str, value: &str) -> Result<(), FacturaError>;
}

/// Format the canonical invoice id, `"<ordinal>-<year>"`.
pub fn format_invoice_id(ordinal: u64, year: i32) -> String {
    format!("{ordinal}-{year}")
}

/// Per-fiscal-year sequential invoice numbering.
///
/// [`reserve`](Self::reserve) performs read-increment-persist under a
/// global exclusive lock, so no two concurrent callers ever receive the
/// same ordinal. The ordinal is consumed the instant `reserve` returns:
/// if the invoice is later abandoned the number is simply skipped.
/// Committed ids for a year are therefore exactly `1..=N` with no gaps
/// or duplicates as long as callers reserve only after all validation
/// has passed.
///
/// Lock acquisition is bounded (30 s by default) and fails loudly with
/// [`FacturaError::LockTimeout`] instead of hanging. The service never
/// retries on its own; a retry would not be idempotent-safe.
#[derive(Debug)]
pub struct InvoiceNumbering<S> {
    store: Mutex<S>,
    lock_timeout: Duration,
}

impl<S: CounterStore> InvoiceNumbering<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Mutex::new(store),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    /// Override the lock acquisition bound (mainly for tests).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Allocate the next ordinal for `year`: lock, read (0 if absent),
    /// increment, persist, release. Irreversible by design.
    pub fn reserve(&self, year: i32) -> Result<u64, FacturaError> {
        let mut store = self
            .store
            .try_lock_for(self.lock_timeout)
            .ok_or(FacturaError::LockTimeout(self.lock_timeout))?;

        let key = counter_key(year);
        let next = read_counter(&*store, &key)? + 1;
        store.set_property(&key, &next.to_string())?;
        Ok(next)
    }

    /// Last-assigned ordinal for `year` (0 if none). Never mutates.
    pub fn peek(&self, year: i32) -> Result<u64, FacturaError> {
        let store = self
            .store
            .try_lock_for(self.lock_timeout)
            .ok_or(FacturaError::LockTimeout(self.lock_timeout))?;

        read_counter(&*store, &counter_key(year))
    }
}

fn counter_key(year: i32) -> String {
    format!("{COUNTER_KEY_PREFIX}{year}")
}

fn read_counter(store: &impl CounterStore, key: &str) -> Result<u64, FacturaError> {
    match store.get_property(key)? {
        None => Ok(0),
        Some(raw) => raw.parse().map_err(|_| {
            FacturaError::StorageUnavailable(format!("corrupted counter value for {key}: \"{raw}\""))
        }),
    }
}

/// In-memory counter backend for tests and callers without durable
/// storage.
#[derive(Debug, Default)]
pub struct MemoryCounterStore {
    properties: HashMap<String, String>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CounterStore for MemoryCounterStore {
    fn get_property(&self, key: &str) -> Result<Option<String>, FacturaError> {
        Ok(self.properties.get(key).cloned())
    }

    fn set_property(&mut self, key: &str, value: &str) -> Result<(), FacturaError> {
        self.properties.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
