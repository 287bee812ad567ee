//! Named sequence counters shared between renderers
//!
//! A [`SequenceRegistry`] maps a sequence name to its next value. Every
//! `get_and_advance` on one name is a single read-modify-write under the
//! registry mutex, so concurrent callers never observe the same value.
//! Values are `i64` and wrap on overflow (two's complement).

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Thread-safe registry of named counters
///
/// # Example
///
/// ```
/// use rust_log_router::SequenceRegistry;
///
/// let registry = SequenceRegistry::new();
/// assert_eq!(registry.get_and_advance("seq", 10, 5), 10);
/// assert_eq!(registry.get_and_advance("seq", 10, 5), 15);
/// assert_eq!(registry.current("seq"), Some(20));
/// ```
#[derive(Debug, Default)]
pub struct SequenceRegistry {
    sequences: Mutex<HashMap<String, i64>>,
}

impl SequenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry, for callers that do not inject their own
    pub fn global() -> &'static SequenceRegistry {
        static GLOBAL: OnceLock<SequenceRegistry> = OnceLock::new();
        GLOBAL.get_or_init(SequenceRegistry::new)
    }

    /// Return the current value of `name` and advance it by `increment`.
    ///
    /// An unknown sequence starts at `default_value`.
    pub fn get_and_advance(&self, name: &str, default_value: i64, increment: i64) -> i64 {
        let mut sequences = self.sequences.lock();
        if let Some(value) = sequences.get_mut(name) {
            let previous = *value;
            *value = previous.wrapping_add(increment);
            return previous;
        }
        sequences.insert(name.to_string(), default_value.wrapping_add(increment));
        default_value
    }

    /// The value the next `get_and_advance` on `name` would return
    pub fn current(&self, name: &str) -> Option<i64> {
        self.sequences.lock().get(name).copied()
    }

    /// Forget `name`; its next use starts again from the caller's default
    pub fn reset(&self, name: &str) -> Option<i64> {
        self.sequences.lock().remove(name)
    }

    pub fn len(&self) -> usize {
        self.sequences.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.lock().is_empty()
    }
}
